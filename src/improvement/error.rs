//! Error types raised by message improvers.

use std::sync::Arc;
use thiserror::Error;

/// Failure reported by a single improver invocation.
///
/// These never escape the registry; they are folded into a `none` result.
#[derive(Debug, Clone, Error)]
pub enum ImproverError {
    /// The improver rejected or could not process the text.
    #[error("{0}")]
    Failed(String),

    /// An underlying error surfaced from inside the improver.
    #[error("{0}")]
    Source(Arc<dyn std::error::Error + Send + Sync>),

    /// The improver panicked.
    #[error("improver panicked: {0}")]
    Panicked(String),
}

impl ImproverError {
    /// Creates a failure with a plain message.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    /// Wraps an error raised inside an improver.
    pub fn source(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Source(Arc::new(err))
    }
}

/// Result type returned by improvers.
pub type ImproverResult<T> = Result<T, ImproverError>;
