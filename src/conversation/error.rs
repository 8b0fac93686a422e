//! Error types for conversation storage.

use std::sync::Arc;
use thiserror::Error;

/// Errors raised by conversation repositories.
///
/// The in-memory store only fails when its lock is poisoned; callers treat
/// any of these as fatal rather than operational.
#[derive(Debug, Clone, Error)]
pub enum ConversationRepositoryError {
    /// The backing storage failed.
    #[error("conversation storage error: {0}")]
    Storage(Arc<dyn std::error::Error + Send + Sync>),
}

impl ConversationRepositoryError {
    /// Wraps a storage-layer error.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Arc::new(err))
    }
}
