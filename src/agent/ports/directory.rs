//! Directory service client port.

use crate::agent::domain::AgentRegistration;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Announces an agent to a remote directory.
///
/// Every call is advisory: the agent logs failures and carries on.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Registers the agent.
    async fn register(&self, registration: &AgentRegistration) -> DirectoryResult<()>;

    /// Removes the agent's registration.
    async fn unregister(&self, agent_id: &str) -> DirectoryResult<()>;

    /// Signals that the agent is still alive.
    async fn heartbeat(&self, agent_id: &str) -> DirectoryResult<()>;
}

/// Errors returned by directory client adapters.
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    /// The request could not be sent or the response not read.
    #[error("directory transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),

    /// The directory answered with a non-success status.
    #[error("directory responded with status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// The directory base URL cannot be used.
    #[error("invalid directory URL: {0}")]
    InvalidUrl(String),
}

impl DirectoryError {
    /// Wraps a transport failure.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
