//! Error types for agent orchestration.

use crate::agent::ports::{ChannelError, HttpSurfaceError};
use crate::conversation::error::ConversationRepositoryError;
use thiserror::Error;

/// Errors surfaced by the agent service and lifecycle.
///
/// Improver failures never appear here; they are folded into the
/// improvement result. Directory failures are logged and swallowed.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The conversation store failed.
    #[error(transparent)]
    Repository(#[from] ConversationRepositoryError),

    /// The inbound channel failed to start or stop.
    #[error(transparent)]
    Channel(#[from] ChannelError),

    /// The HTTP surface failed to start or stop.
    #[error(transparent)]
    Http(#[from] HttpSurfaceError),
}

/// Result type for agent operations.
pub type AgentResult<T> = Result<T, AgentError>;
