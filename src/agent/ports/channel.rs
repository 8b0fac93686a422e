//! Inbound channel port.

use crate::conversation::domain::Message;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Callback invoked for every delivered message.
pub type MessageHandler = Arc<dyn Fn(Message) + Send + Sync>;

/// Callback invoked for every transport error.
pub type ErrorHandler = Arc<dyn Fn(&ChannelError) + Send + Sync>;

/// Result type for inbound channel operations.
pub type ChannelResult<T> = Result<T, ChannelError>;

/// Source of inbound messages for an agent.
///
/// Implementations fan each delivery out to every registered handler, in
/// registration order.
#[async_trait]
pub trait InboundChannel: Send + Sync {
    /// Starts accepting deliveries.
    async fn start(&self) -> ChannelResult<()>;

    /// Stops accepting deliveries. Stopping a stopped channel is a no-op.
    async fn stop(&self) -> ChannelResult<()>;

    /// Registers a message handler.
    fn on_message(&self, handler: MessageHandler);

    /// Registers an error handler.
    fn on_error(&self, handler: ErrorHandler);

    /// Returns whether deliveries are currently accepted.
    fn is_running(&self) -> bool;
}

/// Errors reported by inbound channel adapters.
#[derive(Debug, Clone, Error)]
pub enum ChannelError {
    /// A delivery was attempted while the channel was stopped.
    #[error("inbound channel is not running")]
    NotRunning,

    /// The underlying transport failed.
    #[error("inbound channel transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl ChannelError {
    /// Wraps a transport failure.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
