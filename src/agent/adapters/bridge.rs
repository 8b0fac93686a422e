//! In-process inbound channel.

use crate::agent::ports::{
    ChannelError, ChannelResult, ErrorHandler, InboundChannel, MessageHandler,
};
use crate::conversation::domain::Message;
use async_trait::async_trait;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

/// In-process publish/subscribe channel.
///
/// Never opens a socket. Messages enter through [`LocalBridge::publish`]
/// and reach every registered handler synchronously, in registration order.
/// Clones share the same handler lists and running flag.
///
/// # Examples
///
/// ```
/// use parley::agent::adapters::LocalBridge;
/// use parley::agent::ports::{ChannelError, InboundChannel};
/// use parley::conversation::domain::{ConversationId, Message, Role};
/// use mockable::DefaultClock;
/// use std::sync::Arc;
///
/// let bridge = LocalBridge::new();
/// bridge.on_message(Arc::new(|_message| {}));
///
/// let message = Message::builder(ConversationId::new("c1"), Role::User)
///     .with_text("hello")
///     .build(&DefaultClock);
/// assert!(matches!(bridge.publish(message), Err(ChannelError::NotRunning)));
/// ```
#[derive(Clone, Default)]
pub struct LocalBridge {
    state: Arc<RwLock<BridgeState>>,
}

#[derive(Default)]
struct BridgeState {
    running: bool,
    message_handlers: Vec<MessageHandler>,
    error_handlers: Vec<ErrorHandler>,
}

impl LocalBridge {
    /// Creates a stopped bridge with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read_state(&self) -> RwLockReadGuard<'_, BridgeState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, BridgeState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Delivers `message` to every message handler.
    ///
    /// Returns the number of handlers reached.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::NotRunning`] when the bridge is stopped.
    pub fn publish(&self, message: Message) -> ChannelResult<usize> {
        let handlers = {
            let state = self.read_state();
            if !state.running {
                return Err(ChannelError::NotRunning);
            }
            state.message_handlers.clone()
        };

        debug!(
            message_id = %message.id(),
            conversation_id = %message.conversation_id(),
            handlers = handlers.len(),
            "bridge delivering message"
        );
        for handler in &handlers {
            handler(message.clone());
        }
        Ok(handlers.len())
    }

    /// Delivers `error` to every error handler, returning how many ran.
    pub fn report_error(&self, error: &ChannelError) -> usize {
        let handlers = self.read_state().error_handlers.clone();
        for handler in &handlers {
            handler(error);
        }
        handlers.len()
    }
}

impl fmt::Debug for LocalBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.read_state();
        f.debug_struct("LocalBridge")
            .field("running", &state.running)
            .field("message_handlers", &state.message_handlers.len())
            .field("error_handlers", &state.error_handlers.len())
            .finish()
    }
}

#[async_trait]
impl InboundChannel for LocalBridge {
    async fn start(&self) -> ChannelResult<()> {
        self.write_state().running = true;
        info!("local bridge started");
        Ok(())
    }

    async fn stop(&self) -> ChannelResult<()> {
        let was_running = std::mem::replace(&mut self.write_state().running, false);
        if was_running {
            info!("local bridge stopped");
        }
        Ok(())
    }

    fn on_message(&self, handler: MessageHandler) {
        self.write_state().message_handlers.push(handler);
    }

    fn on_error(&self, handler: ErrorHandler) {
        self.write_state().error_handlers.push(handler);
    }

    fn is_running(&self) -> bool {
        self.read_state().running
    }
}
