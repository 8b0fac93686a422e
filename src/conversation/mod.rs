//! Conversation tracking for the agent.
//!
//! Conversations are created lazily on the first message that references
//! them and keep their messages in arrival order.
//!
//! # Architecture
//!
//! - **Domain**: [`domain::Message`], [`domain::Conversation`], [`domain::ContentBlock`], etc.
//! - **Ports**: [`ports::repository::ConversationRepository`]
//! - **Adapters**: [`adapters::memory::InMemoryConversationRepository`]
//!
//! # Example
//!
//! ```
//! use parley::conversation::adapters::memory::InMemoryConversationRepository;
//! use parley::conversation::domain::{ConversationId, Message, Role};
//! use parley::conversation::ports::ConversationRepository;
//! use mockable::DefaultClock;
//!
//! # tokio_test_block_on(async {
//! let repo = InMemoryConversationRepository::new();
//! let message = Message::builder(ConversationId::new("c1"), Role::User)
//!     .with_text("hello")
//!     .build(&DefaultClock);
//! repo.append(message).await.expect("append succeeds");
//!
//! let stored = repo
//!     .find_by_id(&ConversationId::new("c1"))
//!     .await
//!     .expect("lookup succeeds")
//!     .expect("conversation exists");
//! assert_eq!(stored.len(), 1);
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(future: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().expect("runtime").block_on(future)
//! # }
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;

#[cfg(test)]
mod tests;
