//! Repository port for conversation storage.

use crate::conversation::{
    domain::{Conversation, ConversationId, Message, Metadata},
    error::ConversationRepositoryError,
};
use async_trait::async_trait;

/// Result type for repository operations.
pub type ConversationRepositoryResult<T> = Result<T, ConversationRepositoryError>;

/// Port for conversation storage.
///
/// # Implementation Notes
///
/// Implementations must ensure:
/// - appends to one conversation keep their arrival order
/// - a conversation is created on the first append that references it
/// - conversations are only removed by [`ConversationRepository::delete`]
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Appends a message to its conversation, creating the conversation if
    /// it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`ConversationRepositoryError`] when the storage fails.
    async fn append(&self, message: Message) -> ConversationRepositoryResult<()>;

    /// Creates an empty conversation with a fresh identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ConversationRepositoryError`] when the storage fails.
    async fn create(&self, metadata: Option<Metadata>)
    -> ConversationRepositoryResult<Conversation>;

    /// Retrieves a conversation by identifier.
    ///
    /// Returns `None` if the conversation does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConversationRepositoryError`] when the storage fails.
    async fn find_by_id(
        &self,
        id: &ConversationId,
    ) -> ConversationRepositoryResult<Option<Conversation>>;

    /// Returns every conversation, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`ConversationRepositoryError`] when the storage fails.
    async fn list(&self) -> ConversationRepositoryResult<Vec<Conversation>>;

    /// Removes a conversation and all of its messages.
    ///
    /// Returns whether the conversation existed.
    ///
    /// # Errors
    ///
    /// Returns [`ConversationRepositoryError`] when the storage fails.
    async fn delete(&self, id: &ConversationId) -> ConversationRepositoryResult<bool>;
}
