//! In-memory implementation of the [`ConversationRepository`] port.
//!
//! All state lives in the process and is lost on restart.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};

use crate::conversation::{
    domain::{Conversation, ConversationId, Message, Metadata},
    error::ConversationRepositoryError,
    ports::repository::{ConversationRepository, ConversationRepositoryResult},
};

/// In-memory implementation of [`ConversationRepository`].
///
/// Thread-safe via an internal [`RwLock`]; each append happens under a single
/// write lock so concurrent appends to the same conversation land in the
/// order the lock is acquired. Conversations grow without bound unless a
/// per-conversation message limit is configured.
///
/// # Example
///
/// ```
/// use parley::conversation::adapters::memory::InMemoryConversationRepository;
///
/// let repo = InMemoryConversationRepository::new().with_message_limit(500);
/// assert!(repo.is_empty());
/// ```
pub struct InMemoryConversationRepository<C = DefaultClock> {
    conversations: Arc<RwLock<HashMap<ConversationId, Conversation>>>,
    clock: Arc<C>,
    message_limit: Option<usize>,
}

impl InMemoryConversationRepository {
    /// Creates an empty repository using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }
}

impl Default for InMemoryConversationRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for InMemoryConversationRepository<C> {
    fn clone(&self) -> Self {
        Self {
            conversations: Arc::clone(&self.conversations),
            clock: Arc::clone(&self.clock),
            message_limit: self.message_limit,
        }
    }
}

impl<C> InMemoryConversationRepository<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty repository stamping timestamps from `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<C>) -> Self {
        Self {
            conversations: Arc::new(RwLock::new(HashMap::new())),
            clock,
            message_limit: None,
        }
    }

    /// Keeps at most `limit` messages per conversation, evicting the oldest.
    #[must_use]
    pub const fn with_message_limit(mut self, limit: usize) -> Self {
        self.message_limit = Some(limit);
        self
    }

    /// Returns the number of stored conversations.
    ///
    /// Returns `0` if the internal lock is poisoned. For error-propagating
    /// access, use the repository trait methods instead.
    #[must_use]
    pub fn len(&self) -> usize {
        self.conversations
            .read()
            .map(|guard| guard.len())
            .unwrap_or(0)
    }

    /// Returns `true` if no conversations are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock_poisoned(err: impl std::fmt::Display) -> ConversationRepositoryError {
    ConversationRepositoryError::storage(std::io::Error::other(format!("lock poisoned: {err}")))
}

#[async_trait]
impl<C> ConversationRepository for InMemoryConversationRepository<C>
where
    C: Clock + Send + Sync,
{
    async fn append(&self, message: Message) -> ConversationRepositoryResult<()> {
        let mut guard = self.conversations.write().map_err(lock_poisoned)?;

        let conversation = guard
            .entry(message.conversation_id().clone())
            .or_insert_with_key(|id| Conversation::new(id.clone(), None, &*self.clock));
        conversation.append(message, &*self.clock);
        if let Some(limit) = self.message_limit {
            conversation.retain_latest(limit);
        }
        Ok(())
    }

    async fn create(
        &self,
        metadata: Option<Metadata>,
    ) -> ConversationRepositoryResult<Conversation> {
        let mut guard = self.conversations.write().map_err(lock_poisoned)?;

        let mut id = ConversationId::generate();
        while guard.contains_key(&id) {
            id = ConversationId::generate();
        }

        let conversation = Conversation::new(id.clone(), metadata, &*self.clock);
        guard.insert(id, conversation.clone());
        Ok(conversation)
    }

    async fn find_by_id(
        &self,
        id: &ConversationId,
    ) -> ConversationRepositoryResult<Option<Conversation>> {
        let guard = self.conversations.read().map_err(lock_poisoned)?;
        Ok(guard.get(id).cloned())
    }

    async fn list(&self) -> ConversationRepositoryResult<Vec<Conversation>> {
        let guard = self.conversations.read().map_err(lock_poisoned)?;

        let mut conversations: Vec<Conversation> = guard.values().cloned().collect();
        conversations.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(b.id()))
        });
        Ok(conversations)
    }

    async fn delete(&self, id: &ConversationId) -> ConversationRepositoryResult<bool> {
        let mut guard = self.conversations.write().map_err(lock_poisoned)?;
        Ok(guard.remove(id).is_some())
    }
}
