//! The conversation aggregate: an append-only, arrival-ordered message log.

use super::{ConversationId, Message, Metadata};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// An ordered thread of messages.
///
/// # Invariants
///
/// - `messages` is in arrival order; nothing is reordered or deduplicated
/// - `updated_at >= created_at`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    id: ConversationId,
    messages: Vec<Message>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<Metadata>,
}

impl Conversation {
    /// Creates an empty conversation stamped with the current clock time.
    #[must_use]
    pub fn new(id: ConversationId, metadata: Option<Metadata>, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id,
            messages: Vec::new(),
            created_at: timestamp,
            updated_at: timestamp,
            metadata,
        }
    }

    /// Returns the conversation identifier.
    #[must_use]
    pub const fn id(&self) -> &ConversationId {
        &self.id
    }

    /// Returns the messages in arrival order.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` when no message has been appended yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the timestamp of the latest append.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the conversation-level metadata.
    #[must_use]
    pub const fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    /// Appends a message and refreshes `updated_at`.
    ///
    /// `updated_at` never moves backwards, even if the clock does.
    pub fn append(&mut self, message: Message, clock: &impl Clock) {
        self.messages.push(message);
        self.updated_at = clock.utc().max(self.created_at);
    }

    /// Drops the oldest messages so at most `limit` remain.
    pub fn retain_latest(&mut self, limit: usize) {
        let excess = self.messages.len().saturating_sub(limit);
        if excess > 0 {
            self.messages.drain(..excess);
        }
    }
}
