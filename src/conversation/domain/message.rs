//! The message value received by the agent.
//!
//! Messages are created by callers or transports and are immutable once the
//! agent receives them.

use super::{ContentBlock, ConversationId, MessageId, Metadata, Role};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A message within a conversation.
///
/// Only the first content block is considered for improvement; any further
/// blocks travel with the message untouched. An empty content list is
/// accepted and reads as empty text.
///
/// # Examples
///
/// ```
/// use parley::conversation::domain::{ContentBlock, ConversationId, Message, MessageId, Role};
/// use mockable::DefaultClock;
///
/// let message = Message::new(
///     MessageId::new("m1"),
///     ConversationId::new("c1"),
///     Role::User,
///     vec![ContentBlock::text("hello")],
///     &DefaultClock,
/// );
/// assert_eq!(message.text(), "hello");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    id: MessageId,
    role: Role,
    #[serde(default)]
    content: Vec<ContentBlock>,
    timestamp: DateTime<Utc>,
    conversation_id: ConversationId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<Metadata>,
}

impl Message {
    /// Creates a message stamped with the current clock time.
    #[must_use]
    pub fn new(
        id: MessageId,
        conversation_id: ConversationId,
        role: Role,
        content: Vec<ContentBlock>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id,
            role,
            content,
            timestamp: clock.utc(),
            conversation_id,
            metadata: None,
        }
    }

    /// Returns a builder for messages with optional fields.
    #[must_use]
    pub fn builder(conversation_id: ConversationId, role: Role) -> MessageBuilder {
        MessageBuilder::new(conversation_id, role)
    }

    /// Returns the message identifier.
    #[must_use]
    pub const fn id(&self) -> &MessageId {
        &self.id
    }

    /// Returns the author role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns every content block.
    #[must_use]
    pub fn content(&self) -> &[ContentBlock] {
        &self.content
    }

    /// Returns the payload of the first content block, or `""` when the
    /// message carries no content.
    #[must_use]
    pub fn text(&self) -> &str {
        self.content
            .first()
            .map_or("", |block| block.content.as_str())
    }

    /// Returns the time the message was created.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns the owning conversation identifier.
    #[must_use]
    pub const fn conversation_id(&self) -> &ConversationId {
        &self.conversation_id
    }

    /// Returns the message-level metadata.
    #[must_use]
    pub const fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }
}

/// Builder for [`Message`] values.
#[derive(Debug)]
pub struct MessageBuilder {
    id: Option<MessageId>,
    conversation_id: ConversationId,
    role: Role,
    content: Vec<ContentBlock>,
    metadata: Option<Metadata>,
}

impl MessageBuilder {
    /// Creates a builder for a message in `conversation_id`.
    #[must_use]
    pub const fn new(conversation_id: ConversationId, role: Role) -> Self {
        Self {
            id: None,
            conversation_id,
            role,
            content: Vec::new(),
            metadata: None,
        }
    }

    /// Sets an explicit identifier; a random one is generated otherwise.
    #[must_use]
    pub fn with_id(mut self, id: MessageId) -> Self {
        self.id = Some(id);
        self
    }

    /// Appends a content block.
    #[must_use]
    pub fn with_content(mut self, block: ContentBlock) -> Self {
        self.content.push(block);
        self
    }

    /// Appends a text block.
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_content(ContentBlock::text(text))
    }

    /// Sets message-level metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Builds the message.
    #[must_use]
    pub fn build(self, clock: &impl Clock) -> Message {
        Message {
            id: self.id.unwrap_or_else(MessageId::generate),
            role: self.role,
            content: self.content,
            timestamp: clock.utc(),
            conversation_id: self.conversation_id,
            metadata: self.metadata,
        }
    }
}
