//! Domain types for the conversation subsystem.
//!
//! Pure value types with no infrastructure dependencies, serialisable via
//! serde with the camelCase keys used on the wire.

mod content;
mod conversation;
mod ids;
mod message;
mod metadata;
mod role;

pub use content::{ContentBlock, ContentType};
pub use conversation::Conversation;
pub use ids::{ConversationId, MessageId};
pub use message::{Message, MessageBuilder};
pub use metadata::{Metadata, MetadataValue};
pub use role::{ParseRoleError, Role};
