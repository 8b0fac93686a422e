//! Port trait definitions for the conversation subsystem.

pub mod repository;

pub use repository::{ConversationRepository, ConversationRepositoryResult};
