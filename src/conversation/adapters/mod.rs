//! Storage adapters for the conversation module.
//!
//! - [`memory::InMemoryConversationRepository`]: thread-safe in-process store

pub mod memory;
