//! Pluggable message improvement.
//!
//! An improver is a named text transformation. The [`services::ImproverRegistry`]
//! owns every improver, tracks the active one, and applies at most one
//! improver per call. Improvement is fail-open: a missing, failing or
//! panicking improver yields the original text with
//! [`domain::ImprovementType::None`] and never an error.
//!
//! # Architecture
//!
//! - **Domain**: [`domain::MessageImprovementResult`], [`domain::ImprovementType`]
//! - **Ports**: [`ports::MessageImprover`]
//! - **Adapters**: built-in improvers in [`adapters::builtin`]
//! - **Services**: [`services::ImproverRegistry`]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
