//! Port trait definitions for message improvement.

pub mod improver;

pub use improver::{FnImprover, MessageImprover};
