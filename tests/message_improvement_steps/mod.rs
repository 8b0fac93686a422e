//! Step definitions for message improvement scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
