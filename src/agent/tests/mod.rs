//! Unit tests for the agent runtime.

mod lifecycle_tests;
