//! Unit tests for agent configuration.
