//! Unit tests for the improvement module.

mod registry_tests;
