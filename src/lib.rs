//! Parley: a lightweight agent runtime with pluggable message improvement.
//!
//! An agent accepts messages, runs them through a named, swappable text
//! transformation (an "improver"), records them in conversations, serves an
//! HTTP API, and optionally announces itself to a directory service.
//!
//! # Architecture
//!
//! Parley follows hexagonal architecture principles:
//!
//! - **Domain**: Pure value types with no infrastructure dependencies
//! - **Ports**: Trait interfaces for storage, transport and discovery
//! - **Adapters**: Concrete implementations (in-memory store, axum, reqwest)
//!
//! # Modules
//!
//! - [`improvement`]: Improver registry, built-in improvers, result envelope
//! - [`conversation`]: Messages and append-only conversation storage
//! - [`agent`]: Processing pipeline, status, lifecycle and collaborators
//! - [`http`]: JSON routes over the agent service
//! - [`config`]: TOML configuration
//! - [`telemetry`]: Tracing subscriber setup

pub mod agent;
pub mod config;
pub mod conversation;
pub mod http;
pub mod improvement;
pub mod telemetry;
