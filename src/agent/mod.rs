//! The agent runtime.
//!
//! [`services::AgentService`] owns the improver registry and conversation
//! store and runs the processing pipeline. [`services::Agent`] wraps it with
//! the collaborators an agent process needs: an inbound channel, an HTTP
//! surface and an optional directory client.
//!
//! # Architecture
//!
//! - **Domain**: [`domain::AgentStatus`], [`domain::AgentCapabilities`],
//!   [`domain::ProcessOptions`], [`domain::AgentRegistration`]
//! - **Ports**: [`ports::InboundChannel`], [`ports::HttpSurface`],
//!   [`ports::DirectoryClient`]
//! - **Adapters**: [`adapters::LocalBridge`], [`adapters::HttpDirectoryClient`]
//! - **Services**: [`services::AgentService`], [`services::Agent`]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
