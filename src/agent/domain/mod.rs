//! Domain types for the agent runtime.
//!
//! Status, capabilities and registration payloads are derived on demand from
//! orchestrator state and never persisted.

mod capabilities;
mod options;
mod registration;
mod status;

pub use capabilities::AgentCapabilities;
pub use options::ProcessOptions;
pub use registration::AgentRegistration;
pub use status::{AgentEndpoints, AgentState, AgentStatus};
