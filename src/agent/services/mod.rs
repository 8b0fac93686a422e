//! Agent services: the processing pipeline and the runtime lifecycle.

mod lifecycle;
mod orchestrator;

pub use lifecycle::Agent;
pub use orchestrator::AgentService;
