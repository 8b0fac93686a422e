//! Directory registration payload.

use serde::{Deserialize, Serialize};

use super::AgentCapabilities;

/// What an agent announces to the directory service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentRegistration {
    /// Agent identifier.
    pub agent_id: String,
    /// Human-readable name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Agent version.
    pub version: String,
    /// Base URL the agent is reachable at.
    pub endpoint: String,
    /// Configured capability tags.
    pub capabilities: Vec<String>,
    /// Registered improver names.
    pub improvers: Vec<String>,
}

impl AgentRegistration {
    /// Builds a registration from advertised capabilities and an endpoint.
    #[must_use]
    pub fn from_capabilities(capabilities: AgentCapabilities, endpoint: impl Into<String>) -> Self {
        Self {
            agent_id: capabilities.agent_id,
            name: capabilities.name,
            description: capabilities.description,
            version: capabilities.version,
            endpoint: endpoint.into(),
            capabilities: capabilities.capabilities,
            improvers: capabilities.improvers,
        }
    }
}
