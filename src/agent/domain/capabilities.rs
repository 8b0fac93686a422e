//! Advertised agent capabilities.

use crate::conversation::domain::ContentType;
use serde::{Deserialize, Serialize};

/// What an agent can do, derived from its configuration and registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCapabilities {
    /// Agent identifier.
    pub agent_id: String,
    /// Human-readable name.
    pub name: String,
    /// Agent version.
    pub version: String,
    /// Free-form description.
    pub description: String,
    /// Configured capability tags.
    pub capabilities: Vec<String>,
    /// Registered improver names, sorted.
    pub improvers: Vec<String>,
    /// Currently active improver.
    pub active_improver: String,
    /// Content kinds accepted in messages.
    pub content_types: Vec<ContentType>,
}
