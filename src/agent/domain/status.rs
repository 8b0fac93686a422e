//! Derived agent status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state reported by an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentState {
    /// Collaborators are started and messages are being accepted.
    Running,
    /// The agent has not been started, or has been stopped.
    Stopped,
    /// The agent failed and needs attention.
    Error,
}

impl AgentState {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Stopped => "stopped",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// URLs of the routes an agent serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentEndpoints {
    /// Base URL of the HTTP surface.
    pub base_url: String,
    /// Liveness probe.
    pub health: String,
    /// Status report.
    pub status: String,
    /// Inbound message delivery.
    pub receive: String,
    /// Message submission from plain text.
    pub send: String,
}

impl AgentEndpoints {
    /// Derives every endpoint from `base_url`.
    #[must_use]
    pub fn from_base_url(base_url: impl Into<String>) -> Self {
        let base = base_url.into().trim_end_matches('/').to_owned();
        Self {
            health: format!("{base}/health"),
            status: format!("{base}/status"),
            receive: format!("{base}/receive"),
            send: format!("{base}/send"),
            base_url: base,
        }
    }
}

/// Snapshot of an agent's runtime state, recomputed on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentStatus {
    /// Agent identifier.
    pub agent_id: String,
    /// Lifecycle state.
    pub status: AgentState,
    /// Milliseconds since the last start; `0` while stopped.
    pub uptime: u64,
    /// Messages processed since construction.
    pub message_count: u64,
    /// When the last message was processed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<DateTime<Utc>>,
    /// Routes the agent serves.
    pub endpoints: AgentEndpoints,
}
