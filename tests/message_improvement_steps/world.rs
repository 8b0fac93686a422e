//! Shared world state for message improvement BDD scenarios.

use mockable::DefaultClock;
use parley::{
    agent::services::AgentService,
    config::AgentConfig,
    conversation::adapters::memory::InMemoryConversationRepository,
    improvement::domain::MessageImprovementResult,
};
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestAgentService = AgentService<InMemoryConversationRepository, DefaultClock>;

/// Scenario world for message improvement behaviour tests.
pub struct ImprovementWorld {
    /// The agent service under test.
    pub service: TestAgentService,
    /// Result of the last processed message.
    pub last_result: Option<MessageImprovementResult>,
    /// Outcome of the last improver removal.
    pub last_removal: Option<bool>,
}

impl ImprovementWorld {
    /// Creates a world around a fresh in-memory agent.
    #[must_use]
    pub fn new() -> Self {
        Self {
            service: AgentService::in_memory(AgentConfig::new("bdd-agent", "BDD Agent")),
            last_result: None,
            last_removal: None,
        }
    }

    /// Returns the last improvement result or an error when none exists.
    pub fn result(&self) -> Result<&MessageImprovementResult, eyre::Report> {
        self.last_result
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no message has been processed in this scenario"))
    }
}

impl Default for ImprovementWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ImprovementWorld {
    ImprovementWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
