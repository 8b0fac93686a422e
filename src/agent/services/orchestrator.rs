//! Message processing and derived agent state.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock};
use tracing::{debug, warn};

use crate::agent::{
    domain::{AgentCapabilities, AgentEndpoints, AgentState, AgentStatus, ProcessOptions},
    error::AgentResult,
};
use crate::config::AgentConfig;
use crate::conversation::{
    adapters::memory::InMemoryConversationRepository,
    domain::{ContentType, Conversation, ConversationId, Message, Metadata, Role},
    ports::ConversationRepository,
};
use crate::improvement::{domain::MessageImprovementResult, services::ImproverRegistry};

const CONVERSATION_ID_KEY: &str = "conversationId";
const MESSAGE_ID_KEY: &str = "messageId";
const ROLE_KEY: &str = "role";

/// Owns the improver registry and conversation store and runs the
/// processing pipeline.
///
/// Counters and timestamps are updated without holding any lock across an
/// `.await`, so the service can be shared freely behind an [`Arc`].
pub struct AgentService<R, C = DefaultClock>
where
    R: ConversationRepository,
    C: Clock + Send + Sync,
{
    config: AgentConfig,
    registry: ImproverRegistry,
    repository: Arc<R>,
    clock: Arc<C>,
    running: AtomicBool,
    message_count: AtomicU64,
    started_at: RwLock<Option<DateTime<Utc>>>,
    last_activity: RwLock<Option<DateTime<Utc>>>,
    base_url: RwLock<String>,
}

impl AgentService<InMemoryConversationRepository, DefaultClock> {
    /// Creates a service with the built-in improvers and an in-memory store.
    #[must_use]
    pub fn in_memory(config: AgentConfig) -> Self {
        Self::new(
            config,
            ImproverRegistry::new(),
            Arc::new(InMemoryConversationRepository::new()),
            Arc::new(DefaultClock),
        )
    }
}

impl<R, C> AgentService<R, C>
where
    R: ConversationRepository,
    C: Clock + Send + Sync,
{
    /// Creates a stopped service.
    ///
    /// When `config.default_improver` names a registered improver it becomes
    /// active; an unknown name is logged and ignored.
    #[must_use]
    pub fn new(
        config: AgentConfig,
        registry: ImproverRegistry,
        repository: Arc<R>,
        clock: Arc<C>,
    ) -> Self {
        if let Some(name) = &config.default_improver
            && !registry.set_active(name)
        {
            warn!(improver = %name, "configured default improver is not registered");
        }
        let base_url = config.base_url();
        Self {
            config,
            registry,
            repository,
            clock,
            running: AtomicBool::new(false),
            message_count: AtomicU64::new(0),
            started_at: RwLock::new(None),
            last_activity: RwLock::new(None),
            base_url: RwLock::new(base_url),
        }
    }

    /// Stores `message` and improves its first content block.
    ///
    /// The message counter is incremented before anything else, so it counts
    /// every call including failed ones. Improver failures never surface as
    /// errors; they produce a `none` result.
    ///
    /// # Errors
    ///
    /// Returns [`crate::agent::error::AgentError::Repository`] when the
    /// conversation store rejects the append.
    pub async fn process_message(
        &self,
        message: Message,
        options: &ProcessOptions,
    ) -> AgentResult<MessageImprovementResult> {
        self.message_count.fetch_add(1, Ordering::SeqCst);
        *self
            .last_activity
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(self.clock.utc());

        let text = message.text().to_owned();
        let message_id = message.id().clone();
        let conversation_id = message.conversation_id().clone();
        let role = message.role();
        debug!(%message_id, %conversation_id, %role, "processing message");

        self.repository.append(message).await?;

        if !options.should_improve() {
            let metadata = Metadata::new()
                .with(MESSAGE_ID_KEY, message_id.as_str())
                .with(CONVERSATION_ID_KEY, conversation_id.as_str());
            return Ok(MessageImprovementResult::unchanged(text, Some(metadata)));
        }

        let improver = options
            .improver_name
            .clone()
            .unwrap_or_else(|| self.registry.active());
        let pipeline = Metadata::new()
            .with(CONVERSATION_ID_KEY, conversation_id.as_str())
            .with(MESSAGE_ID_KEY, message_id.as_str())
            .with(ROLE_KEY, role.as_str());
        let mut context = options.context.clone().unwrap_or_default();
        context.merge(&pipeline);

        Ok(self.registry.improve_with(&improver, &text, &context).await)
    }

    /// Builds a message stamped with the service clock.
    ///
    /// A fresh conversation id is generated when none is given.
    #[must_use]
    pub fn compose_message(
        &self,
        conversation_id: Option<ConversationId>,
        role: Role,
        text: impl Into<String>,
    ) -> Message {
        Message::builder(conversation_id.unwrap_or_else(ConversationId::generate), role)
            .with_text(text)
            .build(&*self.clock)
    }

    /// Returns the current status snapshot.
    #[must_use]
    pub fn status(&self) -> AgentStatus {
        let running = self.is_running();
        let started_at = *self
            .started_at
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let uptime = match started_at {
            Some(started) if running => {
                let elapsed = self.clock.utc() - started;
                u64::try_from(elapsed.num_milliseconds()).unwrap_or(0)
            }
            _ => 0,
        };

        AgentStatus {
            agent_id: self.config.agent_id.clone(),
            status: if running {
                AgentState::Running
            } else {
                AgentState::Stopped
            },
            uptime,
            message_count: self.message_count(),
            last_activity: *self
                .last_activity
                .read()
                .unwrap_or_else(PoisonError::into_inner),
            endpoints: AgentEndpoints::from_base_url(self.base_url()),
        }
    }

    /// Returns the advertised capabilities.
    #[must_use]
    pub fn capabilities(&self) -> AgentCapabilities {
        AgentCapabilities {
            agent_id: self.config.agent_id.clone(),
            name: self.config.name.clone(),
            version: self.config.version.clone(),
            description: self.config.description.clone(),
            capabilities: self.config.capabilities.clone(),
            improvers: self.registry.list(),
            active_improver: self.registry.active(),
            content_types: ContentType::ALL.to_vec(),
        }
    }

    /// Returns the configuration the service was built with.
    #[must_use]
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Returns the improver registry.
    #[must_use]
    pub const fn improvers(&self) -> &ImproverRegistry {
        &self.registry
    }

    /// Returns the number of messages processed so far.
    #[must_use]
    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Returns whether the agent is marked running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Marks the agent running and restarts the uptime clock.
    pub fn mark_running(&self) {
        *self
            .started_at
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(self.clock.utc());
        self.running.store(true, Ordering::SeqCst);
    }

    /// Marks the agent stopped.
    pub fn mark_stopped(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Returns the base URL advertised in status and registration.
    #[must_use]
    pub fn base_url(&self) -> String {
        self.base_url
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the advertised base URL, e.g. once an ephemeral port is bound.
    pub fn set_base_url(&self, base_url: impl Into<String>) {
        *self.base_url.write().unwrap_or_else(PoisonError::into_inner) = base_url.into();
    }

    /// Looks up a conversation.
    ///
    /// # Errors
    ///
    /// Returns [`crate::agent::error::AgentError::Repository`] on store failure.
    pub async fn conversation(&self, id: &ConversationId) -> AgentResult<Option<Conversation>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Lists all conversations, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`crate::agent::error::AgentError::Repository`] on store failure.
    pub async fn conversations(&self) -> AgentResult<Vec<Conversation>> {
        Ok(self.repository.list().await?)
    }

    /// Creates an empty conversation with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns [`crate::agent::error::AgentError::Repository`] on store failure.
    pub async fn create_conversation(
        &self,
        metadata: Option<Metadata>,
    ) -> AgentResult<Conversation> {
        Ok(self.repository.create(metadata).await?)
    }

    /// Deletes a conversation, returning whether it existed.
    ///
    /// # Errors
    ///
    /// Returns [`crate::agent::error::AgentError::Repository`] on store failure.
    pub async fn delete_conversation(&self, id: &ConversationId) -> AgentResult<bool> {
        Ok(self.repository.delete(id).await?)
    }
}

impl<R, C> std::fmt::Debug for AgentService<R, C>
where
    R: ConversationRepository,
    C: Clock + Send + Sync,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentService")
            .field("agent_id", &self.config.agent_id)
            .field("running", &self.is_running())
            .field("message_count", &self.message_count())
            .finish_non_exhaustive()
    }
}
