//! Agent lifecycle: collaborator start/stop, directory announcements and
//! the inbound worker.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mockable::{Clock, DefaultClock};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::agent::{
    domain::{AgentRegistration, AgentStatus, ProcessOptions},
    error::AgentResult,
    ports::{ChannelError, DirectoryClient, HttpSurface, InboundChannel},
    services::AgentService,
};
use crate::config::AgentConfig;
use crate::conversation::{domain::Message, ports::ConversationRepository};

struct LifecycleState {
    inbound: Option<mpsc::UnboundedReceiver<Message>>,
    worker: Option<JoinHandle<()>>,
    heartbeat: Option<JoinHandle<()>>,
    registered: bool,
}

/// A running agent: the [`AgentService`] plus its collaborators.
///
/// Construction registers exactly one message handler and one error handler
/// on the inbound channel. Messages from the channel are queued and drained
/// by a single worker task, so appends to a conversation follow delivery
/// order.
///
/// Lifecycle: `Created -> Running -> Stopped -> Running ...`.
/// [`Agent::start`] and [`Agent::stop`] are serialised and idempotent.
pub struct Agent<R, C = DefaultClock>
where
    R: ConversationRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    service: Arc<AgentService<R, C>>,
    channel: Arc<dyn InboundChannel>,
    http: Arc<dyn HttpSurface>,
    directory: Option<Arc<dyn DirectoryClient>>,
    lifecycle: Mutex<LifecycleState>,
}

impl<R, C> Agent<R, C>
where
    R: ConversationRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Wires `service` to its inbound channel and HTTP surface.
    #[must_use]
    pub fn new(
        service: Arc<AgentService<R, C>>,
        channel: Arc<dyn InboundChannel>,
        http: Arc<dyn HttpSurface>,
    ) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        channel.on_message(Arc::new(move |message: Message| {
            if sender.send(message).is_err() {
                warn!("inbound worker has shut down; dropping message");
            }
        }));
        channel.on_error(Arc::new(|err: &ChannelError| {
            error!(error = %err, "inbound channel error");
        }));

        Self {
            service,
            channel,
            http,
            directory: None,
            lifecycle: Mutex::new(LifecycleState {
                inbound: Some(receiver),
                worker: None,
                heartbeat: None,
                registered: false,
            }),
        }
    }

    /// Announces the agent to `directory` on start.
    #[must_use]
    pub fn with_directory(mut self, directory: Arc<dyn DirectoryClient>) -> Self {
        self.directory = Some(directory);
        self
    }

    /// Returns the orchestrating service.
    #[must_use]
    pub const fn service(&self) -> &Arc<AgentService<R, C>> {
        &self.service
    }

    /// Returns whether the agent is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.service.is_running()
    }

    /// Returns the current status snapshot.
    #[must_use]
    pub fn status(&self) -> AgentStatus {
        self.service.status()
    }

    /// Returns the HTTP surface's bound address while running.
    #[must_use]
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.http.local_addr()
    }

    /// Starts the inbound channel and HTTP surface, then announces the agent.
    ///
    /// Directory registration is best effort: a failure is logged and
    /// startup continues. Starting a running agent does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`crate::agent::error::AgentError`] when a collaborator fails
    /// to start. The agent then stays stopped, and a channel that did start
    /// is stopped again.
    pub async fn start(&self) -> AgentResult<()> {
        let mut lifecycle = self.lifecycle.lock().await;
        if self.service.is_running() {
            debug!("agent already running");
            return Ok(());
        }

        self.channel.start().await?;
        let addr = match self.http.start().await {
            Ok(addr) => addr,
            Err(err) => {
                if let Err(stop_err) = self.channel.stop().await {
                    warn!(error = %stop_err, "failed to stop inbound channel after HTTP start failure");
                }
                return Err(err.into());
            }
        };
        self.service.set_base_url(AgentConfig::base_url_for(addr));

        if let Some(inbound) = lifecycle.inbound.take() {
            lifecycle.worker = Some(spawn_worker(Arc::clone(&self.service), inbound));
        }

        if let Some(directory) = &self.directory {
            lifecycle.registered = self.announce(directory.as_ref()).await;
            if let Some(period) = self.service.config().heartbeat_interval() {
                lifecycle.heartbeat = Some(spawn_heartbeat(
                    Arc::clone(directory),
                    self.service.config().agent_id.clone(),
                    period,
                ));
            }
        }

        self.service.mark_running();
        info!(agent_id = %self.service.config().agent_id, %addr, "agent started");
        Ok(())
    }

    /// Stops the HTTP surface and inbound channel after withdrawing the
    /// directory registration.
    ///
    /// Stopping a stopped agent does nothing.
    ///
    /// # Errors
    ///
    /// Returns the first collaborator error. Both collaborators are asked to
    /// stop and the agent is marked stopped regardless.
    pub async fn stop(&self) -> AgentResult<()> {
        let mut lifecycle = self.lifecycle.lock().await;
        if !self.service.is_running() {
            debug!("agent already stopped");
            return Ok(());
        }

        if let Some(heartbeat) = lifecycle.heartbeat.take() {
            heartbeat.abort();
        }
        if std::mem::take(&mut lifecycle.registered)
            && let Some(directory) = &self.directory
        {
            let agent_id = &self.service.config().agent_id;
            if let Err(err) = directory.unregister(agent_id).await {
                warn!(%agent_id, error = %err, "directory unregistration failed");
            }
        }

        let http_result = self.http.stop().await;
        let channel_result = self.channel.stop().await;
        self.service.mark_stopped();
        info!(agent_id = %self.service.config().agent_id, "agent stopped");

        http_result?;
        channel_result?;
        Ok(())
    }

    /// Stops then starts the agent.
    ///
    /// # Errors
    ///
    /// Returns the first error from [`Agent::stop`] or [`Agent::start`].
    pub async fn restart(&self) -> AgentResult<()> {
        self.stop().await?;
        self.start().await
    }

    async fn announce(&self, directory: &dyn DirectoryClient) -> bool {
        let registration = AgentRegistration::from_capabilities(
            self.service.capabilities(),
            self.service.base_url(),
        );
        match directory.register(&registration).await {
            Ok(()) => {
                info!(agent_id = %registration.agent_id, "registered with directory");
                true
            }
            Err(err) => {
                warn!(
                    agent_id = %registration.agent_id,
                    error = %err,
                    "directory registration failed; continuing without it"
                );
                false
            }
        }
    }
}

impl<R, C> Drop for Agent<R, C>
where
    R: ConversationRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    fn drop(&mut self) {
        let lifecycle = self.lifecycle.get_mut();
        if let Some(heartbeat) = lifecycle.heartbeat.take() {
            heartbeat.abort();
        }
        if let Some(worker) = lifecycle.worker.take() {
            worker.abort();
        }
    }
}

impl<R, C> std::fmt::Debug for Agent<R, C>
where
    R: ConversationRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("service", &self.service)
            .field("has_directory", &self.directory.is_some())
            .finish_non_exhaustive()
    }
}

fn spawn_worker<R, C>(
    service: Arc<AgentService<R, C>>,
    mut inbound: mpsc::UnboundedReceiver<Message>,
) -> JoinHandle<()>
where
    R: ConversationRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let options = ProcessOptions::new();
        while let Some(message) = inbound.recv().await {
            let message_id = message.id().clone();
            match service.process_message(message, &options).await {
                Ok(result) => debug!(
                    %message_id,
                    improvement = %result.improvement_type,
                    "inbound message processed"
                ),
                Err(err) => error!(%message_id, error = %err, "failed to process inbound message"),
            }
        }
        debug!("inbound worker finished");
    })
}

fn spawn_heartbeat(
    directory: Arc<dyn DirectoryClient>,
    agent_id: String,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let first_tick = Instant::now().checked_add(period).unwrap_or_else(Instant::now);
        let mut ticker = tokio::time::interval_at(first_tick, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match directory.heartbeat(&agent_id).await {
                Ok(()) => debug!(%agent_id, "directory heartbeat sent"),
                Err(err) => warn!(%agent_id, error = %err, "directory heartbeat failed"),
            }
        }
    })
}
