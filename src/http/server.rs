//! axum-backed [`HttpSurface`].

use std::net::SocketAddr;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use axum::Router;
use mockable::Clock;
use tokio::net::TcpListener;
use tokio::sync::{Mutex, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::agent::{
    ports::{HttpSurface, HttpSurfaceError, HttpSurfaceResult},
    services::AgentService,
};
use crate::conversation::ports::ConversationRepository;

struct RunningServer {
    addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<std::io::Result<()>>,
}

/// Serves a [`Router`] on a TCP listener with graceful shutdown.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use parley::agent::{ports::HttpSurface, services::AgentService};
/// use parley::config::AgentConfig;
/// use parley::http::AxumHttpSurface;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let config = AgentConfig { port: 0, ..AgentConfig::default() };
/// let service = Arc::new(AgentService::in_memory(config));
/// let surface = AxumHttpSurface::new(service);
/// let addr = surface.start().await?;
/// assert_ne!(addr.port(), 0);
/// surface.stop().await?;
/// # Ok(())
/// # }
/// ```
pub struct AxumHttpSurface {
    router: Router,
    bind_addr: String,
    running: Mutex<Option<RunningServer>>,
    local_addr: RwLock<Option<SocketAddr>>,
}

impl AxumHttpSurface {
    /// Serves [`super::router`] for `service` on the configured address.
    #[must_use]
    pub fn new<R, C>(service: Arc<AgentService<R, C>>) -> Self
    where
        R: ConversationRepository + 'static,
        C: Clock + Send + Sync + 'static,
    {
        let bind_addr = service.config().bind_addr();
        Self::with_router(super::router(service), bind_addr)
    }

    /// Serves an arbitrary router on `bind_addr`.
    #[must_use]
    pub fn with_router(router: Router, bind_addr: impl Into<String>) -> Self {
        Self {
            router,
            bind_addr: bind_addr.into(),
            running: Mutex::new(None),
            local_addr: RwLock::new(None),
        }
    }

    /// Returns the address the surface binds to on start.
    #[must_use]
    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }

    fn set_local_addr(&self, addr: Option<SocketAddr>) {
        *self
            .local_addr
            .write()
            .unwrap_or_else(PoisonError::into_inner) = addr;
    }
}

impl std::fmt::Debug for AxumHttpSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AxumHttpSurface")
            .field("bind_addr", &self.bind_addr)
            .field("local_addr", &self.local_addr())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl HttpSurface for AxumHttpSurface {
    async fn start(&self) -> HttpSurfaceResult<SocketAddr> {
        let mut running = self.running.lock().await;
        if let Some(server) = running.as_ref() {
            return Ok(server.addr);
        }

        let listener =
            TcpListener::bind(&self.bind_addr)
                .await
                .map_err(|source| HttpSurfaceError::Bind {
                    addr: self.bind_addr.clone(),
                    source: Arc::new(source),
                })?;
        let addr = listener.local_addr().map_err(HttpSurfaceError::server)?;
        let (shutdown, signal) = oneshot::channel::<()>();
        let app = self.router.clone();
        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    if signal.await.is_err() {
                        debug!("HTTP shutdown handle dropped");
                    }
                })
                .await
        });

        *running = Some(RunningServer {
            addr,
            shutdown,
            task,
        });
        self.set_local_addr(Some(addr));
        info!(%addr, "HTTP surface listening");
        Ok(addr)
    }

    async fn stop(&self) -> HttpSurfaceResult<()> {
        let Some(server) = self.running.lock().await.take() else {
            return Ok(());
        };
        self.set_local_addr(None);

        if server.shutdown.send(()).is_err() {
            debug!(addr = %server.addr, "HTTP server already exited");
        }
        match server.task.await {
            Ok(Ok(())) => {
                info!(addr = %server.addr, "HTTP surface stopped");
                Ok(())
            }
            Ok(Err(err)) => Err(HttpSurfaceError::server(err)),
            Err(join_err) => Err(HttpSurfaceError::server(join_err)),
        }
    }

    fn local_addr(&self) -> Option<SocketAddr> {
        *self
            .local_addr
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
