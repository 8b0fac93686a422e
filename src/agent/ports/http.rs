//! HTTP surface port.

use async_trait::async_trait;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;

/// Result type for HTTP surface operations.
pub type HttpSurfaceResult<T> = Result<T, HttpSurfaceError>;

/// Serves the agent's HTTP routes.
#[async_trait]
pub trait HttpSurface: Send + Sync {
    /// Binds and starts serving, returning the bound address.
    ///
    /// Starting a running surface returns its current address.
    async fn start(&self) -> HttpSurfaceResult<SocketAddr>;

    /// Stops serving and waits for in-flight requests to drain.
    async fn stop(&self) -> HttpSurfaceResult<()>;

    /// Returns the bound address while serving.
    fn local_addr(&self) -> Option<SocketAddr>;
}

/// Errors returned by HTTP surface adapters.
#[derive(Debug, Clone, Error)]
pub enum HttpSurfaceError {
    /// The listen address could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Requested address.
        addr: String,
        /// Underlying I/O error.
        source: Arc<std::io::Error>,
    },

    /// The server failed while running or shutting down.
    #[error("HTTP server error: {0}")]
    Server(Arc<dyn std::error::Error + Send + Sync>),
}

impl HttpSurfaceError {
    /// Wraps a server failure.
    pub fn server(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Server(Arc::new(err))
    }
}
