//! Directory client over HTTP.

use crate::agent::{
    domain::AgentRegistration,
    ports::{DirectoryClient, DirectoryError, DirectoryResult},
};
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// [`DirectoryClient`] speaking JSON over HTTP.
///
/// Routes, relative to the base URL:
///
/// - `POST agents/register` with an [`AgentRegistration`] body
/// - `DELETE agents/{id}`
/// - `POST agents/{id}/heartbeat`
///
/// Any non-2xx answer becomes [`DirectoryError::Status`].
#[derive(Debug, Clone)]
pub struct HttpDirectoryClient {
    client: Client,
    base_url: Url,
}

impl HttpDirectoryClient {
    /// Creates a client for the directory at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::InvalidUrl`] when `base_url` is not an
    /// absolute `http`/`https` URL, or [`DirectoryError::Transport`] when
    /// the HTTP client cannot be built.
    pub fn new(base_url: &str) -> DirectoryResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(DirectoryError::transport)?;
        Self::with_client(client, base_url)
    }

    /// Creates a client reusing an existing [`reqwest::Client`].
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::InvalidUrl`] when `base_url` is unusable.
    pub fn with_client(client: Client, base_url: &str) -> DirectoryResult<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|err| DirectoryError::InvalidUrl(format!("{base_url}: {err}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(DirectoryError::InvalidUrl(format!(
                "{base_url}: unsupported scheme"
            )));
        }
        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    /// Returns the directory base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> DirectoryResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| DirectoryError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

async fn expect_success(response: Response) -> DirectoryResult<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(DirectoryError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl DirectoryClient for HttpDirectoryClient {
    async fn register(&self, registration: &AgentRegistration) -> DirectoryResult<()> {
        let url = self.endpoint(&["agents", "register"])?;
        debug!(%url, agent_id = %registration.agent_id, "registering with directory");
        let response = self
            .client
            .post(url)
            .json(registration)
            .send()
            .await
            .map_err(DirectoryError::transport)?;
        expect_success(response).await
    }

    async fn unregister(&self, agent_id: &str) -> DirectoryResult<()> {
        let url = self.endpoint(&["agents", agent_id])?;
        debug!(%url, agent_id, "unregistering from directory");
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(DirectoryError::transport)?;
        expect_success(response).await
    }

    async fn heartbeat(&self, agent_id: &str) -> DirectoryResult<()> {
        let url = self.endpoint(&["agents", agent_id, "heartbeat"])?;
        debug!(%url, agent_id, "sending directory heartbeat");
        let response = self
            .client
            .post(url)
            .send()
            .await
            .map_err(DirectoryError::transport)?;
        expect_success(response).await
    }
}
