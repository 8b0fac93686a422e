//! Agent configuration.
//!
//! [`AgentConfig`] is deserialised from TOML with every field defaulted, so a
//! partial file (or none at all) yields a runnable configuration. Call
//! [`AgentConfig::validate`] before handing it to the agent.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default listen host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default directory heartbeat interval in seconds.
pub const DEFAULT_HEARTBEAT_INTERVAL_SECS: u64 = 30;

/// Longest accepted directory heartbeat interval in seconds (one day).
pub const MAX_HEARTBEAT_INTERVAL_SECS: u64 = 86_400;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`AgentConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field holds an unusable value.
    #[error("invalid config field `{field}`: {reason}")]
    Invalid {
        /// Offending field name.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Identity, network and directory settings for one agent.
///
/// # Examples
///
/// ```
/// use parley::config::AgentConfig;
///
/// let config = AgentConfig::from_toml_str(
///     r#"
///     agent_id = "writer-1"
///     name = "Writer"
///     port = 0
///     "#,
/// )
/// .expect("valid TOML");
///
/// assert_eq!(config.agent_id, "writer-1");
/// assert_eq!(config.host, "127.0.0.1");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Stable identifier announced to the directory.
    pub agent_id: String,
    /// Human-readable agent name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Agent version string.
    pub version: String,
    /// Host the HTTP surface binds to.
    pub host: String,
    /// Port the HTTP surface binds to; `0` picks an ephemeral port.
    pub port: u16,
    /// Base URL of the directory service, if any.
    pub registry_url: Option<String>,
    /// Seconds between directory heartbeats; `0` disables them.
    pub heartbeat_interval_secs: u64,
    /// Capability tags advertised by the agent.
    pub capabilities: Vec<String>,
    /// Improver made active at startup.
    pub default_improver: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            agent_id: "parley-agent".to_owned(),
            name: "Parley Agent".to_owned(),
            description: String::new(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            registry_url: None,
            heartbeat_interval_secs: DEFAULT_HEARTBEAT_INTERVAL_SECS,
            capabilities: Vec::new(),
            default_improver: None,
        }
    }
}

impl AgentConfig {
    /// Creates a default configuration with the given identity.
    #[must_use]
    pub fn new(agent_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the document is malformed.
    pub fn from_toml_str(raw: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Reads and parses the TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read, or
    /// [`ConfigError::Parse`] when it is malformed.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let file_path = path.as_ref();
        let raw = std::fs::read_to_string(file_path).map_err(|source| ConfigError::Read {
            path: file_path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Checks that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the id, name or host is blank,
    /// when `registry_url` is not an absolute `http`/`https` URL, or when
    /// the heartbeat interval exceeds [`MAX_HEARTBEAT_INTERVAL_SECS`].
    pub fn validate(&self) -> ConfigResult<()> {
        if self.agent_id.trim().is_empty() {
            return Err(ConfigError::invalid("agent_id", "must not be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(ConfigError::invalid("name", "must not be empty"));
        }
        if self.host.trim().is_empty() {
            return Err(ConfigError::invalid("host", "must not be empty"));
        }
        if self.heartbeat_interval_secs > MAX_HEARTBEAT_INTERVAL_SECS {
            return Err(ConfigError::invalid(
                "heartbeat_interval_secs",
                format!("must be at most {MAX_HEARTBEAT_INTERVAL_SECS} seconds"),
            ));
        }
        if let Some(url) = &self.registry_url {
            let parsed = reqwest::Url::parse(url)
                .map_err(|err| ConfigError::invalid("registry_url", err.to_string()))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfigError::invalid(
                    "registry_url",
                    format!("unsupported scheme `{}`", parsed.scheme()),
                ));
            }
        }
        Ok(())
    }

    /// Returns the `host:port` string the HTTP surface binds to.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the base URL the agent is reachable at.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.bind_addr())
    }

    /// Returns the base URL for an actually bound address.
    #[must_use]
    pub fn base_url_for(addr: SocketAddr) -> String {
        format!("http://{addr}")
    }

    /// Returns the heartbeat interval, or `None` when heartbeats are disabled.
    #[must_use]
    pub const fn heartbeat_interval(&self) -> Option<Duration> {
        if self.heartbeat_interval_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.heartbeat_interval_secs))
        }
    }
}

#[cfg(test)]
mod tests;
