//! Tracing subscriber setup for the agent binary.
//!
//! Libraries only emit `tracing` events; installing a subscriber is left to
//! the process entry point.

use thiserror::Error;
use tracing_subscriber::{
    EnvFilter,
    filter::ParseError,
    fmt,
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};

/// Errors raised while installing the tracing subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// A filter directive could not be parsed.
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),

    /// A global subscriber is already installed.
    #[error("failed to install tracing subscriber: {0}")]
    Install(#[from] TryInitError),
}

/// Result type for telemetry setup.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Parses `directives` (`RUST_LOG` syntax) into a filter.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] when a directive is malformed.
pub fn parse_filter(directives: &str) -> TelemetryResult<EnvFilter> {
    Ok(EnvFilter::try_new(directives)?)
}

/// Installs the global subscriber.
///
/// The filter comes from `RUST_LOG` when set, else `default_directive`.
/// `json` selects structured JSON lines over human-readable output.
///
/// # Errors
///
/// Returns [`TelemetryError`] when the filter is invalid or a subscriber is
/// already installed.
pub fn init_tracing(default_directive: &str, json: bool) -> TelemetryResult<()> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default_directive.to_owned());
    let registry = tracing_subscriber::registry().with(parse_filter(&directives)?);

    if json {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .try_init()?;
    } else {
        registry
            .with(fmt::layer().with_target(false).with_thread_ids(false))
            .try_init()?;
    }
    Ok(())
}
