//! Runs a parley agent until interrupted.
//!
//! Usage:
//!
//! ```text
//! parley-agent [--config agent.toml] [--host 0.0.0.0] [--port 3000]
//!              [--registry-url http://directory:9000] [--log-json]
//! ```
//!
//! Command-line values override the configuration file. The agent serves its
//! HTTP routes, registers with the directory when one is configured, and
//! shuts down cleanly on Ctrl-C.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use parley::{
    agent::{
        adapters::{HttpDirectoryClient, LocalBridge},
        services::{Agent, AgentService},
    },
    config::{AgentConfig, ConfigError},
    http::AxumHttpSurface,
    telemetry,
};
use tokio::runtime::Builder;
use tracing::info;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Parser)]
#[command(name = "parley-agent", version, about = "Runs a parley message-improvement agent")]
struct Cli {
    /// TOML configuration file.
    #[arg(long, env = "PARLEY_CONFIG")]
    config: Option<PathBuf>,
    /// Host to bind (overrides config).
    #[arg(long)]
    host: Option<String>,
    /// Port to bind (overrides config).
    #[arg(long)]
    port: Option<u16>,
    /// Directory service base URL (overrides config).
    #[arg(long, env = "PARLEY_REGISTRY_URL")]
    registry_url: Option<String>,
    /// Default log filter when `RUST_LOG` is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
    /// Emit logs as JSON lines.
    #[arg(long, default_value_t = false)]
    log_json: bool,
}

fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();
    telemetry::init_tracing(&cli.log_level, cli.log_json)?;
    let config = load_config(cli)?;
    let runtime = Builder::new_multi_thread().enable_all().build()?;
    runtime.block_on(run(config))
}

fn load_config(cli: Cli) -> Result<AgentConfig, ConfigError> {
    let mut config = cli
        .config
        .as_ref()
        .map_or_else(|| Ok(AgentConfig::default()), AgentConfig::load)?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(url) = cli.registry_url {
        config.registry_url = Some(url);
    }
    config.validate()?;
    Ok(config)
}

async fn run(config: AgentConfig) -> Result<(), BoxError> {
    let directory = config
        .registry_url
        .as_deref()
        .map(HttpDirectoryClient::new)
        .transpose()?;

    let service = Arc::new(AgentService::in_memory(config));
    let surface = Arc::new(AxumHttpSurface::new(Arc::clone(&service)));
    let mut agent = Agent::new(service, Arc::new(LocalBridge::new()), surface);
    if let Some(client) = directory {
        agent = agent.with_directory(Arc::new(client));
    }

    agent.start().await?;
    info!(addr = ?agent.local_addr(), "parley agent ready; press Ctrl-C to stop");

    tokio::signal::ctrl_c().await?;
    info!("shutdown requested");
    agent.stop().await?;
    Ok(())
}
