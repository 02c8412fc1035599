//! telemetry-relay - forward bus telemetry to live WebSocket clients
//!
//! # Usage
//!
//! ```bash
//! # Bind the default endpoint (ipc:///tmp/relaylog)
//! telemetry-relay
//!
//! # Bind a TCP endpoint for publishers to connect to
//! telemetry-relay tcp://0.0.0.0:2001
//!
//! # Connect out to a publisher that binds
//! telemetry-relay '>tcp://127.0.0.1:2001'
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use telemetry_relay::{BusConfig, RelayServer, ServerConfig};

/// Forward bus telemetry to live WebSocket clients
#[derive(Parser, Debug)]
#[command(name = "telemetry-relay")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Bus endpoint; prefix '@' to bind (default) or '>' to connect
    #[arg(value_name = "ENDPOINT")]
    endpoint: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    let bus = match cli.endpoint.as_deref() {
        Some(endpoint) => endpoint
            .parse::<BusConfig>()
            .with_context(|| format!("bad endpoint argument {endpoint:?}"))?,
        None => BusConfig::default(),
    };

    tracing::info!(bus = %bus, "Starting relay");

    let server = RelayServer::new(ServerConfig::default(), bus);
    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await
        .context("relay failed")?;

    Ok(())
}

/// Initialize the tracing subscriber; `RUST_LOG` overrides the `info` default
fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log filter: {}", e))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();

    Ok(())
}
