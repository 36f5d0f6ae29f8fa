//! Health check gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                HEALTH GATEWAY                 │
//!                    │                                               │
//!   GET /readiness   │  ┌────────┐    ┌───────────────┐              │
//!   ─────────────────┼─▶│  http  │───▶│ HealthService │              │
//!                    │  │ server │    │  (check/live/ │              │
//!   200 / 503        │  │        │◀───│   readiness)  │              │
//!   ◀────────────────┼──│        │    └───────┬───────┘              │
//!                    │  └────────┘            │ concurrent           │
//!                    │                        ▼                      │
//!                    │        ┌──────────┬──────────┬──────────┐     │
//!                    │        │ database │dashboard │  redis   │     │
//!                    │        │indicator │indicator │indicator │     │
//!                    │        └────┬─────┴────┬─────┴────┬─────┘     │
//!                    │             │  cache   │          │           │
//!                    │             ▼          ▼          ▼           │
//!                    │        ┌──────────────────────────────┐       │
//!                    │        │  HealthCache (redis/memory)  │       │
//!                    │        └──────────────────────────────┘       │
//!                    │                        ▲                      │
//!                    │        ┌───────────────┴──────────────┐       │
//!                    │        │ HealthMonitor (interval poll)│       │
//!                    │        └──────────────────────────────┘       │
//!                    └──────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use health_gateway::config::load_config;
use health_gateway::lifecycle::{wait_for_shutdown_signal, Application, Shutdown};
use health_gateway::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "health-gateway")]
#[command(about = "Dependency health check service", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    logging::init(&config.observability)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = ?config.environment,
        git_sha = %config.build.git_sha,
        "health-gateway starting"
    );
    tracing::info!(
        bind_address = %config.listener.bind_address,
        cache_backend = ?config.cache.backend,
        polling_interval_secs = config.health_check.interval_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let app = Application::build(config)?;

    let shutdown = Arc::new(Shutdown::new());
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        signal_shutdown.trigger();
    });

    app.run(listener, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
