//! Startup orchestration.
//!
//! # Responsibilities
//! - Build subsystems in dependency order:
//!   cache → dependencies → indicators → service → server
//! - Start the background poller when the environment allows it
//! - Serve until shutdown, then wait for the poller to stop
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Dependencies connect lazily, so a down database does not block startup;
//!   it shows up as a 503 instead

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::cache::{HealthCache, MemoryHealthCache, RedisConnector, RedisHealthCache};
use crate::config::validation::validate_config;
use crate::config::{CacheBackend, ConfigError, GatewayConfig};
use crate::health::{HealthIndicator, HealthMonitor, HealthService, IntervalTicker, ServiceError, Ticker};
use crate::http::{AppState, HealthServer};
use crate::indicators::{build_indicators, SetupError};
use crate::lifecycle::Shutdown;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid redis configuration: {0}")]
    Redis(#[from] redis::RedisError),

    #[error(transparent)]
    Indicators(#[from] SetupError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// A fully wired gateway, ready to serve.
pub struct Application {
    config: GatewayConfig,
    service: Arc<HealthService>,
    server: HealthServer,
}

impl Application {
    /// Wire the real dependencies described by `config`.
    pub fn build(config: GatewayConfig) -> Result<Self, StartupError> {
        let redis = Arc::new(RedisConnector::new(&config.redis)?);
        let cache: Arc<dyn HealthCache> = match config.cache.backend {
            CacheBackend::Memory => Arc::new(MemoryHealthCache::new()),
            CacheBackend::Redis => Arc::new(RedisHealthCache::new(redis.clone())),
        };
        tracing::info!(backend = ?config.cache.backend, "Health cache initialized");

        let indicators = build_indicators(&config, cache, redis)?;
        Self::with_indicators(config, indicators)
    }

    /// Wire the gateway around caller-supplied indicators.
    pub fn with_indicators(
        config: GatewayConfig,
        indicators: Vec<Arc<dyn HealthIndicator>>,
    ) -> Result<Self, StartupError> {
        validate_config(&config).map_err(ConfigError::Validation)?;

        let service = Arc::new(HealthService::new(indicators, &config.health_check.endpoints)?);
        let state = AppState::new(service.clone(), config.build.git_sha.as_str());
        let server = HealthServer::new(state, &config.timeouts);

        Ok(Self {
            config,
            service,
            server,
        })
    }

    pub fn service(&self) -> &Arc<HealthService> {
        &self.service
    }

    /// Start polling every registered indicator on `ticker`.
    pub fn spawn_monitor<T>(&self, ticker: T, shutdown: broadcast::Receiver<()>) -> JoinHandle<()>
    where
        T: Ticker + 'static,
    {
        let monitor = HealthMonitor::new(self.service.indicators().to_vec());
        tokio::spawn(monitor.run(ticker, shutdown))
    }

    /// Serve on `listener` until `shutdown` is triggered.
    ///
    /// Returns immediately if `shutdown` already fired.
    pub async fn run(self, listener: TcpListener, shutdown: &Shutdown) -> Result<(), StartupError> {
        // Subscribe before checking the flag so a concurrent trigger is seen
        // by one or the other.
        let server_rx = shutdown.subscribe();
        let monitor_rx = shutdown.subscribe();
        if shutdown.is_triggered() {
            tracing::info!("Shutdown requested before startup completed");
            return Ok(());
        }

        let hc = &self.config.health_check;
        let monitor = if hc.polling_active(self.config.environment) {
            let ticker = IntervalTicker::new(
                Duration::from_secs(hc.interval_secs),
                Duration::from_millis(hc.start_jitter_ms),
            );
            tracing::info!(interval_secs = hc.interval_secs, "Background health polling enabled");
            Some(self.spawn_monitor(ticker, monitor_rx))
        } else {
            tracing::info!(environment = ?self.config.environment, "Background health polling disabled");
            None
        };

        self.server.run(listener, server_rx).await?;

        if let Some(task) = monitor {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "Health monitor task failed");
            }
        }
        Ok(())
    }
}
