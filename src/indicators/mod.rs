//! Concrete health-checked dependencies.
//!
//! Each dependency embeds a [`CachedHealth`](crate::health::CachedHealth),
//! implements [`HealthDependency`](crate::health::HealthDependency) by
//! delegating to it, and implements [`Probe`](crate::health::Probe) with the
//! lightest possible round trip.

pub mod dashboard;
pub mod database;
pub mod redis;

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::cache::{HealthCache, RedisConnector};
use crate::config::GatewayConfig;
use crate::health::{BaseHealthIndicator, HealthIndicator};

pub use dashboard::DashboardDependency;
pub use database::DatabaseDependency;
pub use self::redis::RedisDependency;

pub const DATABASE: &str = "database";
pub const DASHBOARD: &str = "dashboard";
pub const REDIS: &str = "redis";

/// Every indicator name the gateway can build.
pub const KNOWN_INDICATORS: [&str; 3] = [DATABASE, DASHBOARD, REDIS];

/// Failure constructing a dependency client.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("database setup failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("invalid dashboard URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("http client setup failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unknown indicator '{0}'")]
    Unknown(String),
}

/// Build the indicators referenced by any endpoint set.
pub fn build_indicators(
    config: &GatewayConfig,
    cache: Arc<dyn HealthCache>,
    redis: Arc<RedisConnector>,
) -> Result<Vec<Arc<dyn HealthIndicator>>, SetupError> {
    let endpoints = &config.health_check.endpoints;
    let wanted: BTreeSet<&str> = endpoints
        .check
        .iter()
        .chain(&endpoints.liveness)
        .chain(&endpoints.readiness)
        .map(String::as_str)
        .collect();

    let timeout = Duration::from_secs(config.health_check.probe_timeout_secs);
    let mut indicators: Vec<Arc<dyn HealthIndicator>> = Vec::with_capacity(wanted.len());

    for name in wanted {
        let indicator: Arc<dyn HealthIndicator> = match name {
            DATABASE => {
                let dep = DatabaseDependency::connect_lazy(&config.database, cache.clone())?;
                Arc::new(BaseHealthIndicator::new(DATABASE, Arc::new(dep), timeout))
            }
            DASHBOARD => {
                let dep = DashboardDependency::new(&config.dashboard, cache.clone())?;
                Arc::new(BaseHealthIndicator::new(DASHBOARD, Arc::new(dep), timeout))
            }
            REDIS => {
                let dep = RedisDependency::new(redis.clone(), cache.clone());
                Arc::new(BaseHealthIndicator::new(REDIS, Arc::new(dep), timeout))
            }
            other => return Err(SetupError::Unknown(other.to_string())),
        };
        tracing::debug!(indicator = name, "Health indicator registered");
        indicators.push(indicator);
    }

    Ok(indicators)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryHealthCache;

    fn connector(config: &GatewayConfig) -> Arc<RedisConnector> {
        Arc::new(RedisConnector::new(&config.redis).unwrap())
    }

    #[tokio::test]
    async fn test_builds_only_referenced_indicators() {
        let mut config = GatewayConfig::default();
        config.health_check.endpoints.check = vec![REDIS.into()];
        config.health_check.endpoints.liveness = vec![REDIS.into()];
        config.health_check.endpoints.readiness = vec![REDIS.into(), DASHBOARD.into()];

        let indicators =
            build_indicators(&config, Arc::new(MemoryHealthCache::new()), connector(&config)).unwrap();
        let keys: Vec<&str> = indicators.iter().map(|i| i.key()).collect();
        assert_eq!(keys, vec![DASHBOARD, REDIS]);
    }

    #[tokio::test]
    async fn test_default_builds_all_three() {
        let config = GatewayConfig::default();
        let indicators =
            build_indicators(&config, Arc::new(MemoryHealthCache::new()), connector(&config)).unwrap();
        assert_eq!(indicators.len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_name_rejected() {
        let mut config = GatewayConfig::default();
        config.health_check.endpoints.check.push("kafka".into());

        let err = build_indicators(&config, Arc::new(MemoryHealthCache::new()), connector(&config))
            .err()
            .unwrap();
        assert!(matches!(err, SetupError::Unknown(name) if name == "kafka"));
    }
}
