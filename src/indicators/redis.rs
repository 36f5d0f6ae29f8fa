//! Redis dependency.
//!
//! Shares its connection with the Redis health cache. When the cache store
//! itself is Redis, an outage is still reported: writes fail quietly and the
//! local mirror in `CachedHealth` answers reads.

use std::sync::Arc;

use async_trait::async_trait;

use crate::cache::{CacheError, HealthCache, RedisConnector};
use crate::health::{CachedHealth, HealthDependency, Probe, ProbeError};

pub const CACHE_KEY: &str = "Redis:Healthy";

pub struct RedisDependency {
    connector: Arc<RedisConnector>,
    health: CachedHealth,
}

impl RedisDependency {
    pub fn new(connector: Arc<RedisConnector>, cache: Arc<dyn HealthCache>) -> Self {
        Self {
            connector,
            health: CachedHealth::new(CACHE_KEY, cache),
        }
    }
}

#[async_trait]
impl HealthDependency for RedisDependency {
    async fn is_healthy(&self) -> Option<bool> {
        self.health.is_healthy().await
    }

    async fn mark_as_healthy(&self) {
        self.health.mark_as_healthy().await
    }

    async fn mark_as_unhealthy(&self) {
        self.health.mark_as_unhealthy().await
    }
}

#[async_trait]
impl Probe for RedisDependency {
    async fn probe(&self) -> Result<(), ProbeError> {
        let mut conn = self.connector.connection().await?;
        let reply: String = self
            .connector
            .bounded(async {
                ::redis::cmd("PING")
                    .query_async::<String>(&mut conn)
                    .await
                    .map_err(CacheError::from)
            })
            .await?;

        if reply == "PONG" {
            Ok(())
        } else {
            Err(ProbeError::UnexpectedReply(reply))
        }
    }
}
