//! Postgres dependency.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::cache::HealthCache;
use crate::config::DatabaseConfig;
use crate::health::{CachedHealth, HealthDependency, Probe, ProbeError};

pub const CACHE_KEY: &str = "Database:Healthy";

pub struct DatabaseDependency {
    pool: PgPool,
    health: CachedHealth,
}

impl DatabaseDependency {
    /// Create the pool without connecting; the first probe connects.
    pub fn connect_lazy(config: &DatabaseConfig, cache: Arc<dyn HealthCache>) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_lazy(&config.url)?;

        Ok(Self::with_pool(pool, cache))
    }

    pub fn with_pool(pool: PgPool, cache: Arc<dyn HealthCache>) -> Self {
        Self {
            pool,
            health: CachedHealth::new(CACHE_KEY, cache),
        }
    }
}

#[async_trait]
impl HealthDependency for DatabaseDependency {
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
impl Probe for DatabaseDependency {
    async fn probe(&self) -> Result<(), ProbeError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
