//! Redis-backed health cache shared by every gateway instance.
//!
//! # Responsibilities
//! - Own the single lazily-established Redis connection
//! - Bound every round trip with the configured timeout
//! - Store health as the strings "true" / "false"

use std::future::Future;
use std::time::Duration;

use ::redis::aio::ConnectionManager;
use ::redis::{AsyncCommands, Client, RedisResult};
use async_trait::async_trait;
use tokio::sync::OnceCell;
use tokio::time;

use crate::cache::{CacheError, HealthCache};
use crate::config::RedisConfig;

/// Lazily connected, auto-reconnecting Redis handle.
///
/// The first successful connect is kept for the life of the process; a failed
/// attempt leaves the cell empty so the next call retries.
pub struct RedisConnector {
    client: Client,
    conn: OnceCell<ConnectionManager>,
    timeout: Duration,
}

impl RedisConnector {
    /// Validate the URL. No connection is made until first use.
    pub fn new(config: &RedisConfig) -> RedisResult<Self> {
        Ok(Self {
            client: Client::open(config.url.as_str())?,
            conn: OnceCell::new(),
            timeout: Duration::from_millis(config.timeout_ms),
        })
    }

    /// Get a connection handle, connecting on first use.
    pub async fn connection(&self) -> Result<ConnectionManager, CacheError> {
        let conn = self
            .bounded(async {
                self.conn
                    .get_or_try_init(|| ConnectionManager::new(self.client.clone()))
                    .await
                    .map_err(CacheError::from)
            })
            .await?;
        Ok(conn.clone())
    }

    /// Run `fut` under the configured timeout.
    pub async fn bounded<T, F>(&self, fut: F) -> Result<T, CacheError>
    where
        F: Future<Output = Result<T, CacheError>>,
    {
        match time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Timeout(self.timeout.as_millis() as u64)),
        }
    }
}

/// Health cache stored in Redis.
pub struct RedisHealthCache {
    connector: std::sync::Arc<RedisConnector>,
}

impl RedisHealthCache {
    pub fn new(connector: std::sync::Arc<RedisConnector>) -> Self {
        Self { connector }
    }
}

#[async_trait]
impl HealthCache for RedisHealthCache {
    async fn get(&self, key: &str) -> Result<Option<bool>, CacheError> {
        let mut conn = self.connector.connection().await?;
        let raw: Option<String> = self
            .connector
            .bounded(async { conn.get(key).await.map_err(CacheError::from) })
            .await?;

        raw.map(|value| parse_stored(key, value)).transpose()
    }

    async fn set(&self, key: &str, healthy: bool) -> Result<(), CacheError> {
        let mut conn = self.connector.connection().await?;
        let value = if healthy { "true" } else { "false" };
        self.connector
            .bounded(async {
                let _: () = conn.set(key, value).await?;
                Ok::<(), CacheError>(())
            })
            .await
    }
}

fn parse_stored(key: &str, value: String) -> Result<bool, CacheError> {
    match value.as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(CacheError::Corrupt {
            key: key.to_string(),
            value,
        }),
    }
}
