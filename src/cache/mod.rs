//! Shared store for last-known dependency health.
//!
//! # Data Flow
//! ```text
//! poller / lazy probe
//!     → HealthDependency::mark_as_*()
//!     → HealthCache::set(key, bool)      (memory.rs or redis.rs)
//!
//! HTTP request
//!     → HealthDependency::is_healthy()
//!     → HealthCache::get(key)            (None until first probe)
//! ```
//!
//! # Design Decisions
//! - Values never expire; the poller overwrites them
//! - Last write wins across process instances
//! - A missing key means "unknown", not "unhealthy"

pub mod memory;
pub mod redis;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::MemoryHealthCache;
pub use self::redis::{RedisConnector, RedisHealthCache};

/// Errors raised by a cache store.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("redis error: {0}")]
    Redis(#[from] ::redis::RedisError),

    #[error("cache operation timed out after {0} ms")]
    Timeout(u64),

    #[error("unexpected value '{value}' stored under '{key}'")]
    Corrupt { key: String, value: String },
}

/// Key/value store holding one boolean per dependency.
#[async_trait]
pub trait HealthCache: Send + Sync {
    /// Last stored value, or `None` if never written.
    async fn get(&self, key: &str) -> Result<Option<bool>, CacheError>;

    /// Store a value with no expiry.
    async fn set(&self, key: &str, healthy: bool) -> Result<(), CacheError>;
}
