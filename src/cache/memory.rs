//! Process-local health cache.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::cache::{CacheError, HealthCache};

/// A thread-safe in-memory cache. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryHealthCache {
    inner: Arc<DashMap<String, bool>>,
}

impl MemoryHealthCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys written so far.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[async_trait]
impl HealthCache for MemoryHealthCache {
    async fn get(&self, key: &str) -> Result<Option<bool>, CacheError> {
        Ok(self.inner.get(key).map(|r| *r.value()))
    }

    async fn set(&self, key: &str, healthy: bool) -> Result<(), CacheError> {
        self.inner.insert(key.to_string(), healthy);
        Ok(())
    }
}
