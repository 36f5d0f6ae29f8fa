//! The adapter contract every health-checked dependency implements.

use std::sync::Arc;

use async_trait::async_trait;

use crate::cache::HealthCache;
use crate::health::state::{AtomicHealthState, HealthState};

/// An external system whose last-known health is cached.
#[async_trait]
pub trait HealthDependency: Send + Sync {
    /// Last recorded health; `None` before the first probe.
    async fn is_healthy(&self) -> Option<bool>;

    /// Record a successful probe.
    async fn mark_as_healthy(&self);

    /// Record a failed probe.
    async fn mark_as_unhealthy(&self);
}

/// Health state stored under one cache key.
///
/// Concrete dependencies embed this and delegate [`HealthDependency`] to it.
/// Cache writes are fire-and-forget; a local mirror of the last written
/// value answers reads when the shared store is unavailable.
pub struct CachedHealth {
    key: String,
    cache: Arc<dyn HealthCache>,
    local: AtomicHealthState,
}

impl CachedHealth {
    pub fn new(key: impl Into<String>, cache: Arc<dyn HealthCache>) -> Self {
        Self {
            key: key.into(),
            cache,
            local: AtomicHealthState::default(),
        }
    }

    async fn read(&self) -> Option<bool> {
        match self.cache.get(&self.key).await {
            Ok(Some(healthy)) => Some(healthy),
            Ok(None) => self.local.load().into(),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Health cache read failed, using local state");
                self.local.load().into()
            }
        }
    }

    async fn write(&self, healthy: bool) {
        let state = HealthState::from(Some(healthy));
        let previous = self.local.swap(state);
        if previous != state {
            tracing::info!(key = %self.key, from = %previous, to = %state, "Dependency health changed");
        }

        if let Err(e) = self.cache.set(&self.key, healthy).await {
            tracing::warn!(key = %self.key, error = %e, "Health cache write failed");
        }
    }
}

#[async_trait]
impl HealthDependency for CachedHealth {
    async fn is_healthy(&self) -> Option<bool> {
        self.read().await
    }

    async fn mark_as_healthy(&self) {
        self.write(true).await
    }

    async fn mark_as_unhealthy(&self) {
        self.write(false).await
    }
}
