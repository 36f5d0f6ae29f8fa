//! Health indicators.
//!
//! # Responsibilities
//! - Run a dependency's probe and convert every failure into a `down` result
//! - Persist probe outcomes through the dependency's mark methods
//! - Answer `is_healthy` from cached state, probing once if none exists
//!
//! # Design Decisions
//! - `test_health` never fails; errors and timeouts become `down`
//! - Lazy probes and poller refreshes share one gate per indicator, so
//!   concurrent first requests in a process trigger a single probe

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::time;

use crate::health::dependency::HealthDependency;
use crate::health::error::{HealthCheckError, ProbeError};
use crate::health::result::IndicatorResult;
use crate::observability::metrics;

/// A lightweight, dependency-specific liveness probe.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self) -> Result<(), ProbeError>;
}

/// A named health check for one dependency.
#[async_trait]
pub trait HealthIndicator: Send + Sync {
    /// Name used as the key in results.
    fn key(&self) -> &str;

    /// Probe the dependency now. Never fails.
    async fn test_health(&self) -> IndicatorResult;

    /// Cached health, probing on demand if nothing is cached yet.
    async fn is_healthy(&self) -> Result<IndicatorResult, HealthCheckError>;

    /// Probe and persist the outcome.
    async fn refresh(&self) -> IndicatorResult {
        self.test_health().await
    }
}

/// Polling-friendly indicator over any cached, probeable dependency.
pub struct BaseHealthIndicator<D> {
    key: String,
    dependency: Arc<D>,
    probe_timeout: Duration,
    probe_gate: tokio::sync::Mutex<()>,
    last_failure: Mutex<Option<String>>,
}

impl<D> BaseHealthIndicator<D>
where
    D: HealthDependency + Probe + 'static,
{
    pub fn new(key: impl Into<String>, dependency: Arc<D>, probe_timeout: Duration) -> Self {
        Self {
            key: key.into(),
            dependency,
            probe_timeout,
            probe_gate: tokio::sync::Mutex::new(()),
            last_failure: Mutex::new(None),
        }
    }

    pub fn dependency(&self) -> &Arc<D> {
        &self.dependency
    }

    async fn record(&self, result: &IndicatorResult) {
        if result.is_up() {
            self.dependency.mark_as_healthy().await;
        } else {
            self.dependency.mark_as_unhealthy().await;
        }
        if let Ok(mut last) = self.last_failure.lock() {
            *last = result.detail.message.clone();
        }
    }

    fn cached_down(&self) -> IndicatorResult {
        let message = self
            .last_failure
            .lock()
            .ok()
            .and_then(|last| last.clone())
            .unwrap_or_else(|| "dependency reported unhealthy".to_string());
        IndicatorResult::down(&self.key, message)
    }

    async fn from_cache(&self) -> Option<IndicatorResult> {
        match self.dependency.is_healthy().await {
            Some(true) => Some(IndicatorResult::up(&self.key)),
            Some(false) => Some(self.cached_down()),
            None => None,
        }
    }
}

#[async_trait]
impl<D> HealthIndicator for BaseHealthIndicator<D>
where
    D: HealthDependency + Probe + 'static,
{
    fn key(&self) -> &str {
        &self.key
    }

    async fn test_health(&self) -> IndicatorResult {
        let start = Instant::now();
        let result = match time::timeout(self.probe_timeout, self.dependency.probe()).await {
            Ok(Ok(())) => IndicatorResult::up(&self.key),
            Ok(Err(e)) => {
                tracing::warn!(indicator = %self.key, error = %e, "Health probe failed");
                IndicatorResult::down(&self.key, e.to_string())
            }
            Err(_) => {
                tracing::warn!(indicator = %self.key, timeout = ?self.probe_timeout, "Health probe timed out");
                IndicatorResult::down(
                    &self.key,
                    format!("probe timed out after {} ms", self.probe_timeout.as_millis()),
                )
            }
        };

        metrics::record_probe(&self.key, result.is_up(), start);
        result
    }

    async fn is_healthy(&self) -> Result<IndicatorResult, HealthCheckError> {
        let result = match self.from_cache().await {
            Some(result) => result,
            None => {
                let _gate = self.probe_gate.lock().await;
                // Another request may have probed while we waited.
                match self.from_cache().await {
                    Some(result) => result,
                    None => {
                        tracing::debug!(indicator = %self.key, "No cached health, probing on demand");
                        let result = self.test_health().await;
                        self.record(&result).await;
                        result
                    }
                }
            }
        };

        if result.is_up() {
            Ok(result)
        } else {
            Err(HealthCheckError::new(format!("{} check failed", self.key), result))
        }
    }

    async fn refresh(&self) -> IndicatorResult {
        let _gate = self.probe_gate.lock().await;
        let result = self.test_health().await;
        self.record(&result).await;
        result
    }
}
