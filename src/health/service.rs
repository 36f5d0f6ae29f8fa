//! Aggregation of indicators into endpoint results.
//!
//! # Responsibilities
//! - Resolve each endpoint's configured indicator subset at construction
//! - Run a subset concurrently and wait for every indicator to settle
//! - Normalize `down` results, errors and crashed tasks into `HealthCheckError`
//!
//! # Design Decisions
//! - Each indicator runs in its own task so one panicking indicator cannot
//!   take the request down with it
//! - "First failure" means first in endpoint declaration order, not first to
//!   finish

use std::collections::HashMap;
use std::sync::Arc;

use futures_util::future::join_all;

use crate::config::EndpointSets;
use crate::health::error::{HealthCheckError, ServiceError, UnhealthyError};
use crate::health::indicator::HealthIndicator;
use crate::health::result::{HealthCheckResult, IndicatorResult};
use crate::observability::metrics;

/// Which endpoint is being evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckKind {
    /// `GET /health-check`
    Full,
    /// `GET /liveness`, `GET /healthcheck`
    Liveness,
    /// `GET /readiness`
    Readiness,
}

impl CheckKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckKind::Full => "check",
            CheckKind::Liveness => "liveness",
            CheckKind::Readiness => "readiness",
        }
    }
}

impl std::fmt::Display for CheckKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct HealthService {
    indicators: Vec<Arc<dyn HealthIndicator>>,
    check: Vec<Arc<dyn HealthIndicator>>,
    liveness: Vec<Arc<dyn HealthIndicator>>,
    readiness: Vec<Arc<dyn HealthIndicator>>,
}

impl HealthService {
    /// Register `indicators` and resolve the endpoint subsets by key.
    pub fn new(
        indicators: Vec<Arc<dyn HealthIndicator>>,
        endpoints: &EndpointSets,
    ) -> Result<Self, ServiceError> {
        let mut by_key: HashMap<String, Arc<dyn HealthIndicator>> = HashMap::new();
        for indicator in &indicators {
            let key = indicator.key().to_string();
            if by_key.insert(key.clone(), indicator.clone()).is_some() {
                return Err(ServiceError::DuplicateIndicator(key));
            }
        }

        let resolve = |endpoint: &'static str, names: &[String]| {
            names
                .iter()
                .map(|name| {
                    by_key
                        .get(name)
                        .cloned()
                        .ok_or_else(|| ServiceError::UnknownIndicator {
                            endpoint,
                            name: name.clone(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()
        };

        Ok(Self {
            check: resolve("check", &endpoints.check)?,
            liveness: resolve("liveness", &endpoints.liveness)?,
            readiness: resolve("readiness", &endpoints.readiness)?,
            indicators,
        })
    }

    /// Every registered indicator, for the poller.
    pub fn indicators(&self) -> &[Arc<dyn HealthIndicator>] {
        &self.indicators
    }

    /// Keys aggregated by `kind`, in declaration order.
    pub fn keys(&self, kind: CheckKind) -> Vec<&str> {
        self.subset(kind).iter().map(|i| i.key()).collect()
    }

    fn subset(&self, kind: CheckKind) -> &[Arc<dyn HealthIndicator>] {
        match kind {
            CheckKind::Full => &self.check,
            CheckKind::Liveness => &self.liveness,
            CheckKind::Readiness => &self.readiness,
        }
    }

    pub async fn check(&self) -> Result<HealthCheckResult, UnhealthyError> {
        self.run(CheckKind::Full).await
    }

    pub async fn liveness(&self) -> Result<HealthCheckResult, UnhealthyError> {
        self.run(CheckKind::Liveness).await
    }

    pub async fn readiness(&self) -> Result<HealthCheckResult, UnhealthyError> {
        self.run(CheckKind::Readiness).await
    }

    /// Evaluate one endpoint.
    pub async fn run(&self, kind: CheckKind) -> Result<HealthCheckResult, UnhealthyError> {
        let handles = self.subset(kind).iter().map(|indicator| {
            let indicator = indicator.clone();
            tokio::spawn(async move { indicator.is_healthy().await })
        });
        let joined = join_all(handles).await;

        let outcomes: Vec<Result<IndicatorResult, HealthCheckError>> = self
            .subset(kind)
            .iter()
            .zip(joined)
            .map(|(indicator, joined)| normalize(indicator.key(), joined))
            .collect();

        let first = outcomes.iter().find_map(|o| o.as_ref().err()).cloned();
        let result = HealthCheckResult::from_results(outcomes.into_iter().map(|o| match o {
            Ok(result) => result,
            Err(e) => e.causes,
        }));

        metrics::record_endpoint(kind.as_str(), result.is_ok());

        match first {
            None => Ok(result),
            Some(first) => {
                tracing::warn!(endpoint = %kind, error = %first, "Health check failed");
                Err(UnhealthyError { first, result })
            }
        }
    }
}

fn normalize(
    key: &str,
    joined: Result<Result<IndicatorResult, HealthCheckError>, tokio::task::JoinError>,
) -> Result<IndicatorResult, HealthCheckError> {
    match joined {
        Ok(Ok(result)) if result.is_up() => Ok(result),
        Ok(Ok(result)) => Err(HealthCheckError::new(format!("{} check failed", key), result)),
        Ok(Err(e)) => Err(e),
        Err(join_error) => {
            tracing::error!(indicator = %key, error = %join_error, "Health indicator task failed");
            Err(HealthCheckError::new(
                format!("{} check failed", key),
                IndicatorResult::down(key, "indicator task failed"),
            ))
        }
    }
}
