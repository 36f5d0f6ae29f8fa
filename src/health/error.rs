//! Health check error types.

use thiserror::Error;

use crate::cache::CacheError;
use crate::health::result::{HealthCheckResult, IndicatorResult};

/// Failure of a single dependency probe.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("redis error: {0}")]
    Cache(#[from] CacheError),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    UnexpectedStatus(u16),

    #[error("unexpected reply: {0}")]
    UnexpectedReply(String),
}

/// An indicator reported itself unhealthy.
///
/// Carries the `down` payload so the aggregate can report it.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct HealthCheckError {
    pub message: String,
    pub causes: IndicatorResult,
}

impl HealthCheckError {
    pub fn new(message: impl Into<String>, causes: IndicatorResult) -> Self {
        Self {
            message: message.into(),
            causes,
        }
    }
}

/// An aggregate check failed.
#[derive(Debug, Clone, Error)]
#[error("health check failed: {first}")]
pub struct UnhealthyError {
    /// First failing indicator in endpoint order.
    pub first: HealthCheckError,
    /// The complete aggregate.
    pub result: HealthCheckResult,
}

/// Errors building a [`HealthService`](crate::health::service::HealthService).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("endpoint '{endpoint}' references unregistered indicator '{name}'")]
    UnknownIndicator { endpoint: &'static str, name: String },

    #[error("indicator '{0}' registered twice")]
    DuplicateIndicator(String),
}
