//! Indicator and aggregate result shapes.
//!
//! Serialized form (one indicator):
//! ```text
//! { "database": { "status": "up" } }
//! { "redis": { "status": "down", "message": "connection refused" } }
//! ```
//!
//! Aggregate:
//! ```text
//! { "status": "ok" | "error", "info": {..}, "error": {..}, "details": {..} }
//! ```

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Outcome of one indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Up,
    Down,
}

/// Payload stored under an indicator's key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorDetail {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
}

/// A keyed indicator outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorResult {
    pub key: String,
    pub detail: IndicatorDetail,
}

impl IndicatorResult {
    pub fn up(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            detail: IndicatorDetail {
                status: Status::Up,
                message: None,
            },
        }
    }

    pub fn down(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            detail: IndicatorDetail {
                status: Status::Down,
                message: Some(message.into()),
            },
        }
    }

    pub fn is_up(&self) -> bool {
        self.detail.status == Status::Up
    }
}

impl Serialize for IndicatorResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.key, &self.detail)?;
        map.end()
    }
}

/// Aggregate status of one endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateStatus {
    Ok,
    Error,
}

/// Combined result of every indicator in one endpoint's subset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckResult {
    pub status: AggregateStatus,
    /// Indicators that reported up.
    pub info: BTreeMap<String, IndicatorDetail>,
    /// Indicators that reported down or failed.
    pub error: BTreeMap<String, IndicatorDetail>,
    /// Every indicator, up or down.
    pub details: BTreeMap<String, IndicatorDetail>,
}

impl HealthCheckResult {
    /// Build from individual results; `ok` only if all are up.
    pub fn from_results<I>(results: I) -> Self
    where
        I: IntoIterator<Item = IndicatorResult>,
    {
        let mut info = BTreeMap::new();
        let mut error = BTreeMap::new();
        let mut details = BTreeMap::new();

        for result in results {
            if result.is_up() {
                info.insert(result.key.clone(), result.detail.clone());
            } else {
                error.insert(result.key.clone(), result.detail.clone());
            }
            details.insert(result.key, result.detail);
        }

        let status = if error.is_empty() {
            AggregateStatus::Ok
        } else {
            AggregateStatus::Error
        };

        Self {
            status,
            info,
            error,
            details,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == AggregateStatus::Ok
    }
}
