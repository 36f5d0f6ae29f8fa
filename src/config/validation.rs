//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that endpoint sets reference known indicators
//! - Check that readiness covers everything liveness covers
//! - Check that the request timeout outlasts the slowest indicator
//! - Validate value ranges and address/URL formats
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{CacheBackend, GatewayConfig};
use crate::indicators::KNOWN_INDICATORS;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("{field} is not a valid socket address: '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field} is not a valid URL: '{value}'")]
    InvalidUrl { field: &'static str, value: String },

    #[error("endpoint set '{endpoint}' is empty")]
    EmptyEndpoint { endpoint: &'static str },

    #[error("endpoint set '{endpoint}' references unknown indicator '{name}'")]
    UnknownIndicator { endpoint: &'static str, name: String },

    #[error("endpoint set '{endpoint}' lists '{name}' more than once")]
    DuplicateIndicator { endpoint: &'static str, name: String },

    #[error("readiness must include liveness indicator '{name}'")]
    ReadinessMissingLiveness { name: String },

    #[error("{field} must be at most {max}")]
    TooLarge { field: &'static str, max: u64 },

    #[error("timeouts.request_secs ({request_ms} ms) must exceed the slowest indicator ({required_ms} ms)")]
    RequestTimeoutTooShort { request_ms: u64, required_ms: u64 },
}

/// Longest accepted polling interval (one day).
pub const MAX_INTERVAL_SECS: u64 = 86_400;

/// Cache round trips on the slowest `is_healthy` path: read, re-read under
/// the probe gate, then write. Each may connect first.
const CACHE_ROUND_TRIPS: u64 = 6;

/// Worst-case time for one indicator to answer a request, in milliseconds.
pub fn indicator_budget_ms(config: &GatewayConfig) -> u64 {
    let probe_ms = config.health_check.probe_timeout_secs.saturating_mul(1000);
    let cache_ms = match config.cache.backend {
        CacheBackend::Redis => config.redis.timeout_ms.saturating_mul(CACHE_ROUND_TRIPS),
        CacheBackend::Memory => 0,
    };
    probe_ms.saturating_add(cache_ms)
}

/// Validate a fully loaded configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    let hc = &config.health_check;
    if hc.interval_secs == 0 {
        errors.push(ValidationError::NotPositive { field: "health_check.interval_secs" });
    }
    if hc.interval_secs > MAX_INTERVAL_SECS {
        errors.push(ValidationError::TooLarge {
            field: "health_check.interval_secs",
            max: MAX_INTERVAL_SECS,
        });
    }
    if hc.start_jitter_ms > MAX_INTERVAL_SECS * 1000 {
        errors.push(ValidationError::TooLarge {
            field: "health_check.start_jitter_ms",
            max: MAX_INTERVAL_SECS * 1000,
        });
    }
    if hc.probe_timeout_secs == 0 {
        errors.push(ValidationError::NotPositive { field: "health_check.probe_timeout_secs" });
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::NotPositive { field: "timeouts.request_secs" });
    }
    if config.timeouts.request_secs > 0 && hc.probe_timeout_secs > 0 {
        let request_ms = config.timeouts.request_secs.saturating_mul(1000);
        let required_ms = indicator_budget_ms(config);
        if request_ms <= required_ms {
            errors.push(ValidationError::RequestTimeoutTooShort { request_ms, required_ms });
        }
    }
    if config.database.max_connections == 0 {
        errors.push(ValidationError::NotPositive { field: "database.max_connections" });
    }
    if config.redis.timeout_ms == 0 && config.cache.backend == CacheBackend::Redis {
        errors.push(ValidationError::NotPositive { field: "redis.timeout_ms" });
    }

    check_url(&mut errors, "database.url", &config.database.url);
    check_url(&mut errors, "redis.url", &config.redis.url);
    check_url(&mut errors, "dashboard.base_url", &config.dashboard.base_url);

    let sets = &hc.endpoints;
    check_endpoint(&mut errors, "check", &sets.check);
    check_endpoint(&mut errors, "liveness", &sets.liveness);
    check_endpoint(&mut errors, "readiness", &sets.readiness);

    for name in &sets.liveness {
        if !sets.readiness.contains(name) {
            errors.push(ValidationError::ReadinessMissingLiveness { name: name.clone() });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if url::Url::parse(value).is_err() {
        errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        });
    }
}

fn check_endpoint(errors: &mut Vec<ValidationError>, endpoint: &'static str, names: &[String]) {
    if names.is_empty() {
        errors.push(ValidationError::EmptyEndpoint { endpoint });
    }
    for (i, name) in names.iter().enumerate() {
        if !KNOWN_INDICATORS.contains(&name.as_str()) {
            errors.push(ValidationError::UnknownIndicator {
                endpoint,
                name: name.clone(),
            });
        }
        if names[..i].contains(name) {
            errors.push(ValidationError::DuplicateIndicator {
                endpoint,
                name: name.clone(),
            });
        }
    }
}
