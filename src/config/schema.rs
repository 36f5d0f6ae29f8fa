//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the health gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Deployment environment. `test` disables background polling.
    pub environment: Environment,

    /// Build metadata surfaced in every health response.
    pub build: BuildConfig,

    /// Health check polling and endpoint composition.
    pub health_check: HealthCheckConfig,

    /// Where last-known health is stored.
    pub cache: CacheConfig,

    /// Postgres dependency.
    pub database: DatabaseConfig,

    /// Redis dependency.
    pub redis: RedisConfig,

    /// Upstream Dashboard (Station) HTTP dependency.
    pub dashboard: DashboardConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            other => Err(format!("unknown environment '{}'", other)),
        }
    }
}

/// Build metadata.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Commit the running binary was built from.
    pub git_sha: String,
}

/// Placeholder reported when no commit is known.
pub const UNKNOWN_GIT_SHA: &str = "unknown";

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            git_sha: UNKNOWN_GIT_SHA.to_string(),
        }
    }
}

/// Health check configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Run the background poller (still off in the `test` environment).
    pub polling_enabled: bool,

    /// Polling interval in seconds.
    pub interval_secs: u64,

    /// Upper bound of the random delay added before the first tick, in milliseconds.
    pub start_jitter_ms: u64,

    /// Per-probe timeout in seconds.
    pub probe_timeout_secs: u64,

    /// Which indicators each endpoint aggregates.
    pub endpoints: EndpointSets,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            polling_enabled: true,
            interval_secs: 300,
            start_jitter_ms: 0,
            probe_timeout_secs: 10,
            endpoints: EndpointSets::default(),
        }
    }
}

impl HealthCheckConfig {
    /// Whether the poller should run in the given environment.
    pub fn polling_active(&self, environment: Environment) -> bool {
        self.polling_enabled && environment != Environment::Test
    }
}

/// Indicator names aggregated by each endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EndpointSets {
    /// `GET /health-check`.
    pub check: Vec<String>,
    /// `GET /liveness` and `GET /healthcheck`.
    pub liveness: Vec<String>,
    /// `GET /readiness`.
    pub readiness: Vec<String>,
}

impl Default for EndpointSets {
    fn default() -> Self {
        Self {
            check: vec!["database".into(), "dashboard".into(), "redis".into()],
            liveness: vec!["database".into(), "redis".into()],
            readiness: vec!["database".into(), "dashboard".into(), "redis".into()],
        }
    }
}

/// Cache store selection.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheBackend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Process-local map; state is not shared between instances.
    Memory,
    /// Shared Redis store (uses the `redis` section's connection).
    #[default]
    Redis,
}

/// Postgres configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL.
    pub url: String,

    /// Pool size.
    pub max_connections: u32,

    /// How long to wait for a pooled connection, in seconds.
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost:5432/companion".to_string(),
            max_connections: 2,
            acquire_timeout_secs: 5,
        }
    }
}

/// Redis configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RedisConfig {
    /// Connection URL.
    pub url: String,

    /// Connect and command timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            timeout_ms: 2000,
        }
    }
}

/// Dashboard (Station) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Base URL of the upstream API.
    pub base_url: String,

    /// Path probed for liveness of the upstream.
    pub ping_path: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            ping_path: "/healthcheck".to_string(),
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: GatewayConfig = toml::from_str("").unwrap();
        assert_eq!(config.build.git_sha, "unknown");
        assert_eq!(config.health_check.interval_secs, 300);
        assert_eq!(config.cache.backend, CacheBackend::Redis);
        assert_eq!(config.health_check.endpoints.liveness, vec!["database", "redis"]);
    }

    #[test]
    fn test_partial_sections() {
        let config: GatewayConfig = toml::from_str(
            r#"
            environment = "test"

            [health_check]
            interval_secs = 60

            [health_check.endpoints]
            liveness = ["redis"]

            [cache]
            backend = "memory"
            "#,
        )
        .unwrap();

        assert_eq!(config.environment, Environment::Test);
        assert_eq!(config.health_check.interval_secs, 60);
        assert_eq!(config.health_check.probe_timeout_secs, 10);
        assert_eq!(config.health_check.endpoints.liveness, vec!["redis"]);
        assert_eq!(config.health_check.endpoints.check.len(), 3);
        assert_eq!(config.cache.backend, CacheBackend::Memory);
    }

    #[test]
    fn test_polling_gated_by_environment() {
        let hc = HealthCheckConfig::default();
        assert!(hc.polling_active(Environment::Production));
        assert!(hc.polling_active(Environment::Development));
        assert!(!hc.polling_active(Environment::Test));

        let disabled = HealthCheckConfig {
            polling_enabled: false,
            ..HealthCheckConfig::default()
        };
        assert!(!disabled.polling_active(Environment::Production));
    }

    #[test]
    fn test_environment_from_str() {
        assert_eq!("PRODUCTION".parse::<Environment>(), Ok(Environment::Production));
        assert_eq!("dev".parse::<Environment>(), Ok(Environment::Development));
        assert!("staging".parse::<Environment>().is_err());
    }
}
