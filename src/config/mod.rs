//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (environment overrides: GIT_SHA, APP_ENV, ...)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → passed by value / Arc into each subsystem at construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; nothing reads the environment later
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    BuildConfig, CacheBackend, CacheConfig, DashboardConfig, DatabaseConfig, EndpointSets,
    Environment, GatewayConfig, HealthCheckConfig, ListenerConfig, LogFormat,
    ObservabilityConfig, RedisConfig, TimeoutConfig, UNKNOWN_GIT_SHA,
};
