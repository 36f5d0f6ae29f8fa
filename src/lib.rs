//! Health check gateway library.
//!
//! Aggregates the health of the service's dependencies (Postgres, Redis and
//! the upstream Dashboard) behind the `/health-check`, `/liveness` and
//! `/readiness` endpoints.

pub mod cache;
pub mod config;
pub mod health;
pub mod http;
pub mod indicators;
pub mod lifecycle;
pub mod observability;

pub use config::GatewayConfig;
pub use health::{CheckKind, HealthService};
pub use http::HealthServer;
pub use lifecycle::{Application, Shutdown};
