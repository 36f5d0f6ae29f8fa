//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Polling (active.rs):
//!     Ticker (schedule.rs)
//!     → HealthIndicator::refresh() for every indicator
//!     → Probe → mark_as_healthy / mark_as_unhealthy (dependency.rs)
//!     → HealthCache
//!
//! Requests (service.rs):
//!     Endpoint subset
//!     → HealthIndicator::is_healthy() concurrently (indicator.rs)
//!     → cached state, or one on-demand probe if unknown
//!     → HealthCheckResult (result.rs), or UnhealthyError (error.rs)
//! ```
//!
//! # Design Decisions
//! - Requests never wait on the poller; they read cached state
//! - Health state is per-dependency, shared through the cache store
//! - The timer is injected so polling is testable without real intervals

pub mod active;
pub mod dependency;
pub mod error;
pub mod indicator;
pub mod result;
pub mod schedule;
pub mod service;
pub mod state;

pub use active::HealthMonitor;
pub use dependency::{CachedHealth, HealthDependency};
pub use error::{HealthCheckError, ProbeError, ServiceError, UnhealthyError};
pub use indicator::{BaseHealthIndicator, HealthIndicator, Probe};
pub use result::{AggregateStatus, HealthCheckResult, IndicatorDetail, IndicatorResult, Status};
pub use schedule::{manual_ticker, IntervalTicker, ManualTicker, TickHandle, Ticker};
pub use service::{CheckKind, HealthService};
pub use state::HealthState;
