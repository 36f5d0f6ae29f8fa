//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → handlers.rs (pick endpoint, run HealthService)
//!     → response.rs ({ GIT_SHA, healthCheckResult }, 200 or 503)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::HealthCheckResponse;
pub use server::{AppState, HealthServer};
