//! Metrics collection and exposition.
//!
//! # Metrics
//! - `health_probe_total` (counter): probes by indicator, outcome
//! - `health_probe_duration_seconds` (histogram): probe latency by indicator
//! - `health_indicator_up` (gauge): 1=up, 0=down, per indicator
//! - `health_endpoint_requests_total` (counter): aggregate checks by endpoint, status
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Labels are indicator keys and endpoint names only (bounded cardinality)

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Start the Prometheus scrape listener on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one probe of `indicator`.
pub fn record_probe(indicator: &str, up: bool, start: Instant) {
    let outcome = if up { "up" } else { "down" };
    counter!(
        "health_probe_total",
        "indicator" => indicator.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    histogram!("health_probe_duration_seconds", "indicator" => indicator.to_string())
        .record(start.elapsed().as_secs_f64());
    gauge!("health_indicator_up", "indicator" => indicator.to_string())
        .set(if up { 1.0 } else { 0.0 });
}

/// Record one aggregate evaluation of `endpoint`.
pub fn record_endpoint(endpoint: &'static str, ok: bool) {
    let status = if ok { "ok" } else { "error" };
    counter!(
        "health_endpoint_requests_total",
        "endpoint" => endpoint,
        "status" => status
    )
    .increment(1);
}
