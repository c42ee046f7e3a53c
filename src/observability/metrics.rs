//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define startup metrics (attempts, readiness, duration)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `bootstrap_attempts_total{target,outcome}` (counter): attempts per dependency
//! - `bootstrap_duration_seconds{target}` (histogram): time spent connecting
//! - `bootstrap_dependency_up{target}` (gauge): 1=connected, 0=gave up
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed (tests, metrics off)

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_attempt(target: &'static str, outcome: &'static str) {
    counter!(
        "bootstrap_attempts_total",
        "target" => target,
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_dependency_up(target: &'static str, up: bool) {
    gauge!("bootstrap_dependency_up", "target" => target).set(if up { 1.0 } else { 0.0 });
}

pub fn record_bootstrap_duration(target: &'static str, started: Instant) {
    histogram!("bootstrap_duration_seconds", "target" => target)
        .record(started.elapsed().as_secs_f64());
}
