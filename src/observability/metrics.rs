//! Metrics collection and exposition.
//!
//! # Metrics
//! - `update_checks_total` (counter): update checks by `outcome`
//!   (`update`, `no_update`, `bad_request`)
//! - `update_check_duration_seconds` (histogram): resolution latency
//! - `config_reloads_total` (counter): reloads by `result` (`success`, `failure`)
//! - `config_releases` (gauge): releases in the active snapshot
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus exporter on `addr`. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one update check.
pub fn record_update_check(outcome: &'static str, start: Instant) {
    counter!("update_checks_total", "outcome" => outcome).increment(1);
    histogram!("update_check_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record a reload attempt.
pub fn record_reload(success: bool) {
    let result = if success { "success" } else { "failure" };
    counter!("config_reloads_total", "result" => result).increment(1);
}

/// Publish the number of releases in the active snapshot.
pub fn record_release_count(releases: usize) {
    gauge!("config_releases").set(releases as f64);
}
