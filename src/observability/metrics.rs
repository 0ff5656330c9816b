//! Metrics collection and exposition.
//!
//! # Metrics
//! - `job_proxy_jobs_total` (counter): jobs by outcome (`success`,
//!   `not_ready`, or the failure kind)
//! - `job_proxy_job_duration_seconds` (histogram): handling latency
//! - `job_proxy_backend_ready` (gauge): 1=ready, 0=not ready, set at startup
//!
//! Recording is a no-op until a recorder is installed.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_outcome(outcome: &'static str) {
    metrics::counter!("job_proxy_jobs_total", "outcome" => outcome).increment(1);
}

pub fn record_job_duration(start: Instant) {
    metrics::histogram!("job_proxy_job_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_backend_ready(ready: bool) {
    metrics::gauge!("job_proxy_backend_ready").set(if ready { 1.0 } else { 0.0 });
}
