//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_resolutions_total` (counter): resolutions by outcome
//! - `router_resolution_duration_seconds` (histogram): time spent resolving
//! - `router_candidates_probed_total` (counter): modules probed
//! - `router_secure_redirects_total` (counter): redirects to secure URLs
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder with a scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_resolution(outcome: &'static str, start: Instant) {
    metrics::counter!("router_resolutions_total", "outcome" => outcome).increment(1);
    metrics::histogram!("router_resolution_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_candidate_probe() {
    metrics::counter!("router_candidates_probed_total").increment(1);
}

pub fn record_secure_redirect() {
    metrics::counter!("router_secure_redirects_total").increment(1);
}
