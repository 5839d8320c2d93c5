//! Metrics collection and exposition.
//!
//! # Metrics
//! - `subdomain_rewrite_requests_total` (counter): rewritten requests by identifier presence
//! - `subdomain_rewrite_fallbacks_total` (counter): fallback forwards by result
//! - `subdomain_rewrite_dispatch_duration_seconds` (histogram): latency by outcome

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_rewrite(identifier_found: bool) {
    let identifier = if identifier_found { "present" } else { "absent" };
    counter!("subdomain_rewrite_requests_total", "identifier" => identifier).increment(1);
}

pub fn record_fallback(result: &'static str) {
    counter!("subdomain_rewrite_fallbacks_total", "result" => result).increment(1);
}

pub fn record_dispatch(outcome: &'static str, status: u16, start: Instant) {
    histogram!(
        "subdomain_rewrite_dispatch_duration_seconds",
        "outcome" => outcome,
        "status" => status.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}
