//! Metrics collection and exposition.
//!
//! # Metrics
//! - `edge_origin_requests_total` (counter): pass-through requests by `rewritten`
//! - `edge_origin_rewrite_failures_total` (counter): mapper failures
//! - `edge_dispatch_requests_total` (counter): application requests by method, status
//! - `edge_dispatch_duration_seconds` (histogram): application latency
//! - `edge_handler_failures_total` (counter): requests answered with a synthesized 500
//!
//! # Design Decisions
//! - Recording is a no-op until `init_metrics` installs the exporter
//! - Labels stay low-cardinality (no paths, non-standard methods folded into `OTHER`)

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_origin(rewritten: bool) {
    metrics::counter!(
        "edge_origin_requests_total",
        "rewritten" => if rewritten { "true" } else { "false" }
    )
    .increment(1);
}

pub fn record_rewrite_failure() {
    metrics::counter!("edge_origin_rewrite_failures_total").increment(1);
}

pub fn record_dispatch(method: &str, status: &str, start: Instant) {
    metrics::counter!(
        "edge_dispatch_requests_total",
        "method" => method_label(method),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("edge_dispatch_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_handler_failure() {
    metrics::counter!("edge_handler_failures_total").increment(1);
}

/// Bounded label for a request method.
fn method_label(method: &str) -> &'static str {
    match method {
        "GET" => "GET",
        "HEAD" => "HEAD",
        "POST" => "POST",
        "PUT" => "PUT",
        "DELETE" => "DELETE",
        "CONNECT" => "CONNECT",
        "OPTIONS" => "OPTIONS",
        "TRACE" => "TRACE",
        "PATCH" => "PATCH",
        _ => "OTHER",
    }
}
