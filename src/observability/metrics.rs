//! Metrics collection and exposition.
//!
//! # Metrics
//! - `health_switch_requests_total` (counter): requests by method and status
//! - `health_switch_request_duration_ms` (histogram): request latency

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Request counter metric name.
pub const METRIC_REQUESTS_TOTAL: &str = "health_switch_requests_total";
/// Request latency metric name.
pub const METRIC_REQUEST_DURATION: &str = "health_switch_request_duration_ms";

/// Install the Prometheus exporter on a side port.
///
/// Failure to install is logged and otherwise ignored; request handling does
/// not depend on the exporter.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            describe_counter!(
                METRIC_REQUESTS_TOTAL,
                "Total HTTP requests by method and status"
            );
            describe_histogram!(METRIC_REQUEST_DURATION, "Request latency in milliseconds");
            tracing::info!(address = %addr, "Prometheus exporter listening");
        }
        Err(error) => {
            tracing::error!(%error, "Failed to install Prometheus exporter");
        }
    }
}

/// Record one completed request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    let method = method.to_string();
    let status = status.to_string();

    counter!(
        METRIC_REQUESTS_TOTAL,
        "method" => method.clone(),
        "status" => status.clone()
    )
    .increment(1);

    histogram!(
        METRIC_REQUEST_DURATION,
        "method" => method,
        "status" => status
    )
    .record(start.elapsed().as_millis() as f64);
}
