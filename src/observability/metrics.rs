//! Metrics collection and exposition.
//!
//! # Metrics
//! - `people_http_requests_total` (counter): requests by method, route, status
//! - `people_http_request_duration_seconds` (histogram): latency distribution
//! - `people_store_records` (gauge): records held by the people store
//! - `people_requests_rejected_total` (counter): requests refused by the
//!   firewall, rate limiter or CORS origin check, by reason
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op, which keeps tests free of global state
//! - Route labels use the matched pattern (`/people/{person}`), never the raw path

use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and return a handle for rendering.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    tracing::info!("Prometheus recorder installed");
    Ok(handle)
}

pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("route", route.to_string()),
        ("status", status.to_string()),
    ];
    metrics::counter!("people_http_requests_total", &labels).increment(1);
    metrics::histogram!("people_http_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

/// Count one appended record. The store only grows, so increments from
/// concurrent creates commute and the gauge never moves backwards.
pub fn record_person_stored() {
    metrics::gauge!("people_store_records").increment(1.0);
}

pub fn record_rejected(reason: &'static str) {
    metrics::counter!("people_requests_rejected_total", "reason" => reason).increment(1);
}
