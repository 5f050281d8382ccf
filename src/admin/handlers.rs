use axum::http::StatusCode;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;

use crate::codec::JsonCodec;
use crate::health::HealthCheckRegistry;
use crate::http::RouteResponse;

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
}

pub fn ping() -> RouteResponse {
    RouteResponse::text(StatusCode::OK, "PONG")
}

pub fn ready() -> RouteResponse {
    RouteResponse::text(StatusCode::OK, "OK")
}

pub fn info(codec: &JsonCodec) -> RouteResponse {
    let status = SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
    };
    RouteResponse::ok_json(codec, &status).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to encode system status");
        RouteResponse::empty(StatusCode::INTERNAL_SERVER_ERROR)
    })
}

/// Runs every registered check; 503 if any of them is unhealthy.
pub fn health(registry: &HealthCheckRegistry, codec: &JsonCodec) -> RouteResponse {
    let results = registry.run_all();
    let status = if results.values().all(|s| s.healthy) {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    RouteResponse::json(codec, status, &results).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to encode health results");
        RouteResponse::empty(StatusCode::INTERNAL_SERVER_ERROR)
    })
}

pub fn metrics(handle: &PrometheusHandle) -> RouteResponse {
    RouteResponse::new(
        StatusCode::OK,
        Some(PROMETHEUS_CONTENT_TYPE),
        handle.render().into(),
    )
}
