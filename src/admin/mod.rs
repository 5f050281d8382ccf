//! Operational endpoints, installed through the same `Routable` contract as
//! resource modules.

pub mod handlers;

use metrics_exporter_prometheus::PrometheusHandle;

use crate::codec::JsonCodec;
use crate::health::HealthCheckRegistry;
use crate::http::RouteRequest;
use crate::routing::{Routable, Route};

/// `/ping`, `/ready`, `/info`, `/health` and, with a recorder, `/metrics`.
#[derive(Clone)]
pub struct AdminRoutes {
    health: HealthCheckRegistry,
    metrics: Option<PrometheusHandle>,
    codec: JsonCodec,
}

impl AdminRoutes {
    pub fn new(health: HealthCheckRegistry, metrics: Option<PrometheusHandle>) -> Self {
        Self {
            health,
            metrics,
            codec: JsonCodec::pretty(),
        }
    }
}

impl Routable for AdminRoutes {
    fn routes(&self) -> Vec<Route> {
        let info_codec = self.codec;
        let health = self.health.clone();
        let health_codec = self.codec;

        let mut routes = vec![
            Route::get("/ping", |_: &RouteRequest| handlers::ping()),
            Route::get("/ready", |_: &RouteRequest| handlers::ready()),
            Route::get("/info", move |_: &RouteRequest| handlers::info(&info_codec)),
            Route::get("/health", move |_: &RouteRequest| {
                handlers::health(&health, &health_codec)
            }),
        ];

        if let Some(handle) = self.metrics.clone() {
            routes.push(Route::get("/metrics", move |_: &RouteRequest| {
                handlers::metrics(&handle)
            }));
        }
        routes
    }
}
