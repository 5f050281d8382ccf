//! Startup orchestration.
//!
//! # Responsibilities
//! - Construct the codec and resource modules
//! - Install them into the HTTP server
//! - Register health checks
//!
//! # Design Decisions
//! - Fail fast: a route conflict is a startup error
//! - The codec is built once here and injected into every module

use metrics_exporter_prometheus::PrometheusHandle;

use crate::codec::JsonCodec;
use crate::config::ServerConfig;
use crate::http::HttpServer;
use crate::people::{PeopleRoutes, StoreHealthCheck};
use crate::routing::RouteError;

/// Everything `main` needs to serve the people resource.
pub struct Application {
    pub server: HttpServer,
    pub people: PeopleRoutes,
}

/// Assemble the server with the people resource installed.
pub fn build_application(
    config: ServerConfig,
    metrics: Option<PrometheusHandle>,
) -> Result<Application, RouteError> {
    let codec = JsonCodec::new();
    let people = PeopleRoutes::new(codec);

    let mut server = HttpServer::new(config);
    if let Some(handle) = metrics {
        server = server.with_metrics(handle);
    }
    server.add_routable(&people)?;
    server.add_health_check("people_store", StoreHealthCheck::new(people.store().clone()));

    Ok(Application { server, people })
}
