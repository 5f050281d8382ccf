//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Collect `Routable` modules into a route table
//! - Install admin routes when enabled
//! - Wire up middleware (tracing, limits, request ID, metrics, security)
//! - Bind server to listener and shut down gracefully

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, MatchedPath},
    http::Request,
    middleware::{self, Next},
    response::Response,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::admin::AdminRoutes;
use crate::config::ServerConfig;
use crate::health::{HealthCheck, HealthCheckRegistry};
use crate::http::request::{MakeRequestUuid, X_REQUEST_ID};
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;
use crate::routing::{install, Routable, RouteError, RouteTable};
use crate::security::{SecurityError, SecurityLayers};

/// Errors that stop the server from starting or serving.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("route configuration error: {0}")]
    Route(#[from] RouteError),

    #[error("security configuration error: {0}")]
    Security(#[from] SecurityError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP server hosting any number of `Routable` modules.
pub struct HttpServer {
    config: ServerConfig,
    routes: RouteTable,
    health: HealthCheckRegistry,
    metrics: Option<PrometheusHandle>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            routes: RouteTable::new(),
            health: HealthCheckRegistry::new(),
            metrics: None,
        }
    }

    /// Expose `handle` on `/metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Install every route declared by `routable`.
    pub fn add_routable(&mut self, routable: &dyn Routable) -> Result<(), RouteError> {
        install(&mut self.routes, routable)
    }

    /// Register a named check reported by `/health`.
    pub fn add_health_check(&mut self, name: impl Into<String>, check: impl HealthCheck + 'static) {
        self.health.register(name, check);
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the axum router with admin routes and all middleware layers.
    ///
    /// Outermost first: request id, trace, request id propagation, firewall,
    /// rate limit, CORS, timeout, body limit, routes.
    #[allow(deprecated)]
    pub fn build_router(self) -> Result<Router, ServerError> {
        let HttpServer {
            config,
            mut routes,
            health,
            metrics,
        } = self;

        if config.admin.enabled {
            install(&mut routes, &AdminRoutes::new(health, metrics))?;
        }

        for (method, path) in routes.routes() {
            tracing::info!(method = %method, path = %path, "Route installed");
        }

        let security = SecurityLayers::from_config(&config.security)?;
        if !security.is_empty() {
            tracing::info!(
                rate_limit = config.security.rate_limit.enabled,
                allow_list = config.security.firewall.allow_list_enabled,
                deny_list = config.security.firewall.deny_list_enabled,
                cors = config.security.cors.enabled,
                "Security layers enabled"
            );
        }

        let has_routes = !routes.is_empty();
        let mut router = routes.into_router();
        if has_routes {
            router = router.route_layer(middleware::from_fn(track_metrics));
        }

        let router = router
            .layer(DefaultBodyLimit::max(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)));

        Ok(security
            .apply(router)
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid)))
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: ShutdownSignal,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        let router = self.build_router()?;

        tracing::info!(address = %addr, "HTTP server starting");

        let app = router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Record count and latency for every matched request.
async fn track_metrics(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    let response = next.run(request).await;

    metrics::record_request(&method, &route, response.status().as_u16(), start);
    response
}
