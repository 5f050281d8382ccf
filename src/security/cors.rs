//! Cross-origin resource sharing.
//!
//! Preflight handling and response headers come from `tower_http::cors`. With
//! `short_circuit` set, requests carrying an `Origin` outside the allowed list
//! are refused with 403 before reaching CORS or the handlers.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::config::CorsConfig;
use crate::observability::metrics;
use crate::security::SecurityError;

const ANY_ORIGIN: &str = "*";

pub struct Cors {
    layer: CorsLayer,
    guard: Option<Arc<OriginGuard>>,
}

#[derive(Debug)]
struct OriginGuard {
    origins: Vec<HeaderValue>,
}

impl Cors {
    /// `None` when CORS is disabled.
    pub fn from_config(config: &CorsConfig) -> Result<Option<Self>, SecurityError> {
        let any_origin = config.allowed_origins.iter().any(|o| o == ANY_ORIGIN);
        let origins = config
            .allowed_origins
            .iter()
            .filter(|o| *o != ANY_ORIGIN)
            .map(|o| HeaderValue::from_str(o).map_err(|_| SecurityError::InvalidOrigin(o.clone())))
            .collect::<Result<Vec<_>, _>>()?;
        let methods = config
            .allowed_methods
            .iter()
            .map(|m| {
                Method::from_bytes(m.to_ascii_uppercase().as_bytes())
                    .map_err(|_| SecurityError::InvalidMethod(m.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let allowed_headers = header_names(&config.allowed_headers)?;
        let exposed_headers = header_names(&config.exposed_headers)?;
        if any_origin && config.allow_credentials {
            return Err(SecurityError::CredentialsWithAnyOrigin);
        }
        if !config.enabled {
            return Ok(None);
        }

        let mut layer = CorsLayer::new()
            .allow_methods(methods)
            .allow_headers(allowed_headers)
            .expose_headers(exposed_headers)
            .allow_credentials(config.allow_credentials);
        layer = if any_origin {
            layer.allow_origin(Any)
        } else {
            layer.allow_origin(origins.clone())
        };
        if let Some(secs) = config.max_age_secs {
            layer = layer.max_age(Duration::from_secs(secs));
        }

        let guard =
            (config.short_circuit && !any_origin).then(|| Arc::new(OriginGuard { origins }));
        Ok(Some(Self { layer, guard }))
    }

    pub fn apply(self, router: Router) -> Router {
        let router = router.layer(self.layer);
        match self.guard {
            Some(guard) => router.layer(middleware::from_fn_with_state(guard, origin_guard)),
            None => router,
        }
    }
}

fn header_names(values: &[String]) -> Result<Vec<HeaderName>, SecurityError> {
    values
        .iter()
        .map(|h| {
            HeaderName::from_bytes(h.as_bytes())
                .map_err(|_| SecurityError::InvalidHeader(h.clone()))
        })
        .collect()
}

async fn origin_guard(
    State(guard): State<Arc<OriginGuard>>,
    request: Request,
    next: Next,
) -> Response {
    match request.headers().get(header::ORIGIN) {
        Some(origin) if !guard.origins.contains(origin) => {
            tracing::warn!(origin = ?origin, "Origin not allowed");
            metrics::record_rejected("cors_origin");
            StatusCode::FORBIDDEN.into_response()
        }
        _ => next.run(request).await,
    }
}
