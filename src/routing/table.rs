//! Axum-backed route table.
//!
//! # Responsibilities
//! - Accept per-method registrations from the installer
//! - Reject malformed paths and duplicate method + path pairs
//! - Produce an `axum::Router` once all modules are installed
//!
//! # Design Decisions
//! - Conflicts are detected here, before axum sees the route, so a bad
//!   configuration is an `Err` rather than a panic
//! - Paths are compared by shape: `/people/{person}` and `/people/{id}` are the
//!   same route to the router, so they must use the same capture names
//! - Captures span a whole segment; a catch-all (`{*rest}`) must be the last one
//! - Paths keep their registration order; methods sharing a path are merged

use std::collections::{BTreeSet, HashMap};
use std::future::ready;

use axum::body::Bytes;
use axum::extract::Path;
use axum::http::HeaderMap;
use axum::routing::{MethodFilter, MethodRouter};
use axum::Router;
use thiserror::Error;

use crate::http::RouteRequest;
use crate::routing::installer::RouteRegistry;
use crate::routing::route::{Handler, HttpMethod};

/// Errors reported while building the route table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("route {method} {path} already has a handler")]
    Conflict { method: HttpMethod, path: String },

    #[error("route {path} overlaps {existing} with different capture names")]
    CaptureConflict { path: String, existing: String },

    #[error("invalid route path {0:?}")]
    InvalidPath(String),
}

struct Entry {
    shape: String,
    path: String,
    methods: MethodRouter,
}

/// Collects routes and converts them into an axum router.
#[derive(Default)]
pub struct RouteTable {
    entries: Vec<Entry>,
    registered: BTreeSet<(String, HttpMethod)>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of method + path pairs registered so far.
    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }

    pub fn contains(&self, method: HttpMethod, path: &str) -> bool {
        self.registered.contains(&(path.to_string(), method))
    }

    /// Registered pairs, ordered by path then method.
    pub fn routes(&self) -> impl Iterator<Item = (HttpMethod, &str)> + '_ {
        self.registered.iter().map(|(path, method)| (*method, path.as_str()))
    }

    fn register(
        &mut self,
        method: HttpMethod,
        path: &str,
        handler: Handler,
    ) -> Result<(), RouteError> {
        let shape = route_shape(path).ok_or_else(|| RouteError::InvalidPath(path.to_string()))?;
        let filter = method_filter(method);
        let captures = shape.contains('{');

        match self.entries.iter_mut().find(|entry| entry.shape == shape) {
            Some(entry) if entry.path != path => {
                return Err(RouteError::CaptureConflict {
                    path: path.to_string(),
                    existing: entry.path.clone(),
                });
            }
            Some(entry) => {
                if !self.registered.insert((path.to_string(), method)) {
                    return Err(RouteError::Conflict {
                        method,
                        path: path.to_string(),
                    });
                }
                let current = std::mem::replace(&mut entry.methods, MethodRouter::new());
                entry.methods = endpoint(current, filter, handler, captures);
            }
            None => {
                self.registered.insert((path.to_string(), method));
                self.entries.push(Entry {
                    shape,
                    path: path.to_string(),
                    methods: endpoint(MethodRouter::new(), filter, handler, captures),
                });
            }
        }

        tracing::debug!(method = %method, path = %path, "Route registered");
        Ok(())
    }

    /// Consume the table and build the router.
    pub fn into_router(self) -> Router {
        self.entries
            .into_iter()
            .fold(Router::new(), |router, entry| router.route(&entry.path, entry.methods))
    }
}

/// Rewrite every capture to `{}` (or `{*}` for a catch-all), or `None` when
/// the path is not something the router accepts.
fn route_shape(path: &str) -> Option<String> {
    let rest = path.strip_prefix('/')?;
    let segments: Vec<&str> = rest.split('/').collect();
    let mut names = BTreeSet::new();
    let mut shape = String::with_capacity(path.len());

    for (i, segment) in segments.iter().enumerate() {
        shape.push('/');
        let Some(capture) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) else {
            if segment.contains(['{', '}']) {
                return None;
            }
            shape.push_str(segment);
            continue;
        };

        let (catch_all, name) = match capture.strip_prefix('*') {
            Some(name) => (true, name),
            None => (false, capture),
        };
        let valid_name = !name.is_empty()
            && name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-');
        if !valid_name || !names.insert(name) || (catch_all && i + 1 != segments.len()) {
            return None;
        }
        shape.push_str(if catch_all { "{*}" } else { "{}" });
    }
    Some(shape)
}

fn method_filter(method: HttpMethod) -> MethodFilter {
    match method {
        HttpMethod::Get => MethodFilter::GET,
        HttpMethod::Head => MethodFilter::HEAD,
        HttpMethod::Post => MethodFilter::POST,
        HttpMethod::Put => MethodFilter::PUT,
        HttpMethod::Patch => MethodFilter::PATCH,
        HttpMethod::Delete => MethodFilter::DELETE,
        HttpMethod::Options => MethodFilter::OPTIONS,
        HttpMethod::Trace => MethodFilter::TRACE,
        HttpMethod::Connect => MethodFilter::CONNECT,
    }
}

/// Adapt a `Handler` to axum's extractor model and add it to `methods`.
fn endpoint(
    methods: MethodRouter,
    filter: MethodFilter,
    handler: Handler,
    captures: bool,
) -> MethodRouter {
    if captures {
        methods.on(
            filter,
            move |headers: HeaderMap,
                  Path(variables): Path<HashMap<String, String>>,
                  body: Bytes| {
                let request = RouteRequest::from_parts(&headers, variables, body);
                ready(handler(&request))
            },
        )
    } else {
        methods.on(filter, move |headers: HeaderMap, body: Bytes| {
            let request = RouteRequest::from_parts(&headers, HashMap::new(), body);
            ready(handler(&request))
        })
    }
}

impl RouteRegistry for RouteTable {
    type Error = RouteError;

    fn get(&mut self, path: &str, handler: Handler) -> Result<(), RouteError> {
        self.register(HttpMethod::Get, path, handler)
    }

    fn head(&mut self, path: &str, handler: Handler) -> Result<(), RouteError> {
        self.register(HttpMethod::Head, path, handler)
    }

    fn post(&mut self, path: &str, handler: Handler) -> Result<(), RouteError> {
        self.register(HttpMethod::Post, path, handler)
    }

    fn put(&mut self, path: &str, handler: Handler) -> Result<(), RouteError> {
        self.register(HttpMethod::Put, path, handler)
    }

    fn patch(&mut self, path: &str, handler: Handler) -> Result<(), RouteError> {
        self.register(HttpMethod::Patch, path, handler)
    }

    fn delete(&mut self, path: &str, handler: Handler) -> Result<(), RouteError> {
        self.register(HttpMethod::Delete, path, handler)
    }

    fn options(&mut self, path: &str, handler: Handler) -> Result<(), RouteError> {
        self.register(HttpMethod::Options, path, handler)
    }

    fn trace(&mut self, path: &str, handler: Handler) -> Result<(), RouteError> {
        self.register(HttpMethod::Trace, path, handler)
    }

    fn connect(&mut self, path: &str, handler: Handler) -> Result<(), RouteError> {
        self.register(HttpMethod::Connect, path, handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::RouteResponse;
    use crate::routing::installer::install;
    use crate::routing::route::Route;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn echo_variable(req: &RouteRequest) -> RouteResponse {
        RouteResponse::text(StatusCode::OK, req.variable("id").unwrap_or("none"))
    }

    fn echo_body(req: &RouteRequest) -> RouteResponse {
        RouteResponse::text(StatusCode::CREATED, String::from_utf8_lossy(req.body()))
    }

    #[test]
    fn test_duplicate_route_is_rejected() {
        let mut table = RouteTable::new();
        install(&mut table, &vec![Route::get("/items", echo_body)]).unwrap();

        let err = install(&mut table, &vec![Route::get("/items", echo_body)]).unwrap_err();
        assert_eq!(
            err,
            RouteError::Conflict {
                method: HttpMethod::Get,
                path: "/items".into()
            }
        );
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_same_path_different_methods() {
        let mut table = RouteTable::new();
        let routes = vec![Route::get("/items", echo_body), Route::post("/items", echo_body)];
        install(&mut table, &routes).unwrap();

        assert!(table.contains(HttpMethod::Get, "/items"));
        assert!(table.contains(HttpMethod::Post, "/items"));
        assert!(!table.contains(HttpMethod::Put, "/items"));
    }

    #[test]
    fn test_invalid_paths() {
        let mut table = RouteTable::new();
        let paths = [
            "",
            "items",
            "/items/{id",
            "/items/id}",
            "/items/{}",
            "/items/{*}",
            "/items/x{id}",
            "/items/{a b}",
            "/items/{*rest}/tail",
            "/items/{id}/{id}",
        ];
        for path in paths {
            let err = install(&mut table, &vec![Route::get(path, echo_body)]).unwrap_err();
            assert_eq!(err, RouteError::InvalidPath(path.to_string()));
        }
        assert!(table.is_empty());
    }

    #[test]
    fn test_malformed_capture_does_not_reach_router() {
        let mut table = RouteTable::new();
        let err = install(&mut table, &vec![Route::get("/people/{person", echo_body)]).unwrap_err();
        assert_eq!(err, RouteError::InvalidPath("/people/{person".into()));

        install(&mut table, &vec![Route::get("/people/{person}", echo_variable)]).unwrap();
        let _router = table.into_router();
    }

    #[test]
    fn test_capture_names_must_agree_across_methods() {
        let mut table = RouteTable::new();
        install(&mut table, &vec![Route::get("/people/{person}", echo_variable)]).unwrap();

        let err = install(&mut table, &vec![Route::post("/people/{id}", echo_body)]).unwrap_err();
        assert_eq!(
            err,
            RouteError::CaptureConflict {
                path: "/people/{id}".into(),
                existing: "/people/{person}".into(),
            }
        );
        assert_eq!(table.len(), 1);
        assert!(!table.contains(HttpMethod::Post, "/people/{id}"));

        let _router = table.into_router();
    }

    #[test]
    fn test_same_shape_same_method_conflicts() {
        let mut table = RouteTable::new();
        install(&mut table, &vec![Route::get("/files/{*path}", echo_body)]).unwrap();

        let err = install(&mut table, &vec![Route::get("/files/{*rest}", echo_body)]).unwrap_err();
        assert!(matches!(err, RouteError::CaptureConflict { .. }));
    }

    #[tokio::test]
    async fn test_static_and_capture_segments_coexist() {
        let mut table = RouteTable::new();
        let routes = vec![
            Route::get("/items/{id}", echo_variable),
            Route::get("/items/latest", echo_body),
            Route::post("/items/{id}", echo_body),
        ];
        install(&mut table, &routes).unwrap();
        assert_eq!(table.len(), 3);
        let router = table.into_router();

        let response = router
            .clone()
            .oneshot(Request::get("/items/7").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .oneshot(Request::post("/items/7").body(Body::from("x")).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_router_dispatches_with_variables() {
        let mut table = RouteTable::new();
        install(&mut table, &vec![Route::get("/items/{id}", echo_variable)]).unwrap();
        let router = table.into_router();

        let response = router
            .oneshot(Request::get("/items/42").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"42");
    }

    #[tokio::test]
    async fn test_router_passes_body() {
        let mut table = RouteTable::new();
        install(&mut table, &vec![Route::post("/items", echo_body)]).unwrap();
        let router = table.into_router();

        let response = router
            .oneshot(Request::post("/items").body(Body::from("payload")).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"payload");
    }

    #[tokio::test]
    async fn test_unregistered_method_is_rejected() {
        let mut table = RouteTable::new();
        install(&mut table, &vec![Route::get("/items", echo_body)]).unwrap();
        let router = table.into_router();

        let response = router
            .oneshot(Request::delete("/items").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
