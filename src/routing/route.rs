//! Route descriptors and the `Routable` contract.
//!
//! # Responsibilities
//! - Enumerate the HTTP methods a route may bind
//! - Bind method + path pattern + handler into an immutable descriptor
//! - Let resource modules declare their endpoints without touching a router
//!
//! # Design Decisions
//! - Handlers are synchronous: every handler here works on in-memory state
//! - Descriptors are cheap to clone (the handler is reference counted)

use std::fmt;
use std::sync::Arc;

use axum::http::Method;

use crate::http::{RouteRequest, RouteResponse};

/// HTTP methods a route can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Trace,
    Connect,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 9] = [
        HttpMethod::Get,
        HttpMethod::Head,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Trace,
        HttpMethod::Connect,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Trace => "TRACE",
            HttpMethod::Connect => "CONNECT",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Head => Method::HEAD,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Options => Method::OPTIONS,
            HttpMethod::Trace => Method::TRACE,
            HttpMethod::Connect => Method::CONNECT,
        }
    }
}

/// A route handler: request in, response out.
pub type Handler = Arc<dyn Fn(&RouteRequest) -> RouteResponse + Send + Sync>;

/// Immutable binding of method, path pattern and handler.
///
/// Paths may embed `{name}` placeholders; the captured segments are exposed
/// through [`RouteRequest::variable`].
#[derive(Clone)]
pub struct Route {
    method: HttpMethod,
    path: String,
    handler: Handler,
}

impl Route {
    pub fn new<F>(method: HttpMethod, path: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&RouteRequest) -> RouteResponse + Send + Sync + 'static,
    {
        Self {
            method,
            path: path.into(),
            handler: Arc::new(handler),
        }
    }

    pub fn get<F>(path: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&RouteRequest) -> RouteResponse + Send + Sync + 'static,
    {
        Self::new(HttpMethod::Get, path, handler)
    }

    pub fn post<F>(path: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&RouteRequest) -> RouteResponse + Send + Sync + 'static,
    {
        Self::new(HttpMethod::Post, path, handler)
    }

    pub fn put<F>(path: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&RouteRequest) -> RouteResponse + Send + Sync + 'static,
    {
        Self::new(HttpMethod::Put, path, handler)
    }

    pub fn delete<F>(path: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&RouteRequest) -> RouteResponse + Send + Sync + 'static,
    {
        Self::new(HttpMethod::Delete, path, handler)
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    /// Invoke the handler directly, bypassing any router.
    pub fn call(&self, request: &RouteRequest) -> RouteResponse {
        (self.handler)(request)
    }

    pub fn into_parts(self) -> (HttpMethod, String, Handler) {
        (self.method, self.path, self.handler)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// A module that exposes a fixed, ordered set of routes.
///
/// Implementations must not register anything themselves; calling
/// `routes` twice yields equivalent descriptors.
pub trait Routable {
    fn routes(&self) -> Vec<Route>;
}

impl Routable for Vec<Route> {
    fn routes(&self) -> Vec<Route> {
        self.clone()
    }
}
