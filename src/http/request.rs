//! Request handling.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) when the client sent none
//! - Carry body bytes and captured path variables to handlers
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Handlers see an owned, framework-free request so they can be driven
//!   directly in tests

use std::collections::HashMap;

use axum::body::Bytes;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header carrying the request correlation ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Generates a fresh UUID v4 for requests that arrive without an ID.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// The request as seen by a route handler.
#[derive(Debug, Clone, Default)]
pub struct RouteRequest {
    body: Bytes,
    variables: HashMap<String, String>,
    request_id: Option<String>,
}

impl RouteRequest {
    /// Create a request with the given body and no path variables.
    pub fn new(body: impl Into<Bytes>) -> Self {
        Self {
            body: body.into(),
            variables: HashMap::new(),
            request_id: None,
        }
    }

    /// Build the handler view from the parts axum extracted.
    pub(crate) fn from_parts(
        headers: &HeaderMap,
        variables: HashMap<String, String>,
        body: Bytes,
    ) -> Self {
        let request_id = headers
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        Self {
            body,
            variables,
            request_id,
        }
    }

    /// Attach a captured path variable.
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Attach a request ID.
    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Look up a captured path variable, e.g. `person` for `/people/{person}`.
    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    /// Correlation ID, or `"unknown"` when none was assigned.
    pub fn request_id(&self) -> &str {
        self.request_id.as_deref().unwrap_or("unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_variable_lookup() {
        let req = RouteRequest::new("").with_variable("person", "bob");
        assert_eq!(req.variable("person"), Some("bob"));
        assert_eq!(req.variable("other"), None);
    }

    #[test]
    fn test_from_parts_reads_request_id() {
        let mut headers = HeaderMap::new();
        headers.insert(X_REQUEST_ID, HeaderValue::from_static("abc-123"));
        let req = RouteRequest::from_parts(&headers, HashMap::new(), Bytes::from_static(b"{}"));
        assert_eq!(req.request_id(), "abc-123");
        assert_eq!(req.body(), b"{}");
    }

    #[test]
    fn test_missing_request_id() {
        assert_eq!(RouteRequest::new("").request_id(), "unknown");
    }

    #[test]
    fn test_make_request_uuid() {
        let request = Request::builder().body(Body::empty()).unwrap();
        let id = MakeRequestUuid.make_request_id(&request).unwrap();
        let text = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(text).is_ok());
    }
}
