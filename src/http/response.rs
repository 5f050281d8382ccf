//! Response construction.
//!
//! # Responsibilities
//! - Represent a handler result as status + content type + body
//! - Convert that result into an axum response
//!
//! # Design Decisions
//! - Bodies are fully buffered; every payload here is small and in-memory
//! - JSON responses are produced through an injected `JsonCodec`

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::codec::{CodecError, JsonCodec};

pub const APPLICATION_JSON: &str = "application/json";
pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// A fully-buffered handler response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteResponse {
    status: StatusCode,
    content_type: Option<&'static str>,
    body: Bytes,
}

impl RouteResponse {
    pub fn new(status: StatusCode, content_type: Option<&'static str>, body: Bytes) -> Self {
        Self {
            status,
            content_type,
            body,
        }
    }

    /// `200 OK` with an empty body.
    pub fn ok() -> Self {
        Self::empty(StatusCode::OK)
    }

    /// A status with no body.
    pub fn empty(status: StatusCode) -> Self {
        Self::new(status, None, Bytes::new())
    }

    /// `200 OK` with `value` encoded as JSON.
    pub fn ok_json<T>(codec: &JsonCodec, value: &T) -> Result<Self, CodecError>
    where
        T: Serialize + ?Sized,
    {
        Self::json(codec, StatusCode::OK, value)
    }

    /// Any status with `value` encoded as JSON.
    pub fn json<T>(codec: &JsonCodec, status: StatusCode, value: &T) -> Result<Self, CodecError>
    where
        T: Serialize + ?Sized,
    {
        let body = codec.encode(value)?;
        Ok(Self::new(status, Some(APPLICATION_JSON), body))
    }

    /// Plain text body.
    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        Self::new(status, Some(TEXT_PLAIN), Bytes::from(body.into()))
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn content_type(&self) -> Option<&'static str> {
        self.content_type
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }
}

impl IntoResponse for RouteResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        if let Some(content_type) = self.content_type {
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        response
    }
}
