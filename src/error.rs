//! Handler error taxonomy and its HTTP mapping.

use axum::http::StatusCode;
use serde::Serialize;
use thiserror::Error;

use crate::codec::{CodecError, JsonCodec};
use crate::http::RouteResponse;

/// Errors a handler turns into a client-visible response.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body could not be parsed into the expected record.
    #[error("malformed request body: {0}")]
    BadRequest(#[source] CodecError),

    /// No record matches the requested key.
    #[error("{0}")]
    NotFound(String),

    /// A response body could not be produced.
    #[error("failed to build response: {0}")]
    Internal(#[source] CodecError),
}

/// JSON error body, e.g. `{"errorCode":"NotFound","message":"Person Not Found"}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope<'a> {
    pub error_code: &'a str,
    pub message: &'a str,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BadRequest",
            ApiError::NotFound(_) => "NotFound",
            ApiError::Internal(_) => "InternalServerError",
        }
    }

    /// Render the error. Bad requests carry no body; the rest carry an envelope.
    pub fn into_route_response(self, codec: &JsonCodec) -> RouteResponse {
        let status = self.status();
        let message = match &self {
            ApiError::BadRequest(_) => return RouteResponse::empty(status),
            ApiError::NotFound(message) => message.clone(),
            ApiError::Internal(_) => "Internal Server Error".to_string(),
        };

        let envelope = ErrorEnvelope {
            error_code: self.error_code(),
            message: &message,
        };
        RouteResponse::json(codec, status, &envelope).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to encode error envelope");
            RouteResponse::empty(StatusCode::INTERNAL_SERVER_ERROR)
        })
    }
}
