//! JSON encoding and decoding backed by serde.

use axum::body::Bytes;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Errors produced at the codec boundary.
#[derive(Debug, Error)]
pub enum CodecError {
    /// A value could not be serialized.
    #[error("failed to encode JSON: {0}")]
    Encode(#[source] serde_json::Error),

    /// The body was not valid JSON for the expected shape.
    #[error("failed to decode JSON: {0}")]
    Decode(#[source] serde_json::Error),

    /// The body contained no bytes at all.
    #[error("request body is empty")]
    EmptyBody,
}

/// Serde-backed JSON codec.
///
/// Cheap to copy; construct one at startup and pass it to every module that
/// needs to read or write bodies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    /// Compact codec used for resource payloads.
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Indented output, used for operator-facing endpoints.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn is_pretty(&self) -> bool {
        self.pretty
    }

    /// Serialize `value` into a response body.
    pub fn encode<T>(&self, value: &T) -> Result<Bytes, CodecError>
    where
        T: Serialize + ?Sized,
    {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        }
        .map_err(CodecError::Encode)?;

        Ok(Bytes::from(bytes))
    }

    /// Parse a request body into `T`.
    pub fn decode<T>(&self, body: &[u8]) -> Result<T, CodecError>
    where
        T: DeserializeOwned,
    {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(CodecError::EmptyBody);
        }
        serde_json::from_slice(body).map_err(CodecError::Decode)
    }
}
