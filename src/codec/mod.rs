//! Wire codec subsystem.
//!
//! # Data Flow
//! ```text
//! Request body bytes
//!     → json.rs (decode into a typed record)
//!     → handler
//!     → json.rs (encode record or sequence)
//!     → Response body bytes
//! ```
//!
//! # Design Decisions
//! - The codec is a plain value constructed once and handed to resource modules
//! - Decode failures are ordinary `Err` values so handlers can map them to 4xx
//! - Output is compact and deterministic unless the pretty variant is chosen

pub mod json;

pub use json::{CodecError, JsonCodec};
