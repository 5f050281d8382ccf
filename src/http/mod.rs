//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, body + path variables → RouteRequest)
//!     → [routing table dispatches to handler]
//!     → response.rs (RouteResponse → axum Response)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuid, RouteRequest, X_REQUEST_ID};
pub use response::RouteResponse;
pub use server::{HttpServer, ServerError};
