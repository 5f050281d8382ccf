//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Resource module (implements Routable)
//!     → route.rs (ordered Route descriptors: method + path + handler)
//!     → installer.rs (exhaustive match on method → per-method registration)
//!     → table.rs (conflict checks, axum MethodRouter per path)
//!     → axum::Router served by http::server
//! ```
//!
//! # Design Decisions
//! - Resource modules only describe endpoints; they never register them
//! - Routes are installed at startup and immutable at runtime
//! - Method + path pairs are unique across all installed modules
//! - Adding an `HttpMethod` variant fails to compile until every match handles it

pub mod installer;
pub mod route;
pub mod table;

pub use installer::{install, RouteRegistry};
pub use route::{Handler, HttpMethod, Routable, Route};
pub use table::{RouteError, RouteTable};
