//! People resource server library.
//!
//! Resource modules declare their endpoints as `Routable` route descriptors;
//! the HTTP server installs them into an axum router and serves them.

pub mod admin;
pub mod codec;
pub mod config;
pub mod error;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod people;
pub mod routing;
pub mod security;

pub use codec::JsonCodec;
pub use config::ServerConfig;
pub use http::{HttpServer, RouteRequest, RouteResponse};
pub use lifecycle::Shutdown;
pub use people::{PeopleRoutes, Person};
pub use routing::{HttpMethod, Routable, Route};
