//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → firewall.rs (client IP allow/deny lists)
//!     → rate_limit.rs (per-client and global soft/hard limits)
//!     → cors.rs (origin check, preflight, CORS response headers)
//!     → Pass to routing
//! ```
//!
//! # Design Decisions
//! - Fail closed: a request without a known client address is refused when an
//!   allow list is active
//! - Each stage is only layered in when its config section enables it
//! - All config is parsed up front; a bad list entry is a startup error

pub mod cors;
pub mod firewall;
pub mod rate_limit;

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::Request;
use axum::{middleware, Router};
use thiserror::Error;

use crate::config::SecurityConfig;

pub use cors::Cors;
pub use firewall::Firewall;
pub use rate_limit::{RateLimiter, Verdict};

/// Errors in the `[security]` config section.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecurityError {
    #[error("security.{list} entry {value:?} is not an IP address")]
    InvalidAddress { list: &'static str, value: String },

    #[error("security.rate_limit.{0} rates must be positive numbers")]
    InvalidRate(String),

    #[error("security.rate_limit.pool_size must be greater than zero")]
    EmptyPool,

    #[error("security.cors.allowed_origins entry {0:?} is not a valid origin")]
    InvalidOrigin(String),

    #[error("security.cors method {0:?} is not an HTTP method")]
    InvalidMethod(String),

    #[error("security.cors header {0:?} is not a valid header name")]
    InvalidHeader(String),

    #[error("security.cors.allow_credentials cannot be combined with a \"*\" origin")]
    CredentialsWithAnyOrigin,
}

/// Address of the connected peer, when the server recorded one.
pub fn client_ip<B>(request: &Request<B>) -> Option<IpAddr> {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_canonical())
}

/// The enabled security stages, ready to wrap a router.
#[derive(Default)]
pub struct SecurityLayers {
    firewall: Option<Arc<Firewall>>,
    rate_limiter: Option<Arc<RateLimiter>>,
    cors: Option<Cors>,
}

impl SecurityLayers {
    pub fn from_config(config: &SecurityConfig) -> Result<Self, SecurityError> {
        Ok(Self {
            firewall: Firewall::from_config(&config.firewall)?.map(Arc::new),
            rate_limiter: RateLimiter::from_config(&config.rate_limit)?.map(Arc::new),
            cors: Cors::from_config(&config.cors)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.firewall.is_none() && self.rate_limiter.is_none() && self.cors.is_none()
    }

    /// Wrap `router` so the firewall runs first and CORS last.
    pub fn apply(self, mut router: Router) -> Router {
        if let Some(cors) = self.cors {
            router = cors.apply(router);
        }
        if let Some(limiter) = self.rate_limiter {
            router = router.layer(middleware::from_fn_with_state(
                limiter,
                rate_limit::rate_limit_middleware,
            ));
        }
        if let Some(firewall) = self.firewall {
            router = router.layer(middleware::from_fn_with_state(
                firewall,
                firewall::firewall_middleware,
            ));
        }
        router
    }
}
