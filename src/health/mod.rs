//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Service code registers named checks at startup
//!     → HealthCheckRegistry (ordered by name)
//!     → GET /health runs every check
//!     → JSON map: name → { healthy, message }
//! ```
//!
//! # Design Decisions
//! - Checks are synchronous and cheap; they run inline on the request
//! - The registry is frozen once the server is built

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

/// Outcome of a single health check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub healthy: bool,
    pub message: Option<String>,
}

impl HealthStatus {
    pub fn healthy() -> Self {
        Self {
            healthy: true,
            message: None,
        }
    }

    pub fn healthy_with(message: impl Into<String>) -> Self {
        Self {
            healthy: true,
            message: Some(message.into()),
        }
    }

    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            healthy: false,
            message: Some(message.into()),
        }
    }
}

/// A named check of some part of the service.
pub trait HealthCheck: Send + Sync {
    fn check(&self) -> HealthStatus;
}

impl<F> HealthCheck for F
where
    F: Fn() -> HealthStatus + Send + Sync,
{
    fn check(&self) -> HealthStatus {
        self()
    }
}

/// Named health checks.
#[derive(Clone, Default)]
pub struct HealthCheckRegistry {
    checks: BTreeMap<String, Arc<dyn HealthCheck>>,
}

impl HealthCheckRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a check, replacing any previous check with the same name.
    pub fn register(&mut self, name: impl Into<String>, check: impl HealthCheck + 'static) {
        let name = name.into();
        if self.checks.insert(name.clone(), Arc::new(check)).is_some() {
            tracing::warn!(name = %name, "Replaced existing health check");
        }
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Run every check, in name order.
    pub fn run_all(&self) -> BTreeMap<String, HealthStatus> {
        self.checks
            .iter()
            .map(|(name, check)| {
                let status = check.check();
                if !status.healthy {
                    tracing::warn!(check = %name, message = ?status.message, "Health check failed");
                }
                (name.clone(), status)
            })
            .collect()
    }
}
