//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the people server.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Operational endpoints.
    pub admin: AdminConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Request hardening.
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Admin route configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AdminConfig {
    /// Install `/ping`, `/ready`, `/info`, `/health` and `/metrics`.
    pub enabled: bool,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Install the Prometheus recorder and expose `/metrics`.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: true,
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,

    /// Soft/hard request rate limits.
    pub rate_limit: RateLimitConfig,

    /// Client IP allow and deny lists.
    pub firewall: FirewallConfig,

    /// Cross-origin resource sharing.
    pub cors: CorsConfig,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
            rate_limit: RateLimitConfig::default(),
            firewall: FirewallConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

/// Requests per second allowed before a limit fires.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct RateLimits {
    /// Above this rate requests get 429.
    pub soft: f64,
    /// Above this rate requests get 429 and the connection is closed.
    pub hard: f64,
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RateLimitConfig {
    pub enabled: bool,

    /// Limits applied to each client.
    pub per_client: RateLimits,

    /// Limits applied to all traffic combined.
    pub global: RateLimits,

    /// Number of shared buckets clients are hashed into.
    pub pool_size: usize,

    /// Dedicated limits keyed by client IP address.
    pub client_overrides: BTreeMap<String, RateLimits>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            per_client: RateLimits {
                soft: 500.0,
                hard: 1000.0,
            },
            global: RateLimits {
                soft: 5000.0,
                hard: 10000.0,
            },
            pool_size: 64,
            client_overrides: BTreeMap::new(),
        }
    }
}

/// IP allow/deny lists.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(default)]
pub struct FirewallConfig {
    /// Only addresses in `allow_list` are served.
    pub allow_list_enabled: bool,
    pub allow_list: Vec<String>,

    /// Addresses in `deny_list` are refused.
    pub deny_list_enabled: bool,
    pub deny_list: Vec<String>,
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(default)]
pub struct CorsConfig {
    pub enabled: bool,

    /// Allowed origins; `"*"` allows any origin.
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub exposed_headers: Vec<String>,
    pub allow_credentials: bool,
    pub max_age_secs: Option<u64>,

    /// Answer 403 to requests from origins not in `allowed_origins`.
    pub short_circuit: bool,
}
