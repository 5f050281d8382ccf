//! Soft and hard request rate limits.
//!
//! # Responsibilities
//! - Limit each client, and all traffic combined, to a soft and a hard rate
//! - Answer 429 past the soft rate; past the hard rate also close the connection
//!
//! # Design Decisions
//! - Token buckets refilled at the configured rate, holding one second of burst
//! - Clients share a fixed pool of buckets chosen by hashing the address, so
//!   memory stays bounded no matter how many addresses connect
//! - Addresses listed in `client_overrides` get dedicated buckets
//! - The global limiter is charged for every request, including ones the
//!   client limiter already refused

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::net::IpAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::{RateLimitConfig, RateLimits};
use crate::observability::metrics;
use crate::security::{client_ip, SecurityError};

/// Outcome of charging one request, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verdict {
    Allow,
    Soft,
    Hard,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Allow => "allow",
            Verdict::Soft => "soft_rate_limit",
            Verdict::Hard => "hard_rate_limit",
        }
    }
}

struct TokenBucket {
    tokens: f64,
    last_update: Instant,
}

impl TokenBucket {
    fn new(rate: f64) -> Self {
        Self {
            tokens: capacity(rate),
            last_update: Instant::now(),
        }
    }

    fn try_acquire(&mut self, rate: f64) -> bool {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();
        self.tokens = (self.tokens + elapsed * rate).min(capacity(rate));
        self.last_update = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

fn capacity(rate: f64) -> f64 {
    rate.max(1.0)
}

struct Limiter {
    limits: RateLimits,
    soft: TokenBucket,
    hard: TokenBucket,
}

impl Limiter {
    fn new(limits: RateLimits) -> Mutex<Self> {
        Mutex::new(Self {
            limits,
            soft: TokenBucket::new(limits.soft),
            hard: TokenBucket::new(limits.hard),
        })
    }

    fn acquire(&mut self) -> Verdict {
        if !self.hard.try_acquire(self.limits.hard) {
            Verdict::Hard
        } else if !self.soft.try_acquire(self.limits.soft) {
            Verdict::Soft
        } else {
            Verdict::Allow
        }
    }
}

pub struct RateLimiter {
    global: Mutex<Limiter>,
    pool: Vec<Mutex<Limiter>>,
    overrides: HashMap<IpAddr, Mutex<Limiter>>,
}

impl RateLimiter {
    /// `None` when rate limiting is disabled.
    pub fn from_config(config: &RateLimitConfig) -> Result<Option<Self>, SecurityError> {
        let limiter = Self::new(config)?;
        Ok(config.enabled.then_some(limiter))
    }

    pub fn new(config: &RateLimitConfig) -> Result<Self, SecurityError> {
        check_limits("per_client", &config.per_client)?;
        check_limits("global", &config.global)?;
        if config.pool_size == 0 {
            return Err(SecurityError::EmptyPool);
        }

        let mut overrides = HashMap::new();
        for (address, limits) in &config.client_overrides {
            let ip: IpAddr = address.parse().map_err(|_| SecurityError::InvalidAddress {
                list: "rate_limit.client_overrides",
                value: address.clone(),
            })?;
            check_limits(&format!("client_overrides.{}", address), limits)?;
            overrides.insert(ip, Limiter::new(*limits));
        }

        Ok(Self {
            global: Limiter::new(config.global),
            pool: (0..config.pool_size)
                .map(|_| Limiter::new(config.per_client))
                .collect(),
            overrides,
        })
    }

    /// Charge one request from `client` against its bucket and the global one.
    pub fn check(&self, client: Option<IpAddr>) -> Verdict {
        let client_verdict = acquire(self.bucket_for(client));
        let global_verdict = acquire(&self.global);
        client_verdict.max(global_verdict)
    }

    fn bucket_for(&self, client: Option<IpAddr>) -> &Mutex<Limiter> {
        if let Some(limiter) = client.and_then(|ip| self.overrides.get(&ip)) {
            return limiter;
        }
        let index = client.map_or(0, |ip| {
            let mut hasher = DefaultHasher::new();
            ip.hash(&mut hasher);
            (hasher.finish() % self.pool.len() as u64) as usize
        });
        &self.pool[index]
    }
}

fn acquire(limiter: &Mutex<Limiter>) -> Verdict {
    limiter.lock().unwrap_or_else(PoisonError::into_inner).acquire()
}

fn check_limits(name: &str, limits: &RateLimits) -> Result<(), SecurityError> {
    let valid = |rate: f64| rate.is_finite() && rate > 0.0;
    if valid(limits.soft) && valid(limits.hard) {
        Ok(())
    } else {
        Err(SecurityError::InvalidRate(name.to_string()))
    }
}

pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let client = client_ip(&request);
    let verdict = limiter.check(client);
    if verdict == Verdict::Allow {
        return next.run(request).await;
    }

    tracing::warn!(client = ?client, limit = verdict.as_str(), "Rate limit exceeded");
    metrics::record_rejected(verdict.as_str());

    let mut response = StatusCode::TOO_MANY_REQUESTS.into_response();
    let headers = response.headers_mut();
    match verdict {
        Verdict::Hard => headers.insert(header::CONNECTION, HeaderValue::from_static("close")),
        _ => headers.insert(header::RETRY_AFTER, HeaderValue::from_static("1")),
    };
    response
}
