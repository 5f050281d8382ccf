//! Client IP allow and deny lists.
//!
//! The deny list wins over the allow list. Refused requests get an empty 403.

use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::FirewallConfig;
use crate::observability::metrics;
use crate::security::{client_ip, SecurityError};

#[derive(Debug)]
pub struct Firewall {
    allow: Option<HashSet<IpAddr>>,
    deny: HashSet<IpAddr>,
}

impl Firewall {
    /// `None` when neither list is enabled.
    pub fn from_config(config: &FirewallConfig) -> Result<Option<Self>, SecurityError> {
        let allow = parse_list("firewall.allow_list", &config.allow_list)?;
        let deny = parse_list("firewall.deny_list", &config.deny_list)?;
        if !config.allow_list_enabled && !config.deny_list_enabled {
            return Ok(None);
        }

        Ok(Some(Self {
            allow: config.allow_list_enabled.then_some(allow),
            deny: if config.deny_list_enabled {
                deny
            } else {
                HashSet::new()
            },
        }))
    }

    pub fn permits(&self, client: Option<IpAddr>) -> bool {
        match client {
            Some(ip) => {
                !self.deny.contains(&ip) && self.allow.as_ref().map_or(true, |a| a.contains(&ip))
            }
            None => self.allow.is_none(),
        }
    }
}

fn parse_list(list: &'static str, values: &[String]) -> Result<HashSet<IpAddr>, SecurityError> {
    values
        .iter()
        .map(|value| {
            value.parse::<IpAddr>().map_err(|_| SecurityError::InvalidAddress {
                list,
                value: value.clone(),
            })
        })
        .collect()
}

pub async fn firewall_middleware(
    State(firewall): State<Arc<Firewall>>,
    request: Request,
    next: Next,
) -> Response {
    let client = client_ip(&request);
    if firewall.permits(client) {
        return next.run(request).await;
    }

    tracing::warn!(client = ?client, "Request refused by firewall");
    metrics::record_rejected("firewall");
    StatusCode::FORBIDDEN.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> Option<IpAddr> {
        Some(s.parse().unwrap())
    }

    #[test]
    fn test_disabled_lists_build_nothing() {
        let config = FirewallConfig {
            allow_list: vec!["10.0.0.1".into()],
            ..Default::default()
        };
        assert!(Firewall::from_config(&config).unwrap().is_none());
    }

    #[test]
    fn test_deny_list() {
        let config = FirewallConfig {
            deny_list_enabled: true,
            deny_list: vec!["10.0.0.9".into()],
            ..Default::default()
        };
        let firewall = Firewall::from_config(&config).unwrap().unwrap();

        assert!(!firewall.permits(ip("10.0.0.9")));
        assert!(firewall.permits(ip("10.0.0.1")));
        assert!(firewall.permits(None));
    }

    #[test]
    fn test_allow_list_fails_closed() {
        let config = FirewallConfig {
            allow_list_enabled: true,
            allow_list: vec!["10.0.0.1".into(), "::1".into()],
            ..Default::default()
        };
        let firewall = Firewall::from_config(&config).unwrap().unwrap();

        assert!(firewall.permits(ip("10.0.0.1")));
        assert!(firewall.permits(ip("::1")));
        assert!(!firewall.permits(ip("10.0.0.2")));
        assert!(!firewall.permits(None));
    }

    #[test]
    fn test_deny_wins_over_allow() {
        let config = FirewallConfig {
            allow_list_enabled: true,
            allow_list: vec!["10.0.0.1".into()],
            deny_list_enabled: true,
            deny_list: vec!["10.0.0.1".into()],
        };
        let firewall = Firewall::from_config(&config).unwrap().unwrap();
        assert!(!firewall.permits(ip("10.0.0.1")));
    }

    #[test]
    fn test_bad_entry() {
        let config = FirewallConfig {
            allow_list: vec!["10.0.0".into()],
            ..Default::default()
        };
        assert_eq!(
            Firewall::from_config(&config).unwrap_err(),
            SecurityError::InvalidAddress {
                list: "firewall.allow_list",
                value: "10.0.0".into()
            }
        );
    }
}
