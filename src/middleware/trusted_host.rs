//! Trusted-host filtering.
//!
//! Rejects requests whose `Host` (or URI authority for HTTP/2) is not in the
//! `ALLOWED_HOSTS` allowlist.
//!
//! Allowlist entries:
//! - `api.example.com`: exact match (case-insensitive, port ignored)
//! - `*.example.com`: any subdomain of example.com
//! - `*`: any host

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::config::Config;
use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct HostPolicy {
    allow_any: bool,
    patterns: Vec<String>,
}

impl HostPolicy {
    pub fn new(allowed_hosts: &[String]) -> Self {
        Self {
            allow_any: allowed_hosts.iter().any(|h| h == "*"),
            patterns: allowed_hosts.iter().map(|h| h.to_ascii_lowercase()).collect(),
        }
    }

    pub fn is_allowed(&self, host: &str) -> bool {
        if self.allow_any {
            return true;
        }

        let host = strip_port(host).to_ascii_lowercase();
        if host.is_empty() {
            return false;
        }

        self.patterns.iter().any(|pattern| match pattern.strip_prefix('*') {
            Some(suffix) => suffix.starts_with('.') && host.ends_with(suffix),
            None => *pattern == host,
        })
    }
}

fn strip_port(host: &str) -> &str {
    // [::1]:8000 → [::1]
    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    host.split(':').next().unwrap_or_default()
}

pub fn apply(router: Router, config: &Config) -> Router {
    let policy = Arc::new(HostPolicy::new(&config.allowed_hosts));
    router.layer(middleware::from_fn_with_state(policy, trusted_host_middleware))
}

async fn trusted_host_middleware(
    State(policy): State<Arc<HostPolicy>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let host = req
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| req.uri().authority().map(|a| a.as_str()))
        .unwrap_or_default();

    if !policy.is_allowed(host) {
        tracing::warn!(host = %host, "rejected request with untrusted host");
        return Err(AppError::bad_request("INVALID_HOST", "Invalid host header"));
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(hosts: &[&str]) -> HostPolicy {
        let hosts: Vec<String> = hosts.iter().map(|h| h.to_string()).collect();
        HostPolicy::new(&hosts)
    }

    #[test]
    fn exact_match_ignores_port_and_case() {
        let p = policy(&["api.polestar.test"]);

        assert!(p.is_allowed("api.polestar.test"));
        assert!(p.is_allowed("API.Polestar.test:8000"));
        assert!(!p.is_allowed("evil.test"));
        assert!(!p.is_allowed(""));
    }

    #[test]
    fn wildcard_subdomain_matches_only_subdomains() {
        let p = policy(&["*.polestar.test"]);

        assert!(p.is_allowed("eu.polestar.test"));
        assert!(p.is_allowed("a.b.polestar.test:443"));
        assert!(!p.is_allowed("notpolestar.test"));
    }

    #[test]
    fn star_allows_everything() {
        let p = policy(&["*"]);

        assert!(p.is_allowed("anything.example"));
        assert!(p.is_allowed(""));
    }

    #[test]
    fn ipv6_literals_keep_brackets() {
        let p = policy(&["[::1]"]);

        assert!(p.is_allowed("[::1]:8000"));
        assert!(!p.is_allowed("[::2]"));
    }
}
