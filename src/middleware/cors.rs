//! CORS policy for browser clients.
//!
//! Note:
//! - CORS is enforced by browsers. Native apps and server-to-server calls are not
//!   restricted by CORS.
//! - This middleware should be applied at the Router level (not inside handlers).
//!
//! Policy:
//! - Origins: the `ALLOWED_ORIGINS` allowlist (exact match). `*` mirrors any origin.
//!   An empty allowlist allows none (no CORS headers).
//! - Methods / headers: whatever the preflight asks for.
//! - Credentials: allowed.

use std::time::Duration;

use axum::Router;
use axum::http::HeaderValue;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::config::Config;

/// Apply CORS policy to the given Router.
///
/// IMPORTANT:
/// - tower-http refuses wildcard (`Any`) together with `allow_credentials(true)`,
///   so "allow everything" is expressed by mirroring the request instead.
pub fn apply(router: Router, config: &Config) -> Router {
    router.layer(layer(&config.allowed_origins))
}

fn layer(allowed_origins: &[String]) -> CorsLayer {
    let allow_origin = if allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::mirror_request()
    } else {
        let allowed: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|s| HeaderValue::from_str(s.trim_end_matches('/')).ok())
            .collect();
        AllowOrigin::list(allowed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
        .max_age(Duration::from_secs(60 * 10))
}
