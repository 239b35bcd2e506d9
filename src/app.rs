/*
 * Responsibility
 * - Config 読み込み → lifecycle::start → Router 組み立て
 * - Middleware の適用 (HTTP / trusted host / CORS、保護グループには Bearer)
 * - OpenAPI ドキュメントは実際にマウントしたルートから生成する
 * - axum::serve() で起動し、シグナルで graceful shutdown → lifecycle::stop
 */
use std::{panic, process, sync::Arc};

use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::api::v1::{API_PREFIX, RouteGroups};
use crate::api::{self, SERVICE_NAME, docs, root};
use crate::config::Config;
use crate::error::AppError;
use crate::state::AppState;
use crate::{lifecycle, middleware, signal};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,polestar_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Always surface panics via tracing so they don't get "lost".
        tracing::error!(?info, "panic");

        // Development: fail fast. Production: default behavior, the server keeps running.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<(), AppError> {
    init_tracing();
    let config = Arc::new(Config::from_env()?);

    init_panic_hook(config.app_env.is_development());

    tracing::info!(
        "starting API in {} mode on {}",
        config.environment,
        config.addr
    );

    // No traffic is accepted until startup has completed.
    let state = lifecycle::start(config.clone()).await?;
    let app = build_router(state.clone(), RouteGroups::default());

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, addr = %config.addr, "failed to bind listener");
            AppError::Internal
        })?;

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let received = signal::shutdown_signal().await;
            tracing::info!(signal = %received, "{SERVICE_NAME}: draining in-flight requests");
        })
        .await;

    lifecycle::stop(state).await;

    served.map_err(|e| {
        tracing::error!(error = %e, "server error");
        AppError::Internal
    })
}

/// Full application router: routes, route groups, docs and the middleware chain.
///
/// Layer order (outermost first): HTTP (request id, tracing, limits) → trusted host → CORS
/// → bearer gate on protected group prefixes (routes and fallback alike) → routes.
pub fn build_router(state: AppState, groups: RouteGroups) -> Router {
    let config = state.config.clone();

    let (router, openapi) = OpenApiRouter::with_openapi(docs::base_document())
        .routes(routes!(root::root))
        .nest(API_PREFIX, api::v1::routes(groups))
        .split_for_parts();

    let router = router
        .merge(docs::routes(docs::apply_group_policy(openapi)))
        .fallback(api::not_found);
    let protected = api::v1::groups::protected();
    let router = middleware::auth::access::apply(router, state.clone(), protected);
    let router = router.with_state(state);

    let router = middleware::cors::apply(router, &config);
    let router = middleware::trusted_host::apply(router, &config);
    middleware::http::apply(router, &config)
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
