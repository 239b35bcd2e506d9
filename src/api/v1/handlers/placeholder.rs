/*
 * Responsibility
 * - agents / tasks / analytics の既定ハンドラ
 * - 実際のルートは外部の Router として差し込む (api::v1::groups::RouteGroups)
 * - 差し込まれていない間は 501 を返す (認証は通過済み)
 */
use axum::routing::any;
use utoipa_axum::{
    router::{OpenApiRouter, UtoipaMethodRouter},
    routes,
};

use crate::api::v1::extractors::CurrentPrincipal;
use crate::error::{AppError, ErrorResponse};
use crate::state::AppState;

pub fn agents() -> OpenApiRouter<AppState> {
    router("agents", routes!(agents_index))
}

pub fn tasks() -> OpenApiRouter<AppState> {
    router("tasks", routes!(tasks_index))
}

pub fn analytics() -> OpenApiRouter<AppState> {
    router("analytics", routes!(analytics_index))
}

// index は OpenAPI に載せ、その下のパスはまとめて catch-all で受ける
fn router(group: &'static str, index: UtoipaMethodRouter<AppState>) -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(index).route(
        "/{*rest}",
        any(move |principal: CurrentPrincipal| async move { not_implemented(group, principal) }),
    )
}

fn not_implemented(group: &'static str, CurrentPrincipal(principal): CurrentPrincipal) -> AppError {
    tracing::debug!(group, subject = ?principal.subject(), "unimplemented route group");
    AppError::NotImplemented(group)
}

/// Agent management (not mounted yet).
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 501, description = "Agent routes are not available", body = ErrorResponse)
    )
)]
pub async fn agents_index(principal: CurrentPrincipal) -> AppError {
    not_implemented("agents", principal)
}

/// Task processing (not mounted yet).
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 501, description = "Task routes are not available", body = ErrorResponse)
    )
)]
pub async fn tasks_index(principal: CurrentPrincipal) -> AppError {
    not_implemented("tasks", principal)
}

/// Analytics (not mounted yet).
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 501, description = "Analytics routes are not available", body = ErrorResponse)
    )
)]
pub async fn analytics_index(principal: CurrentPrincipal) -> AppError {
    not_implemented("analytics", principal)
}
