/*
 * Responsibility
 * - GET / (認証不要): サービスのバナー
 */
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::{SERVICE_VERSION, docs};

#[derive(Debug, Serialize, ToSchema)]
pub struct RootResponse {
    pub message: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub docs: &'static str,
    pub redoc: &'static str,
}

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service banner", body = RootResponse))
)]
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Ask Polestar Influence System API",
        version: SERVICE_VERSION,
        status: "operational",
        docs: docs::DOCS_PATH,
        redoc: docs::REDOC_PATH,
    })
}
