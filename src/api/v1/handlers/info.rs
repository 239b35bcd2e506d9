/*
 * Responsibility
 * - GET /api/v1/info (認証不要)
 * - 静的なシステム情報 + 稼働環境名 (APP_ENV をそのまま)
 */
use axum::{Json, extract::State};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::{SERVICE_NAME, SERVICE_VERSION};
use crate::state::AppState;

pub const FEATURES: [&str; 5] = [
    "Multi-Agent Orchestration",
    "Real-time Task Processing",
    "Advanced Analytics",
    "Secure API Management",
    "Comprehensive Monitoring",
];

#[derive(Debug, Serialize, ToSchema)]
pub struct SystemInfoResponse {
    pub system: &'static str,
    pub version: &'static str,
    pub environment: String,
    #[schema(value_type = Vec<String>)]
    pub features: Vec<&'static str>,
}

/// Get system information and status.
#[utoipa::path(
    get,
    path = "/info",
    responses((status = 200, description = "System information", body = SystemInfoResponse))
)]
pub async fn system_info(State(state): State<AppState>) -> Json<SystemInfoResponse> {
    Json(SystemInfoResponse {
        system: SERVICE_NAME,
        version: SERVICE_VERSION,
        environment: state.config.environment.clone(),
        features: FEATURES.to_vec(),
    })
}
