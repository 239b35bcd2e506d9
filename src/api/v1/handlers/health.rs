/*
 * Responsibility
 * - /api/v1/health 以下 (認証を通さない)
 *   - GET /        : liveness (プロセスが応答できるか)
 *   - GET /ready   : readiness (DB に届くか)
 */
use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::SERVICE_VERSION;
use crate::database;
use crate::error::{AppError, ErrorResponse};
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub database: &'static str,
}

/// Liveness: the process is up and answering.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service is alive", body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: SERVICE_VERSION,
        timestamp: Utc::now(),
    })
}

/// Readiness: the database answers a trivial query.
#[utoipa::path(
    get,
    path = "/ready",
    responses(
        (status = 200, description = "Database reachable", body = ReadinessResponse),
        (status = 503, description = "Database unavailable", body = ErrorResponse)
    )
)]
pub async fn readiness(State(state): State<AppState>) -> Result<Json<ReadinessResponse>, AppError> {
    if let Err(err) = database::ping(&state.db).await {
        tracing::warn!(error = ?err, "readiness check failed");
        return Err(AppError::Unavailable("database"));
    }

    Ok(Json(ReadinessResponse {
        status: "ready",
        database: "connected",
    }))
}
