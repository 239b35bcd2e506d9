/*
 * Responsibility
 * - 起動時: token 検証器と DB pool を用意して AppState を返す
 *   (完了するまで listener はトラフィックを受け付けない。失敗は致命的)
 * - 終了時: DB pool を close する (graceful shutdown で in-flight が捌けた後)
 */
use std::sync::Arc;

use crate::api::SERVICE_NAME;
use crate::config::Config;
use crate::database;
use crate::error::AppError;
use crate::services::auth::build_token_verifier;
use crate::state::AppState;

pub async fn start(config: Arc<Config>) -> Result<AppState, AppError> {
    tracing::info!("Starting {SERVICE_NAME}...");

    let verifier = build_token_verifier(&config)?;

    let db = database::init_database(&config).await.map_err(|e| {
        tracing::error!(error = ?e, "database initialization failed");
        AppError::Internal
    })?;
    tracing::info!("Database initialized successfully");

    Ok(AppState::new(config, db, verifier))
}

pub async fn stop(state: AppState) {
    tracing::info!("Shutting down {SERVICE_NAME}...");
    database::close_database(&state.db).await;
    tracing::info!("Database connections closed");
}
