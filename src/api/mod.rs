/*
 * Responsibility
 * - API 全体の公開ポイント
 * - バージョンに依らないルート (/, /docs, /redoc, /openapi.json)
 */
pub mod docs;
pub mod root;
pub mod v1;

pub const SERVICE_NAME: &str = "Ask Polestar Influence System";
pub const SERVICE_DESCRIPTION: &str =
    "Backend services system with multi-agent orchestration";
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

use crate::error::AppError;

pub async fn not_found() -> AppError {
    AppError::NotFound
}
