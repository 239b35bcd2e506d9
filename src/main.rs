/*
 * Responsibility
 * - tokio runtime の起動
 * - app::run() の呼び出し (ロジックは置かない)
 */
mod api;
mod app;
mod config;
mod database;
mod error;
mod lifecycle;
mod middleware;
mod services;
mod signal;
mod state;

use crate::error::AppError;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    app::run().await
}
