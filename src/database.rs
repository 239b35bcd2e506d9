/*
 * Responsibility
 * - PgPool の生成 (起動時に一度だけ。接続できなければ起動失敗)
 * - readiness 用の疎通確認
 * - 終了時の close
 */
use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("db error")]
    Db(#[from] sqlx::Error),
}

fn pool_options(config: &Config) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(Duration::from_secs(5))
}

/// Connect the pool and make sure the database answers before traffic is accepted.
pub async fn init_database(config: &Config) -> Result<PgPool, DatabaseError> {
    let pool = pool_options(config).connect(&config.database_url).await?;
    ping(&pool).await?;
    Ok(pool)
}

/// Build a pool that connects on first use.
#[cfg(test)]
pub fn lazy_pool(config: &Config) -> PgPool {
    pool_options(config)
        .connect_lazy(&config.database_url)
        .expect("valid database url")
}

pub async fn ping(pool: &PgPool) -> Result<(), DatabaseError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

pub async fn close_database(pool: &PgPool) {
    pool.close().await;
}
