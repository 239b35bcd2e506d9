/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - config: 起動時に組み立てた不変の Config
 *   - db: PgPool
 *   - verifier: bearer token の検証器
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::services::auth::TokenVerifier;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: PgPool,
    pub verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    pub fn new(config: Arc<Config>, db: PgPool, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self {
            config,
            db,
            verifier,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("db", &self.db)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
impl AppState {
    /// State backed by a lazily connecting pool; nothing touches the database
    /// unless a handler actually queries it.
    pub fn for_tests(config: Config, verifier: Arc<dyn TokenVerifier>) -> Self {
        let db = crate::database::lazy_pool(&config);
        Self::new(Arc::new(config), db, verifier)
    }
}
