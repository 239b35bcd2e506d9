/*
 * Responsibility
 * - middleware の公開インターフェース
 * - 各モジュールは `apply(router, ...)` を公開し、app.rs で順番に掛ける
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod trusted_host;
