/*
 * Responsibility
 * - HTTP から独立したサービス層 (token 検証など)
 */
pub mod auth;
