/*
 * Responsibility
 * - v1 の公開ポイント (routes() の re-export など)
 */
pub mod extractors;
pub mod groups;
pub mod handlers;
mod routes;

pub use groups::RouteGroups;
pub use routes::routes;

pub const API_PREFIX: &str = "/api/v1";
