use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;

use super::Principal;

/// Handler で Principal を受け取るための extractor
/// access middleware が Principal を request.extensions() に insert 済みである前提
/// 見つからない場合は 401 を返す (認証が掛かっていないルートで使われた)
pub struct CurrentPrincipal(pub Principal);

impl<S> FromRequestParts<S> for CurrentPrincipal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(CurrentPrincipal)
            .ok_or(AppError::Unauthorized)
    }
}
