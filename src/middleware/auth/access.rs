//! Bearer token verification → Principal を extensions に入れる
//!
//! - 保護グループ配下のパス (`/api/v1/agents` と `/api/v1/agents/...`) だけが対象。
//!   ルート全体 (fallback を含む) に掛けるので、未知のパスでも 404 より先に 401 になる
//! - `Authorization: Bearer <token>` を取り出し、`TokenVerifier` に渡す
//! - 失敗理由 (期限切れ / 署名不正 / 形式不正 / 検証器の内部エラー) はログにだけ残し、
//!   クライアントには常に同じ 401 を返す

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::{OriginalUri, State},
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::Principal;
use crate::api::v1::groups::GroupSpec;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Clone)]
struct AccessGate {
    state: AppState,
    protected: Arc<[GroupSpec]>,
}

impl AccessGate {
    fn guards(&self, path: &str) -> bool {
        self.protected.iter().any(|spec| spec.covers(path))
    }
}

/// 保護するルートグループに認証を掛ける。fallback を登録した後に呼ぶこと。
///
/// 例：
/// ```ignore
/// let router = router.fallback(api::not_found);
/// let router = middleware::auth::access::apply(router, state.clone(), groups::protected());
/// ```
pub fn apply(
    router: Router<AppState>,
    state: AppState,
    protected: impl IntoIterator<Item = GroupSpec>,
) -> Router<AppState> {
    let gate = AccessGate {
        state,
        protected: protected.into_iter().collect(),
    };
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(gate, access_middleware))
}

async fn access_middleware(
    State(gate): State<AccessGate>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    // nest の内側では prefix が剥がされるので、元の URI で判定する
    let path = match req.extensions().get::<OriginalUri>() {
        Some(OriginalUri(uri)) => uri.path().to_owned(),
        None => req.uri().path().to_owned(),
    };
    if !gate.guards(&path) {
        return Ok(next.run(req).await);
    }

    let Some(token) = bearer_token(req.headers()).map(str::to_owned) else {
        tracing::warn!(
            path = %path,
            "Authentication failed: missing or malformed bearer credentials"
        );
        return Err(AppError::Unauthorized);
    };

    let claims = match gate.state.verifier.verify(&token).await {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(
                error = %err,
                path = %path,
                "Authentication failed"
            );
            return Err(AppError::Unauthorized);
        }
    };

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(Principal::new(claims));

    Ok(next.run(req).await)
}

/// `Authorization` ヘッダから bearer credential を取り出す。
/// scheme は大文字小文字を区別しない。credential が空なら None。
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, credential) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let credential = credential.trim();
    (!credential.is_empty()).then_some(credential)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers_with(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn extracts_bearer_credential() {
        assert_eq!(bearer_token(&headers_with("Bearer abc.def")), Some("abc.def"));
        assert_eq!(bearer_token(&headers_with("bearer   abc")), Some("abc"));
    }

    #[test]
    fn rejects_missing_or_foreign_schemes() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
        assert_eq!(bearer_token(&headers_with("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers_with("Bearer")), None);
        assert_eq!(bearer_token(&headers_with("Bearer    ")), None);
    }
}
