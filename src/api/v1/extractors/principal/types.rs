/*
 * Responsibility
 * - Handler から見える「認証済み主体」の型
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - claims のスキーマはここでは固定しない (検証器が返したものをそのまま持つ)
 * - 寿命は 1 リクエスト
 */
use serde::Serialize;
use serde_json::Value;

use crate::services::auth::Claims;

/// 認証済みのリクエストに付与される主体
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Principal {
    claims: Claims,
}

impl Principal {
    pub fn new(claims: Claims) -> Self {
        Self { claims }
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.claims().get(name)
    }

    /// `sub` claim, when the token carries one.
    pub fn subject(&self) -> Option<&str> {
        self.claim("sub").and_then(Value::as_str)
    }
}
