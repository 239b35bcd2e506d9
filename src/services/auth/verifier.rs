//! Token verification contract used by the access middleware.
use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

/// Claims payload returned by a successful verification.
pub type Claims = Map<String, Value>;

/// Reasons a bearer credential was rejected.
///
/// These are for server-side logging only; the HTTP layer collapses all of
/// them into one 401 response.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("jwt verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("empty '{0}' claim")]
    EmptyClaim(&'static str),
    #[error("verifier failure: {0}")]
    Internal(String),
}

/// Turns a raw bearer credential into a claims payload.
///
/// Implementations must be cheap to share (`Arc<dyn TokenVerifier>` in `AppState`).
#[async_trait]
pub trait TokenVerifier: Send + Sync + 'static {
    async fn verify(&self, token: &str) -> Result<Claims, VerifyError>;
}

#[cfg(test)]
pub mod stub {
    use super::*;

    /// Accepts exactly one token and returns fixed claims; everything else fails
    /// with the configured error.
    pub struct StubVerifier {
        pub accepted: String,
        pub claims: Claims,
        pub failure: fn() -> VerifyError,
    }

    impl StubVerifier {
        pub fn accepting(token: &str, claims: Claims) -> Self {
            Self {
                accepted: token.to_string(),
                claims,
                failure: || VerifyError::Internal("stub rejected the token".into()),
            }
        }

        pub fn failing_with(failure: fn() -> VerifyError) -> Self {
            Self {
                accepted: String::new(),
                claims: Claims::new(),
                failure,
            }
        }
    }

    #[async_trait]
    impl TokenVerifier for StubVerifier {
        async fn verify(&self, token: &str) -> Result<Claims, VerifyError> {
            if !self.accepted.is_empty() && token == self.accepted {
                Ok(self.claims.clone())
            } else {
                Err((self.failure)())
            }
        }
    }
}
