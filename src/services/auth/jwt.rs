use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};

use crate::config::{AuthConfig, TokenKey};
use crate::services::auth::verifier::{Claims, TokenVerifier, VerifyError};

/// JWT access-token verifier (HS256 shared secret or EdDSA public key).
///
/// `jsonwebtoken::Validation` checks:
/// - signature
/// - `exp` (required) and `nbf` when present, with leeway
/// - `iss` / `aud` when configured
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("JwtVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtVerifier {
    pub fn new(config: &AuthConfig) -> Result<Self, VerifyError> {
        let (decoding_key, algorithm) = match &config.key {
            TokenKey::Secret(secret) => (
                DecodingKey::from_secret(secret.as_bytes()),
                Algorithm::HS256,
            ),
            TokenKey::EdPublicPem(pem) => (
                DecodingKey::from_ed_pem(pem.as_bytes()).map_err(|e| {
                    VerifyError::Internal(format!("invalid ed25519 public key pem: {}", e))
                })?,
                Algorithm::EdDSA,
            ),
        };

        let mut validation = Validation::new(algorithm);
        validation.leeway = config.leeway_seconds;
        validation.validate_nbf = true;
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    fn decode(&self, token: &str) -> Result<Claims, VerifyError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        let claims = data.claims;

        // `sub` is optional, but an explicitly empty subject is a broken token.
        if let Some(sub) = claims.get("sub").and_then(|v| v.as_str())
            && sub.trim().is_empty()
        {
            return Err(VerifyError::EmptyClaim("sub"));
        }

        Ok(claims)
    }
}

#[async_trait]
impl TokenVerifier for JwtVerifier {
    async fn verify(&self, token: &str) -> Result<Claims, VerifyError> {
        self.decode(token)
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{EncodingKey, Header};
    use serde_json::json;

    use super::*;

    const SECRET: &str = "test-secret";

    fn auth_config(issuer: Option<&str>, audience: Option<&str>) -> AuthConfig {
        AuthConfig {
            key: TokenKey::Secret(SECRET.to_string()),
            issuer: issuer.map(str::to_string),
            audience: audience.map(str::to_string),
            leeway_seconds: 0,
        }
    }

    fn now() -> i64 {
        chrono::Utc::now().timestamp()
    }

    fn sign(claims: serde_json::Value, secret: &str) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn accepts_valid_token_and_returns_all_claims() {
        let verifier = JwtVerifier::new(&auth_config(None, None)).unwrap();
        let token = sign(
            json!({ "sub": "user-1", "role": "admin", "exp": now() + 600 }),
            SECRET,
        );

        let claims = verifier.verify(&token).await.unwrap();

        assert_eq!(claims["sub"], "user-1");
        assert_eq!(claims["role"], "admin");
    }

    #[tokio::test]
    async fn rejects_expired_token() {
        let verifier = JwtVerifier::new(&auth_config(None, None)).unwrap();
        let token = sign(json!({ "sub": "user-1", "exp": now() - 600 }), SECRET);

        assert!(matches!(
            verifier.verify(&token).await,
            Err(VerifyError::Jwt(_))
        ));
    }

    #[tokio::test]
    async fn rejects_token_signed_with_other_secret() {
        let verifier = JwtVerifier::new(&auth_config(None, None)).unwrap();
        let token = sign(json!({ "sub": "user-1", "exp": now() + 600 }), "other");

        assert!(verifier.verify(&token).await.is_err());
    }

    #[tokio::test]
    async fn rejects_malformed_token() {
        let verifier = JwtVerifier::new(&auth_config(None, None)).unwrap();

        assert!(verifier.verify("not-a-jwt").await.is_err());
    }

    #[tokio::test]
    async fn rejects_token_without_exp() {
        let verifier = JwtVerifier::new(&auth_config(None, None)).unwrap();
        let token = sign(json!({ "sub": "user-1" }), SECRET);

        assert!(verifier.verify(&token).await.is_err());
    }

    #[tokio::test]
    async fn rejects_empty_subject() {
        let verifier = JwtVerifier::new(&auth_config(None, None)).unwrap();
        let token = sign(json!({ "sub": " ", "exp": now() + 600 }), SECRET);

        assert!(matches!(
            verifier.verify(&token).await,
            Err(VerifyError::EmptyClaim("sub"))
        ));
    }

    #[tokio::test]
    async fn enforces_configured_issuer_and_audience() {
        let verifier =
            JwtVerifier::new(&auth_config(Some("polestar-auth"), Some("polestar-api"))).unwrap();

        let good = sign(
            json!({ "iss": "polestar-auth", "aud": "polestar-api", "exp": now() + 600 }),
            SECRET,
        );
        assert!(verifier.verify(&good).await.is_ok());

        let wrong_aud = sign(
            json!({ "iss": "polestar-auth", "aud": "someone-else", "exp": now() + 600 }),
            SECRET,
        );
        assert!(verifier.verify(&wrong_aud).await.is_err());

        let wrong_iss = sign(
            json!({ "iss": "intruder", "aud": "polestar-api", "exp": now() + 600 }),
            SECRET,
        );
        assert!(verifier.verify(&wrong_iss).await.is_err());
    }

    #[tokio::test]
    async fn audience_in_token_is_ignored_when_not_configured() {
        let verifier = JwtVerifier::new(&auth_config(None, None)).unwrap();
        let token = sign(json!({ "aud": "anything", "exp": now() + 600 }), SECRET);

        assert!(verifier.verify(&token).await.is_ok());
    }

    #[test]
    fn invalid_public_key_pem_is_rejected() {
        let config = AuthConfig {
            key: TokenKey::EdPublicPem("not a pem".into()),
            issuer: None,
            audience: None,
            leeway_seconds: 0,
        };

        assert!(matches!(
            JwtVerifier::new(&config),
            Err(VerifyError::Internal(_))
        ));
    }
}
