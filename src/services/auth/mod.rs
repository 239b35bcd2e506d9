pub mod factory;
pub mod jwt;
pub mod verifier;

pub use factory::build_token_verifier;
pub use jwt::JwtVerifier;
pub use verifier::{Claims, TokenVerifier, VerifyError};
