/*
 * Responsibility
 * - 環境変数 (.env 含む) から Config を一度だけ組み立てる
 * - 設定値のバリデーション (不足・不正なら起動失敗)
 * - 組み立て後は不変。AppState 経由で各コンポーネントに渡す
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Staging,
    Production,
    /// Any other name (`qa`, `preview`, ...). Reported as given.
    Other,
}

impl AppEnv {
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "development" | "dev" => Self::Development,
            "production" | "prod" => Self::Production,
            "staging" | "stage" => Self::Staging,
            _ => Self::Other,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        tracing::error!(error = %e, "configuration error");
        AppError::Internal
    }
}

/// Key material used to verify access tokens.
#[derive(Clone)]
pub enum TokenKey {
    /// HS256 shared secret.
    Secret(String),
    /// Ed25519 public key (PEM).
    EdPublicPem(String),
}

impl fmt::Debug for TokenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        match self {
            TokenKey::Secret(_) => f.write_str("Secret(..)"),
            TokenKey::EdPublicPem(_) => f.write_str("EdPublicPem(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub key: TokenKey,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub leeway_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    /// `APP_ENV` as configured (trimmed), reported by `/api/v1/info`.
    pub environment: String,

    pub allowed_origins: Vec<String>,
    pub allowed_hosts: Vec<String>,

    pub database_url: String,
    pub database_max_connections: u32,

    pub auth: AuthConfig,

    pub request_timeout: Duration,
    pub request_body_limit_bytes: usize,
}

fn split_list(raw: Option<String>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_or<T: FromStr>(
    raw: Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid(key)),
    }
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (the process env in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = parse_or(lookup("PORT"), "PORT", 8000)?;
        let addr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let environment =
            non_empty(lookup("APP_ENV")).unwrap_or_else(|| "development".to_string());
        let app_env = AppEnv::parse(&environment);

        let allowed_origins = split_list(lookup("ALLOWED_ORIGINS"));

        let mut allowed_hosts = split_list(lookup("ALLOWED_HOSTS"));
        if allowed_hosts.is_empty() {
            allowed_hosts = vec!["localhost".to_string(), "127.0.0.1".to_string()];
        }

        let database_url =
            non_empty(lookup("DATABASE_URL")).ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let database_max_connections = parse_or(
            lookup("DATABASE_MAX_CONNECTIONS"),
            "DATABASE_MAX_CONNECTIONS",
            10,
        )?;
        if database_max_connections == 0 {
            return Err(ConfigError::Invalid("DATABASE_MAX_CONNECTIONS"));
        }

        // The public key wins when both are present.
        let key = match (
            non_empty(lookup("ACCESS_JWT_PUBLIC_KEY_PEM")),
            non_empty(lookup("JWT_SECRET_KEY")),
        ) {
            (Some(pem), _) => TokenKey::EdPublicPem(pem.replace("\\n", "\n")),
            (None, Some(secret)) => TokenKey::Secret(secret),
            (None, None) => return Err(ConfigError::Missing("JWT_SECRET_KEY")),
        };

        let auth = AuthConfig {
            key,
            issuer: non_empty(lookup("AUTH_ISSUER")),
            audience: non_empty(lookup("AUTH_AUDIENCE")),
            leeway_seconds: parse_or(
                lookup("ACCESS_TOKEN_LEEWAY_SECONDS"),
                "ACCESS_TOKEN_LEEWAY_SECONDS",
                60,
            )?,
        };

        let timeout_seconds: u64 = parse_or(
            lookup("REQUEST_TIMEOUT_SECONDS"),
            "REQUEST_TIMEOUT_SECONDS",
            30,
        )?;
        if timeout_seconds == 0 {
            return Err(ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"));
        }

        let request_body_limit_bytes = parse_or(
            lookup("REQUEST_BODY_LIMIT_BYTES"),
            "REQUEST_BODY_LIMIT_BYTES",
            1024 * 1024,
        )?;

        Ok(Self {
            addr,
            app_env,
            environment,
            allowed_origins,
            allowed_hosts,
            database_url,
            database_max_connections,
            auth,
            request_timeout: Duration::from_secs(timeout_seconds),
            request_body_limit_bytes,
        })
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Self::for_tests_with(&[])
    }

    /// Test config with some keys replaced or added.
    pub fn for_tests_with(overrides: &[(&str, &str)]) -> Self {
        let defaults = [
            ("DATABASE_URL", "postgres://polestar@127.0.0.1:1/polestar_test"),
            ("JWT_SECRET_KEY", "test-secret"),
            ("ALLOWED_HOSTS", "localhost,api.polestar.test"),
            ("ALLOWED_ORIGINS", "http://app.polestar.test"),
            ("APP_ENV", "staging"),
        ];
        Self::from_lookup(|key: &str| {
            overrides
                .iter()
                .chain(defaults.iter())
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        })
        .expect("test config")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<&str, &str> = pairs.iter().copied().collect();
        move |key: &str| map.get(key).map(|v| v.to_string())
    }

    const MINIMAL: &[(&str, &str)] = &[
        ("DATABASE_URL", "postgres://localhost/polestar"),
        ("JWT_SECRET_KEY", "secret"),
    ];

    #[test]
    fn defaults_apply_when_only_required_keys_are_set() {
        let config = Config::from_lookup(lookup_from(MINIMAL)).unwrap();

        assert_eq!(config.addr.port(), 8000);
        assert_eq!(config.app_env, AppEnv::Development);
        assert!(config.allowed_origins.is_empty());
        assert_eq!(config.allowed_hosts, vec!["localhost", "127.0.0.1"]);
        assert_eq!(config.database_max_connections, 10);
        assert_eq!(config.auth.leeway_seconds, 60);
        assert!(config.auth.issuer.is_none());
        assert!(matches!(config.auth.key, TokenKey::Secret(ref s) if s == "secret"));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.request_body_limit_bytes, 1024 * 1024);
    }

    #[test]
    fn lists_are_trimmed_and_empty_entries_dropped() {
        let pairs = [
            MINIMAL[0],
            MINIMAL[1],
            ("ALLOWED_ORIGINS", " http://a.example , ,http://b.example"),
            ("ALLOWED_HOSTS", "api.example.com,*.example.com"),
        ];
        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();

        assert_eq!(
            config.allowed_origins,
            vec!["http://a.example", "http://b.example"]
        );
        assert_eq!(config.allowed_hosts, vec!["api.example.com", "*.example.com"]);
    }

    #[test]
    fn missing_database_url_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("JWT_SECRET_KEY", "s")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn missing_token_key_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://x/y")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Missing("JWT_SECRET_KEY"));
    }

    #[test]
    fn public_key_takes_precedence_and_unescapes_newlines() {
        let pairs = [
            MINIMAL[0],
            MINIMAL[1],
            ("ACCESS_JWT_PUBLIC_KEY_PEM", "-----BEGIN-----\\nabc\\n-----END-----"),
        ];
        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();
        match config.auth.key {
            TokenKey::EdPublicPem(pem) => assert_eq!(pem, "-----BEGIN-----\nabc\n-----END-----"),
            other => panic!("unexpected key: {other:?}"),
        }
    }

    #[test]
    fn invalid_numbers_are_reported_by_key() {
        let pairs = [MINIMAL[0], MINIMAL[1], ("PORT", "eighty")];
        let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert_eq!(err, ConfigError::Invalid("PORT"));

        let pairs = [MINIMAL[0], MINIMAL[1], ("REQUEST_TIMEOUT_SECONDS", "0")];
        let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert_eq!(err, ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"));
    }

    #[test]
    fn app_env_names() {
        assert_eq!(AppEnv::parse("PROD"), AppEnv::Production);
        assert_eq!(AppEnv::parse("staging"), AppEnv::Staging);
        assert_eq!(AppEnv::parse("dev"), AppEnv::Development);
        assert_eq!(AppEnv::parse("qa"), AppEnv::Other);
        assert!(AppEnv::Production.is_production());
        assert!(!AppEnv::Other.is_development());
    }

    #[test]
    fn unrecognised_environment_is_kept_verbatim() {
        let pairs = [MINIMAL[0], MINIMAL[1], ("APP_ENV", " qa ")];
        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();

        assert_eq!(config.app_env, AppEnv::Other);
        assert_eq!(config.environment, "qa");
    }

    #[test]
    fn environment_defaults_to_development() {
        let config = Config::from_lookup(lookup_from(MINIMAL)).unwrap();
        assert_eq!(config.environment, "development");
    }
}
