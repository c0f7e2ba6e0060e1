/*
 * Responsibility
 * - 環境変数や設定の読み込み (DATABASE_URL, CORS 許可、Auth 設定など)
 * - 設定値のバリデーション (不足なら起動失敗)
 * - 署名 secret はコードに置かない。AUTH_SIGNING_SECRET からのみ読む
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;
use crate::services::auth::{PasswordHasher, SigningSecret};

// 1 year
pub const MAX_ACCESS_TOKEN_TTL_SECONDS: u64 = 365 * 24 * 60 * 60;
pub const MAX_ACCESS_TOKEN_LEEWAY_SECONDS: u64 = 5 * 60;
pub const DEFAULT_PASSWORD_HASH_COST: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
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

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    // None -> in-memory stores (development only)
    pub database_url: Option<String>,
    // None -> in-process revocation list
    pub valkey_url: Option<String>,

    pub cors_allowed_origins: Vec<String>,
    pub http_timeout: Duration,
    pub http_body_limit_bytes: usize,

    pub sqids_min_length: usize,
    pub sqids_alphabet: String,

    pub auth_signing_secret: SigningSecret,
    pub auth_issuer: String,
    pub auth_audience: String,
    pub access_token_ttl_seconds: u64,
    pub access_token_leeway_seconds: u64,

    // bcrypt work factor
    pub password_hash_cost: u32,
}

fn optional(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match optional(key) {
        Some(v) => v.parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

fn check_token_window(ttl_seconds: u64, leeway_seconds: u64) -> Result<(), ConfigError> {
    if !(1..=MAX_ACCESS_TOKEN_TTL_SECONDS).contains(&ttl_seconds) {
        return Err(ConfigError::Invalid("ACCESS_TOKEN_TTL_SECONDS"));
    }
    if leeway_seconds > MAX_ACCESS_TOKEN_LEEWAY_SECONDS {
        return Err(ConfigError::Invalid("ACCESS_TOKEN_LEEWAY_SECONDS"));
    }
    Ok(())
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = parsed_or("PORT", 3000)?;
        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let database_url = optional("DATABASE_URL");
        if database_url.is_none() && app_env.is_production() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }
        let valkey_url = optional("VALKEY_URL");

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let http_timeout = Duration::from_secs(parsed_or("HTTP_TIMEOUT_SECONDS", 30)?);
        let http_body_limit_bytes = parsed_or("HTTP_BODY_LIMIT_BYTES", 1024 * 1024)?;

        let sqids_min_length = parsed_or("SQIDS_MIN_LENGTH", 10)?;
        let sqids_alphabet = optional("SQIDS_ALPHABET").unwrap_or_else(|| {
            "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789".to_string()
        });

        let auth_signing_secret = std::env::var("AUTH_SIGNING_SECRET")
            .map_err(|_| ConfigError::Missing("AUTH_SIGNING_SECRET"))
            .and_then(|raw| {
                SigningSecret::new(raw).map_err(|_| ConfigError::Invalid("AUTH_SIGNING_SECRET"))
            })?;

        let auth_issuer = optional("AUTH_ISSUER").unwrap_or_else(|| "access-guard".to_string());
        let auth_audience =
            optional("AUTH_AUDIENCE").unwrap_or_else(|| "access-guard-api".to_string());

        let access_token_ttl_seconds = parsed_or("ACCESS_TOKEN_TTL_SECONDS", 3600)?; // 1 hour
        let access_token_leeway_seconds = parsed_or("ACCESS_TOKEN_LEEWAY_SECONDS", 0)?;
        check_token_window(access_token_ttl_seconds, access_token_leeway_seconds)?;

        let password_hash_cost = parsed_or("PASSWORD_HASH_COST", DEFAULT_PASSWORD_HASH_COST)?;
        PasswordHasher::new(password_hash_cost)
            .map_err(|_| ConfigError::Invalid("PASSWORD_HASH_COST"))?;

        Ok(Self {
            addr,
            app_env,
            database_url,
            valkey_url,
            cors_allowed_origins,
            http_timeout,
            http_body_limit_bytes,
            sqids_min_length,
            sqids_alphabet,
            auth_signing_secret,
            auth_issuer,
            auth_audience,
            access_token_ttl_seconds,
            access_token_leeway_seconds,
            password_hash_cost,
        })
    }

    /// Development defaults around an explicit secret. Used by tests and local tooling.
    pub fn for_development(auth_signing_secret: SigningSecret) -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            app_env: AppEnv::Development,
            database_url: None,
            valkey_url: None,
            cors_allowed_origins: Vec::new(),
            http_timeout: Duration::from_secs(30),
            http_body_limit_bytes: 1024 * 1024,
            sqids_min_length: 10,
            sqids_alphabet: "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789"
                .to_string(),
            auth_signing_secret,
            auth_issuer: "access-guard".to_string(),
            auth_audience: "access-guard-api".to_string(),
            access_token_ttl_seconds: 3600,
            access_token_leeway_seconds: 0,
            password_hash_cost: DEFAULT_PASSWORD_HASH_COST,
        }
    }
}
