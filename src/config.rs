/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, CORS 許可、security 設定、公開鍵のパスなど)
 * - 設定値のバリデーション (不足・不正なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::services::auth::AssertionPolicy;
use crate::services::auth::token_parser::MAX_LEEWAY_SECONDS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
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

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    // Claim assertion policy
    pub security_enable: bool,
    pub assert_org_with: Option<String>,
    pub assert_tenant: bool,
    pub assert_tenant_with: Option<String>,

    // Token verification
    pub public_key_path: PathBuf,
    pub auth_issuer: Option<String>,
    pub access_token_leeway_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let security_enable = env_bool("SECURITY_ENABLE", true)?;
        let assert_org_with = env_opt("SECURITY_ASSERT_ORG_WITH");
        let assert_tenant = env_bool("SECURITY_ASSERT_TENANT", false)?;
        let assert_tenant_with = env_opt("SECURITY_ASSERT_TENANT_WITH");

        let public_key_path = env_opt("SECURITY_PUBLIC_KEY_PATH")
            .map(PathBuf::from)
            .ok_or(ConfigError::Missing("SECURITY_PUBLIC_KEY_PATH"))?;

        let auth_issuer = env_opt("AUTH_ISSUER");

        let access_token_leeway_seconds = match env_opt("ACCESS_TOKEN_LEEWAY_SECONDS") {
            Some(v) => parse_leeway(&v)?,
            None => 0,
        };

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            security_enable,
            assert_org_with,
            assert_tenant,
            assert_tenant_with,
            public_key_path,
            auth_issuer,
            access_token_leeway_seconds,
        })
    }

    pub fn assertion_policy(&self) -> AssertionPolicy {
        AssertionPolicy {
            enabled: self.security_enable,
            assert_organization_with: self.assert_org_with.clone(),
            assert_tenant: self.assert_tenant,
            assert_tenant_with: self.assert_tenant_with.clone(),
        }
    }
}

// Unset and blank are the same thing.
fn env_opt(key: &'static str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_bool(key: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env_opt(key) {
        Some(v) => parse_bool(&v).ok_or(ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_leeway(value: &str) -> Result<u64, ConfigError> {
    value
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs <= MAX_LEEWAY_SECONDS)
        .ok_or(ConfigError::Invalid("ACCESS_TOKEN_LEEWAY_SECONDS"))
}
