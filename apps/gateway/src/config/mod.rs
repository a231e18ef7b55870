//! Process configuration, loaded once at startup.
//!
//! Environment variables must be set by the runtime environment (docker
//! `env_file`, or `set -a; . ./.env; set +a` locally).

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;
use crate::state::security_config::{SecurityConfig, DEFAULT_TOKEN_TTL, MAX_TOKEN_TTL};

pub mod public_paths;

pub use public_paths::PublicPaths;

/// Shortest accepted HMAC secret, in bytes.
pub const MIN_JWT_SECRET_LEN: usize = 32;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Base URLs of the internal services the gateway fronts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceUrls {
    pub member: String,
    pub cart: String,
    pub product: String,
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub security: SecurityConfig,
    pub services: ServiceUrls,
    /// Token store database; `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub sweep_interval: Duration,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let host = get("GATEWAY_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or("GATEWAY_PORT", get("GATEWAY_PORT"), DEFAULT_PORT)?;

        let secret = get("GATEWAY_JWT_SECRET")
            .ok_or_else(|| AppError::config("GATEWAY_JWT_SECRET must be set"))?;
        if secret.len() < MIN_JWT_SECRET_LEN {
            return Err(AppError::config(format!(
                "GATEWAY_JWT_SECRET must be at least {MIN_JWT_SECRET_LEN} bytes"
            )));
        }

        let ttl = seconds(
            "GATEWAY_TOKEN_TTL_SECS",
            get("GATEWAY_TOKEN_TTL_SECS"),
            DEFAULT_TOKEN_TTL,
        )?;
        let sweep_interval = seconds(
            "GATEWAY_TOKEN_SWEEP_SECS",
            get("GATEWAY_TOKEN_SWEEP_SECS"),
            DEFAULT_SWEEP_INTERVAL,
        )?;

        let services = ServiceUrls {
            member: base_url("MEMBER_SERVICE_BASE_URL", get("MEMBER_SERVICE_BASE_URL"))?,
            cart: base_url("CART_SERVICE_BASE_URL", get("CART_SERVICE_BASE_URL"))?,
            product: base_url("PRODUCT_SERVICE_BASE_URL", get("PRODUCT_SERVICE_BASE_URL"))?,
        };

        Ok(Self {
            host,
            port,
            security: SecurityConfig::new(secret.into_bytes()).with_token_ttl(ttl),
            services,
            database_url: get("GATEWAY_DATABASE_URL"),
            sweep_interval,
        })
    }
}

fn parse_or<T: FromStr>(key: &str, value: Option<String>, default: T) -> Result<T, AppError> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| AppError::config(format!("{key} has an invalid value: {raw}"))),
    }
}

/// Positive whole seconds, at most one year.
fn seconds(key: &str, value: Option<String>, default: Duration) -> Result<Duration, AppError> {
    let secs: u64 = parse_or(key, value, default.as_secs())?;
    if secs == 0 {
        return Err(AppError::config(format!("{key} must be greater than zero")));
    }
    if secs > MAX_TOKEN_TTL.as_secs() {
        return Err(AppError::config(format!(
            "{key} must be at most {} seconds",
            MAX_TOKEN_TTL.as_secs()
        )));
    }
    Ok(Duration::from_secs(secs))
}

fn base_url(key: &str, value: Option<String>) -> Result<String, AppError> {
    let url = value.ok_or_else(|| AppError::config(format!("{key} must be set")))?;
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(AppError::config(format!("{key} must be an http(s) URL")));
    }
    Ok(url.trim_end_matches('/').to_string())
}
