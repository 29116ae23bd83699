//! Web Configuration
//!
//! Read once at startup from the environment (`.env` is loaded first).

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct WebConfig {
    pub bind_addr: SocketAddr,
    /// Identity service; built-in demo accounts when unset
    pub identity_base_url: Option<String>,
    /// Rate endpoint; fallback rates when unset
    pub currency_rates_url: Option<String>,
    pub currency_cache_ttl: Option<Duration>,
    pub session_resolve_timeout: Option<Duration>,
    pub cookie_secure: bool,
    /// Origins allowed to call `/api/*`
    pub allowed_origins: Vec<String>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            identity_base_url: None,
            currency_rates_url: None,
            currency_cache_ttl: None,
            session_resolve_timeout: None,
            cookie_secure: !cfg!(debug_assertions),
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

impl WebConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = match var("WEB_BIND_ADDR") {
            Some(addr) => addr
                .parse()
                .with_context(|| format!("WEB_BIND_ADDR is not a socket address: {addr}"))?,
            None => defaults.bind_addr,
        };

        let currency_cache_ttl = var("CURRENCY_CACHE_TTL_SECS")
            .map(|secs| {
                secs.parse::<u64>()
                    .map(Duration::from_secs)
                    .with_context(|| format!("CURRENCY_CACHE_TTL_SECS is not a number: {secs}"))
            })
            .transpose()?;

        let session_resolve_timeout = var("SESSION_RESOLVE_TIMEOUT_MS")
            .map(|ms| {
                ms.parse::<u64>()
                    .map(Duration::from_millis)
                    .with_context(|| format!("SESSION_RESOLVE_TIMEOUT_MS is not a number: {ms}"))
            })
            .transpose()?;

        let cookie_secure = match var("COOKIE_SECURE") {
            Some(flag) => parse_flag(&flag)
                .with_context(|| format!("COOKIE_SECURE must be true or false: {flag}"))?,
            None => defaults.cookie_secure,
        };

        let allowed_origins = match var("WEB_ALLOWED_ORIGINS") {
            Some(origins) => origins
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            None => defaults.allowed_origins,
        };

        Ok(Self {
            bind_addr,
            identity_base_url: var("IDENTITY_BASE_URL"),
            currency_rates_url: var("CURRENCY_RATES_URL"),
            currency_cache_ttl,
            session_resolve_timeout,
            cookie_secure,
            allowed_origins,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
