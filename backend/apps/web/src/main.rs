//! Web Server Entry Point
//!
//! Builds the shared services once at the application root and serves the
//! frontend. Uses `anyhow` for startup errors; request-level errors use
//! `kernel::error::AppError`.

mod config;
mod dto;
mod handlers;
mod middleware;
mod router;
mod state;
mod view;

use std::sync::Arc;

use currency::{CurrencyConfig, CurrencyService, HttpRateSource, RateSource, StaticRateSource};
use platform::cookie::CookieConfig;
use platform::http_client::HttpClientConfig;
use session::{
    HttpIdentityConfig, HttpIdentityProvider, IdentityProvider, InMemoryIdentityProvider,
    SessionConfig,
};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::WebConfig;
use crate::router::web_router;
use crate::state::WebState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "web=info,session=info,preferences=info,currency=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = WebConfig::from_env()?;

    match config.identity_base_url.clone() {
        Some(base_url) => {
            tracing::info!(%base_url, "Using remote identity service");
            let identity = HttpIdentityProvider::new(HttpIdentityConfig::new(base_url))?;
            with_rates(config, identity).await
        }
        None => {
            tracing::warn!("IDENTITY_BASE_URL not set, using built-in demo accounts");
            with_rates(config, InMemoryIdentityProvider::with_demo_accounts()).await
        }
    }
}

async fn with_rates<I>(config: WebConfig, identity: I) -> anyhow::Result<()>
where
    I: IdentityProvider + Send + Sync + 'static,
{
    match config.currency_rates_url.clone() {
        Some(url) => {
            tracing::info!(%url, "Using remote exchange rates");
            let source = HttpRateSource::new(url, &HttpClientConfig::default())?;
            serve(config, identity, source).await
        }
        None => {
            tracing::warn!("CURRENCY_RATES_URL not set, serving fallback rates");
            serve(config, identity, StaticRateSource::fallback()).await
        }
    }
}

async fn serve<I, R>(config: WebConfig, identity: I, rates: R) -> anyhow::Result<()>
where
    I: IdentityProvider + Send + Sync + 'static,
    R: RateSource + Send + Sync + 'static,
{
    let mut session = if cfg!(debug_assertions) {
        SessionConfig::development()
    } else {
        SessionConfig::default()
    };
    if let Some(timeout) = config.session_resolve_timeout {
        session.resolve_timeout = timeout;
    }

    let mut currency = if cfg!(debug_assertions) {
        CurrencyConfig::development()
    } else {
        CurrencyConfig::default()
    };
    if let Some(ttl) = config.currency_cache_ttl {
        currency.cache_ttl = ttl;
    }

    let cookies = CookieConfig {
        secure: config.cookie_secure,
        ..CookieConfig::default()
    };

    let currency = CurrencyService::new(rates, currency);
    // Warm the cache; failures already fall back inside the service
    let table = currency.ensure_rates().await;
    tracing::info!(
        currencies = table.len(),
        fallback = currency.is_fallback(),
        "Exchange rates ready"
    );

    let state = WebState::new(Arc::new(identity), currency, session, cookies);
    let app = web_router(state, &config.allowed_origins);

    tracing::info!("Listening on {}", config.bind_addr);
    let listener = TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
