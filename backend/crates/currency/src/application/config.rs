//! Currency Configuration

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CurrencyConfig {
    /// How long a fetched table is trusted
    pub cache_ttl: Duration,
    /// How soon to retry after a failed fetch
    pub retry_after: Duration,
    /// Symbol for unknown currencies
    pub fallback_symbol: String,
    /// Currency used when no preference is set
    pub default_currency: String,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(3600),
            retry_after: Duration::from_secs(60),
            fallback_symbol: "$".to_string(),
            default_currency: "USD".to_string(),
        }
    }
}

impl CurrencyConfig {
    /// Create config for development (short cache)
    pub fn development() -> Self {
        Self {
            cache_ttl: Duration::from_secs(60),
            retry_after: Duration::from_secs(10),
            ..Default::default()
        }
    }
}
