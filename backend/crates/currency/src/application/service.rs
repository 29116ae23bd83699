//! Currency Service
//!
//! Owns the cached rate table. The first caller after expiry refreshes it;
//! concurrent callers wait on the same refresh instead of fetching again.
//! A failed fetch never leaves the service without rates: the previous
//! table is kept, or the built-in fallback is installed.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::application::config::CurrencyConfig;
use crate::application::converter::Converter;
use crate::domain::rate::RateTable;
use crate::domain::source::RateSource;

#[derive(Debug, Clone)]
struct Cached {
    table: Arc<RateTable>,
    expires_at: Instant,
    updated_at: DateTime<Utc>,
    is_fallback: bool,
}

pub struct CurrencyService<R>
where
    R: RateSource + Send + Sync,
{
    source: R,
    config: CurrencyConfig,
    cache: RwLock<Option<Cached>>,
    refresh: Mutex<()>,
}

impl<R> CurrencyService<R>
where
    R: RateSource + Send + Sync,
{
    pub fn new(source: R, config: CurrencyConfig) -> Self {
        Self {
            source,
            config,
            cache: RwLock::new(None),
            refresh: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &CurrencyConfig {
        &self.config
    }

    /// Current table, refreshing it first if missing or expired
    pub async fn ensure_rates(&self) -> Arc<RateTable> {
        if let Some(table) = self.fresh_table() {
            return table;
        }

        let _guard = self.refresh.lock().await;
        // Another caller may have refreshed while we waited
        if let Some(table) = self.fresh_table() {
            return table;
        }

        let now = Instant::now();
        let next = match self.source.fetch_rates().await.and_then(RateTable::from_entries) {
            Ok(table) => {
                tracing::info!(currencies = table.len(), "Exchange rates refreshed");
                Cached {
                    table: Arc::new(table),
                    expires_at: now + self.config.cache_ttl,
                    updated_at: Utc::now(),
                    is_fallback: false,
                }
            }
            Err(e) => match self.cached() {
                Some(stale) if !stale.is_fallback => {
                    tracing::warn!(error = %e, "Rate refresh failed, keeping previous table");
                    Cached {
                        expires_at: now + self.config.retry_after,
                        ..stale
                    }
                }
                _ => {
                    tracing::warn!(error = %e, "Rate fetch failed, using fallback rates");
                    Cached {
                        table: Arc::new(RateTable::fallback()),
                        expires_at: now + self.config.retry_after,
                        updated_at: Utc::now(),
                        is_fallback: true,
                    }
                }
            },
        };

        let table = next.table.clone();
        *self.cache.write().unwrap_or_else(PoisonError::into_inner) = Some(next);
        table
    }

    /// Current table without refreshing; fallback before the first fetch
    pub fn rates(&self) -> Arc<RateTable> {
        self.cached()
            .map(|c| c.table)
            .unwrap_or_else(|| Arc::new(RateTable::fallback()))
    }

    /// Converter bound to `preferred` (or the configured default)
    pub async fn converter(&self, preferred: Option<&str>) -> Converter {
        let table = self.ensure_rates().await;
        let preferred = preferred
            .filter(|code| table.contains(code))
            .unwrap_or(&self.config.default_currency)
            .to_ascii_uppercase();
        Converter::new(table, preferred, self.config.fallback_symbol.clone())
    }

    /// Currency codes known to the current table
    pub fn available_currencies(&self) -> Vec<String> {
        self.rates().codes().map(str::to_string).collect()
    }

    /// When the current table was installed
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.cached().map(|c| c.updated_at)
    }

    /// Whether the built-in fallback is being served
    pub fn is_fallback(&self) -> bool {
        self.cached().is_none_or(|c| c.is_fallback)
    }

    fn cached(&self) -> Option<Cached> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn fresh_table(&self) -> Option<Arc<RateTable>> {
        self.cached()
            .filter(|c| Instant::now() < c.expires_at)
            .map(|c| c.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::format::FormatOptions;
    use crate::domain::rate::{RateEntry, SymbolPosition};
    use crate::error::{CurrencyError, CurrencyResult};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct FakeSource {
        calls: AtomicUsize,
        failing: AtomicBool,
        latency: Duration,
    }

    impl FakeSource {
        fn failing() -> Self {
            let source = Self::default();
            source.failing.store(true, Ordering::SeqCst);
            source
        }
    }

    impl RateSource for FakeSource {
        async fn fetch_rates(&self) -> CurrencyResult<Vec<RateEntry>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            if self.failing.load(Ordering::SeqCst) {
                return Err(CurrencyError::Unavailable("offline".into()));
            }
            Ok(vec![
                RateEntry {
                    currency: "usd".into(),
                    rate: 1.0,
                    symbol: "$".into(),
                    decimal_places: 2,
                    symbol_position: SymbolPosition::Before,
                },
                RateEntry {
                    currency: "CHF".into(),
                    rate: 0.9,
                    symbol: "CHF".into(),
                    decimal_places: 2,
                    symbol_position: SymbolPosition::After,
                },
            ])
        }
    }

    fn config(ttl: Duration) -> CurrencyConfig {
        CurrencyConfig {
            cache_ttl: ttl,
            retry_after: Duration::ZERO,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_fetch_is_cached() {
        let service = CurrencyService::new(FakeSource::default(), CurrencyConfig::default());
        service.ensure_rates().await;
        service.ensure_rates().await;
        assert_eq!(service.source.calls.load(Ordering::SeqCst), 1);
        assert!(!service.is_fallback());
        assert!(service.last_updated().is_some());
        assert_eq!(service.available_currencies(), vec!["CHF", "USD"]);
    }

    #[tokio::test]
    async fn test_expired_table_is_refetched() {
        let service = CurrencyService::new(FakeSource::default(), config(Duration::ZERO));
        service.ensure_rates().await;
        service.ensure_rates().await;
        assert_eq!(service.source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_fetch() {
        let source = FakeSource {
            latency: Duration::from_millis(50),
            ..Default::default()
        };
        let service = Arc::new(CurrencyService::new(source, CurrencyConfig::default()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.ensure_rates().await })
            })
            .collect();
        for handle in handles {
            assert!(handle.await.unwrap().contains("CHF"));
        }
        assert_eq!(service.source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_installs_fallback() {
        let service = CurrencyService::new(FakeSource::failing(), CurrencyConfig::default());
        let table = service.ensure_rates().await;
        assert_eq!(*table, RateTable::fallback());
        assert!(service.is_fallback());
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_table() {
        let service = CurrencyService::new(FakeSource::default(), config(Duration::ZERO));
        service.ensure_rates().await;

        service.source.failing.store(true, Ordering::SeqCst);
        let table = service.ensure_rates().await;
        assert!(table.contains("CHF"));
        assert!(!service.is_fallback());
    }

    #[tokio::test]
    async fn test_rates_before_first_fetch_is_fallback() {
        let service = CurrencyService::new(FakeSource::default(), CurrencyConfig::default());
        assert_eq!(*service.rates(), RateTable::fallback());
        assert!(service.is_fallback());
        assert_eq!(service.source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_converter_defaults_unknown_preference() {
        let service = CurrencyService::new(FakeSource::failing(), CurrencyConfig::default());
        let converter = service.converter(Some("XYZ")).await;
        assert_eq!(converter.preferred(), "USD");
        assert_eq!(
            converter.format_price(0.0, "USD", &FormatOptions::default()),
            "$0.00"
        );

        let converter = service.converter(Some("eur")).await;
        assert_eq!(converter.preferred(), "EUR");
        assert_eq!(
            converter.format_price(100.0, "USD", &FormatOptions::default()),
            "€92.00"
        );
    }
}
