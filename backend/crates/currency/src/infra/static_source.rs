//! Static Rate Source
//!
//! Serves a fixed set of entries. Used when no rate endpoint is configured
//! and in tests.

use crate::domain::rate::{RateEntry, RateTable};
use crate::domain::source::RateSource;
use crate::error::CurrencyResult;

#[derive(Debug, Clone, Default)]
pub struct StaticRateSource {
    entries: Vec<RateEntry>,
}

impl StaticRateSource {
    pub fn new(entries: Vec<RateEntry>) -> Self {
        Self { entries }
    }

    /// The built-in fallback table as a source
    pub fn fallback() -> Self {
        Self::new(RateTable::fallback().to_entries())
    }
}

impl RateSource for StaticRateSource {
    async fn fetch_rates(&self) -> CurrencyResult<Vec<RateEntry>> {
        Ok(self.entries.clone())
    }
}
