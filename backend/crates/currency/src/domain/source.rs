//! Rate Source Trait

use crate::domain::rate::RateEntry;
use crate::error::CurrencyResult;

#[trait_variant::make(RateSource: Send)]
pub trait LocalRateSource {
    /// Fetch the current rate entries
    async fn fetch_rates(&self) -> CurrencyResult<Vec<RateEntry>>;
}
