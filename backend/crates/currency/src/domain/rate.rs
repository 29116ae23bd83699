//! Rate Table
//!
//! `code → { rate, symbol, decimal places, symbol position }`, with rates
//! relative to a base currency (rate 1).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CurrencyError, CurrencyResult};

/// Upper bound on rendered decimal places
pub const MAX_DECIMAL_PLACES: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolPosition {
    #[default]
    Before,
    After,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyRate {
    /// Units of this currency per unit of the base currency
    pub rate: f64,
    pub symbol: String,
    pub decimal_places: u32,
    pub symbol_position: SymbolPosition,
}

/// Wire shape returned by the rate endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateEntry {
    pub currency: String,
    pub rate: f64,
    pub symbol: String,
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
    #[serde(default)]
    pub symbol_position: SymbolPosition,
}

fn default_decimal_places() -> u32 {
    2
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RateTable {
    rates: BTreeMap<String, CurrencyRate>,
}

impl RateTable {
    /// Build from wire entries
    ///
    /// Codes are upper-cased. Entries with a non-positive or non-finite
    /// rate are dropped. Fails if nothing usable remains.
    pub fn from_entries(entries: Vec<RateEntry>) -> CurrencyResult<Self> {
        let mut rates = BTreeMap::new();
        for entry in entries {
            if !entry.rate.is_finite() || entry.rate <= 0.0 {
                tracing::warn!(
                    currency = %entry.currency,
                    rate = entry.rate,
                    "Dropping unusable rate"
                );
                continue;
            }
            rates.insert(
                entry.currency.trim().to_uppercase(),
                CurrencyRate {
                    rate: entry.rate,
                    symbol: entry.symbol,
                    decimal_places: entry.decimal_places.min(MAX_DECIMAL_PLACES),
                    symbol_position: entry.symbol_position,
                },
            );
        }

        if rates.is_empty() {
            return Err(CurrencyError::EmptyTable);
        }
        Ok(Self { rates })
    }

    /// Hardcoded table used when the remote fetch fails
    pub fn fallback() -> Self {
        let entry = |code: &str, rate: f64, symbol: &str| {
            (
                code.to_string(),
                CurrencyRate {
                    rate,
                    symbol: symbol.to_string(),
                    decimal_places: 2,
                    symbol_position: SymbolPosition::Before,
                },
            )
        };

        Self {
            rates: BTreeMap::from([
                entry("USD", 1.0, "$"),
                entry("EUR", 0.92, "€"),
                entry("INR", 83.0, "₹"),
                entry("GBP", 0.79, "£"),
            ]),
        }
    }

    /// Back to wire entries, in code order
    pub fn to_entries(&self) -> Vec<RateEntry> {
        self.rates
            .iter()
            .map(|(code, rate)| RateEntry {
                currency: code.clone(),
                rate: rate.rate,
                symbol: rate.symbol.clone(),
                decimal_places: rate.decimal_places,
                symbol_position: rate.symbol_position,
            })
            .collect()
    }

    pub fn get(&self, code: &str) -> Option<&CurrencyRate> {
        self.rates
            .get(code)
            .or_else(|| self.rates.get(&code.to_uppercase()))
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.rates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(code: &str, rate: f64) -> RateEntry {
        RateEntry {
            currency: code.to_string(),
            rate,
            symbol: code.to_string(),
            decimal_places: 2,
            symbol_position: SymbolPosition::Before,
        }
    }

    #[test]
    fn test_fallback_table() {
        let table = RateTable::fallback();
        assert_eq!(table.codes().collect::<Vec<_>>(), vec!["EUR", "GBP", "INR", "USD"]);
        assert_eq!(table.get("USD").unwrap().rate, 1.0);
        assert_eq!(table.get("inr").unwrap().symbol, "₹");
    }

    #[test]
    fn test_from_entries_drops_bad_rates() {
        let table = RateTable::from_entries(vec![
            entry("usd", 1.0),
            entry("ZZZ", 0.0),
            entry("NAN", f64::NAN),
            entry("JPY", 150.0),
        ])
        .unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.contains("USD"));
        assert!(!table.contains("ZZZ"));
    }

    #[test]
    fn test_from_entries_empty_is_error() {
        assert!(matches!(
            RateTable::from_entries(vec![entry("ZZZ", -1.0)]),
            Err(CurrencyError::EmptyTable)
        ));
    }

    #[test]
    fn test_wire_shape() {
        let json = r#"[
            {"currency":"EUR","rate":0.9,"symbol":"€","decimalPlaces":2,"symbolPosition":"after"},
            {"currency":"JPY","rate":150.0,"symbol":"¥","decimalPlaces":0}
        ]"#;
        let entries: Vec<RateEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(entries[0].symbol_position, SymbolPosition::After);
        assert_eq!(entries[1].symbol_position, SymbolPosition::Before);
        assert_eq!(entries[1].decimal_places, 0);
    }
}
