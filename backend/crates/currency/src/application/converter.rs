//! Converter
//!
//! A snapshot of the rate table bound to a preferred currency. Cheap to
//! create per render; all operations are synchronous.

use std::sync::Arc;

use crate::application::format::{FormatOptions, render};
use crate::domain::rate::{MAX_DECIMAL_PLACES, RateTable, SymbolPosition};

#[derive(Debug, Clone)]
pub struct Converter {
    table: Arc<RateTable>,
    preferred: String,
    fallback_symbol: String,
}

impl Converter {
    pub fn new(
        table: Arc<RateTable>,
        preferred: impl Into<String>,
        fallback_symbol: impl Into<String>,
    ) -> Self {
        Self {
            table,
            preferred: preferred.into(),
            fallback_symbol: fallback_symbol.into(),
        }
    }

    pub fn preferred(&self) -> &str {
        &self.preferred
    }

    pub fn table(&self) -> &RateTable {
        &self.table
    }

    /// Convert through the base currency: `amount / from_rate * to_rate`
    ///
    /// Non-finite input or output yields `0`; identical currencies return
    /// the input. Unknown codes count as rate 1.
    pub fn convert(&self, amount: f64, from: &str, to: Option<&str>) -> f64 {
        if !amount.is_finite() {
            return 0.0;
        }
        let to = to.unwrap_or(&self.preferred);
        if from.eq_ignore_ascii_case(to) {
            return amount;
        }
        let converted = amount / self.rate_of(from) * self.rate_of(to);
        if converted.is_finite() { converted } else { 0.0 }
    }

    /// Parse then convert; unparsable input yields `0`
    pub fn convert_str(&self, amount: &str, from: &str, to: Option<&str>) -> f64 {
        match amount.trim().parse::<f64>() {
            Ok(amount) => self.convert(amount, from, to),
            Err(_) => 0.0,
        }
    }

    /// Convert (unless disabled) and format in the target currency
    pub fn format_price(&self, amount: f64, from: &str, options: &FormatOptions) -> String {
        let target = if options.convert {
            options.to.as_deref().unwrap_or(&self.preferred)
        } else {
            from
        };

        let value = if options.convert {
            self.convert(amount, from, Some(target))
        } else if amount.is_finite() {
            amount
        } else {
            0.0
        };

        let (symbol, decimal_places, position) = match self.table.get(target) {
            Some(rate) => (
                rate.symbol.as_str(),
                rate.decimal_places,
                rate.symbol_position,
            ),
            None => (self.fallback_symbol.as_str(), 2, SymbolPosition::Before),
        };

        render(
            value,
            symbol,
            options
                .decimal_places
                .unwrap_or(decimal_places)
                .min(MAX_DECIMAL_PLACES),
            position,
            options.show_symbol,
        )
    }

    /// Symbol of `currency` (preferred when `None`), or the fallback symbol
    pub fn symbol(&self, currency: Option<&str>) -> &str {
        let code = currency.unwrap_or(&self.preferred);
        self.table
            .get(code)
            .map(|rate| rate.symbol.as_str())
            .unwrap_or(&self.fallback_symbol)
    }

    fn rate_of(&self, code: &str) -> f64 {
        match self.table.get(code) {
            Some(rate) => rate.rate,
            None => {
                tracing::debug!(currency = code, "Unknown currency, assuming rate 1");
                1.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rate::RateEntry;

    fn converter(preferred: &str) -> Converter {
        Converter::new(Arc::new(RateTable::fallback()), preferred, "$")
    }

    #[test]
    fn test_convert_through_base() {
        let c = converter("USD");
        assert!((c.convert(100.0, "USD", Some("EUR")) - 92.0).abs() < 1e-9);
        assert!((c.convert(83.0, "INR", Some("USD")) - 1.0).abs() < 1e-9);
        // defaults to preferred
        let c = converter("GBP");
        assert!((c.convert(100.0, "USD", None) - 79.0).abs() < 1e-9);
    }

    #[test]
    fn test_round_trip_for_all_pairs() {
        let c = converter("USD");
        let codes: Vec<String> = c.table().codes().map(str::to_string).collect();
        for a in &codes {
            for b in &codes {
                for x in [0.0, 0.01, 1.0, 123.456, 1e9] {
                    let back = c.convert(c.convert(x, a, Some(b)), b, Some(a));
                    assert!((back - x).abs() <= 1e-9 * x.abs().max(1.0), "{a}->{b}->{a} {x}");
                }
            }
        }
    }

    #[test]
    fn test_convert_edge_cases() {
        let c = converter("EUR");
        assert_eq!(c.convert(f64::NAN, "USD", None), 0.0);
        assert_eq!(c.convert(f64::INFINITY, "USD", None), 0.0);
        assert_eq!(c.convert(42.0, "EUR", None), 42.0);
        assert_eq!(c.convert(42.0, "eur", Some("EUR")), 42.0);
        assert_eq!(c.convert_str("abc", "USD", None), 0.0);
        assert!((c.convert_str(" 10 ", "USD", None) - 9.2).abs() < 1e-9);
    }

    #[test]
    fn test_overflowing_conversion_is_zero() {
        let c = converter("INR");
        assert_eq!(c.convert(1e308, "USD", None), 0.0);
        assert_eq!(c.format_price(1e308, "USD", &FormatOptions::default()), "₹0.00");
    }

    #[test]
    fn test_decimal_override_is_capped() {
        let c = converter("USD");
        let options = FormatOptions {
            decimal_places: Some(u32::MAX),
            ..Default::default()
        };
        assert_eq!(c.format_price(1.0, "USD", &options), "$1.00000000");
    }

    #[test]
    fn test_format_zero_usd() {
        let c = converter("USD");
        assert_eq!(c.format_price(0.0, "USD", &FormatOptions::default()), "$0.00");
    }

    #[test]
    fn test_format_converts_to_preferred() {
        let c = converter("INR");
        assert_eq!(
            c.format_price(10.0, "USD", &FormatOptions::default()),
            "₹830.00"
        );
        assert_eq!(
            c.format_price(10.0, "USD", &FormatOptions::no_conversion()),
            "$10.00"
        );
        assert_eq!(c.format_price(10.0, "USD", &FormatOptions::to("GBP")), "£7.90");
    }

    #[test]
    fn test_format_uses_table_metadata() {
        let table = RateTable::from_entries(vec![
            RateEntry {
                currency: "USD".into(),
                rate: 1.0,
                symbol: "$".into(),
                decimal_places: 2,
                symbol_position: SymbolPosition::Before,
            },
            RateEntry {
                currency: "JPY".into(),
                rate: 150.0,
                symbol: "¥".into(),
                decimal_places: 0,
                symbol_position: SymbolPosition::After,
            },
        ])
        .unwrap();
        let c = Converter::new(Arc::new(table), "JPY", "$");
        assert_eq!(c.format_price(12.34, "USD", &FormatOptions::default()), "1,851 ¥");
    }

    #[test]
    fn test_symbol() {
        let c = converter("EUR");
        assert_eq!(c.symbol(None), "€");
        assert_eq!(c.symbol(Some("GBP")), "£");
        assert_eq!(c.symbol(Some("XYZ")), "$");
    }

    #[test]
    fn test_unknown_target_uses_fallback_symbol() {
        let c = converter("XYZ");
        assert_eq!(c.format_price(5.0, "USD", &FormatOptions::default()), "$5.00");
    }
}
