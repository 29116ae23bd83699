//! Price formatting

use crate::domain::rate::SymbolPosition;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// Convert from the source currency before formatting
    pub convert: bool,
    /// Target currency; the preferred currency when `None`
    pub to: Option<String>,
    /// Override the currency's decimal places
    pub decimal_places: Option<u32>,
    pub show_symbol: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            convert: true,
            to: None,
            decimal_places: None,
            show_symbol: true,
        }
    }
}

impl FormatOptions {
    /// Format in the source currency, without converting
    pub fn no_conversion() -> Self {
        Self {
            convert: false,
            ..Default::default()
        }
    }

    pub fn to(currency: impl Into<String>) -> Self {
        Self {
            to: Some(currency.into()),
            ..Default::default()
        }
    }
}

/// `1234.5, 2` → `1,234.50`
pub(crate) fn group_thousands(amount: f64, decimal_places: u32) -> String {
    let fixed = format!("{:.*}", decimal_places as usize, amount.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(fixed.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

pub(crate) fn render(
    amount: f64,
    symbol: &str,
    decimal_places: u32,
    position: SymbolPosition,
    show_symbol: bool,
) -> String {
    let digits = group_thousands(amount, decimal_places);
    // no "-0.00"
    let negative = amount < 0.0 && digits.chars().any(|c| c.is_ascii_digit() && c != '0');
    let sign = if negative { "-" } else { "" };

    match (show_symbol, position) {
        (false, _) => format!("{sign}{digits}"),
        (true, SymbolPosition::Before) => format!("{sign}{symbol}{digits}"),
        (true, SymbolPosition::After) => format!("{sign}{digits} {symbol}"),
    }
}
