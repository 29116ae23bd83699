//! Domain Layer

pub mod rate;
pub mod source;

pub use rate::{CurrencyRate, RateEntry, RateTable, SymbolPosition};
pub use source::{LocalRateSource, RateSource};
