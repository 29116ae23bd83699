//! Currency Module
//!
//! Exchange-rate table fetched from a remote config endpoint, cached in
//! memory, with a hardcoded fallback. Conversion goes through the base
//! currency; formatting uses each currency's symbol, decimal places and
//! symbol position.
//!
//! - `domain/` - rate table, rate source trait
//! - `application/` - cached currency service, converter, formatting
//! - `infra/` - HTTP and static rate sources

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;

pub use application::config::CurrencyConfig;
pub use application::converter::Converter;
pub use application::format::FormatOptions;
pub use application::service::CurrencyService;
pub use domain::rate::{CurrencyRate, RateEntry, RateTable, SymbolPosition};
pub use domain::source::RateSource;
pub use error::{CurrencyError, CurrencyResult};
pub use infra::{HttpRateSource, StaticRateSource};
