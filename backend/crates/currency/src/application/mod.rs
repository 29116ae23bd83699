//! Application Layer

pub mod config;
pub mod converter;
pub mod format;
pub mod service;

pub use config::CurrencyConfig;
pub use converter::Converter;
pub use format::FormatOptions;
pub use service::CurrencyService;
