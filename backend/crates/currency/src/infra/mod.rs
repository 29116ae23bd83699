pub mod http_rate_source;
pub mod static_source;

pub use http_rate_source::HttpRateSource;
pub use static_source::StaticRateSource;
