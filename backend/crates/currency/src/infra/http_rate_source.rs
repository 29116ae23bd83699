//! HTTP Rate Source
//!
//! `GET {url}` → `[{ currency, rate, symbol, decimalPlaces, symbolPosition }]`

use platform::http_client::{HttpClientConfig, HttpClientError, build_client};

use crate::domain::rate::RateEntry;
use crate::domain::source::RateSource;
use crate::error::{CurrencyError, CurrencyResult};

#[derive(Clone)]
pub struct HttpRateSource {
    client: reqwest::Client,
    url: String,
}

impl HttpRateSource {
    pub fn new(url: impl Into<String>, http: &HttpClientConfig) -> Result<Self, HttpClientError> {
        Ok(Self {
            client: build_client(http)?,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl RateSource for HttpRateSource {
    async fn fetch_rates(&self) -> CurrencyResult<Vec<RateEntry>> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CurrencyError::Status(status.as_u16()));
        }

        let entries: Vec<RateEntry> = response.json().await?;
        tracing::debug!(url = %self.url, entries = entries.len(), "Fetched rate entries");
        Ok(entries)
    }
}
