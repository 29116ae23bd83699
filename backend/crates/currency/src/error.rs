//! Currency Error Types

use kernel::error::app_error::AppError;
use thiserror::Error;

pub type CurrencyResult<T> = Result<T, CurrencyError>;

#[derive(Debug, Error)]
pub enum CurrencyError {
    #[error("Rate fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Rate endpoint answered with status {0}")]
    Status(u16),

    /// Nothing usable in the payload
    #[error("Rate table is empty")]
    EmptyTable,

    #[error("Rate source unavailable: {0}")]
    Unavailable(String),
}

impl CurrencyError {
    pub fn to_app_error(&self) -> AppError {
        match self {
            CurrencyError::Fetch(_) | CurrencyError::Unavailable(_) => {
                AppError::service_unavailable(self.to_string())
            }
            CurrencyError::Status(_) | CurrencyError::EmptyTable => {
                AppError::bad_gateway(self.to_string())
            }
        }
    }
}

impl From<CurrencyError> for AppError {
    fn from(err: CurrencyError) -> Self {
        err.to_app_error()
    }
}
