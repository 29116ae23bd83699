//! Preference Error Types

use kernel::error::app_error::AppError;
use platform::StorageError;
use thiserror::Error;

pub type PreferenceResult<T> = Result<T, PreferenceError>;

#[derive(Debug, Error)]
pub enum PreferenceError {
    /// In-memory state was updated; only persistence failed
    #[error("Failed to persist preferences: {0}")]
    Persist(#[from] StorageError),

    #[error("Failed to serialize preferences: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid translation catalog for '{language}': {reason}")]
    InvalidCatalog { language: String, reason: String },
}

impl PreferenceError {
    pub fn to_app_error(&self) -> AppError {
        match self {
            PreferenceError::Persist(e) => e.to_app_error(),
            PreferenceError::Serialization(_) => AppError::internal(self.to_string()),
            PreferenceError::InvalidCatalog { .. } => AppError::bad_request(self.to_string()),
        }
    }
}

impl From<PreferenceError> for AppError {
    fn from(err: PreferenceError) -> Self {
        err.to_app_error()
    }
}
