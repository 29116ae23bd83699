//! Session Error Types
//!
//! Session-specific error variants that convert into the unified
//! `kernel::error::AppError`.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::StorageError;
use thiserror::Error;

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    /// Token missing, expired or rejected
    #[error("Not authenticated")]
    Unauthorized,

    /// Wrong email or password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The backend reports the account as blocked
    #[error("Account is locked")]
    AccountLocked,

    /// The identity service rejected the request shape
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Identity service did not answer in time
    #[error("Identity service timed out")]
    Timeout,

    /// Transport failure talking to the identity service
    #[error("Identity service unreachable: {0}")]
    Network(String),

    /// Identity service answered with something we cannot use
    #[error("Unexpected identity service response: {0}")]
    UnexpectedResponse(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SessionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::Unauthorized | SessionError::InvalidCredentials => {
                ErrorKind::Unauthorized
            }
            SessionError::AccountLocked => ErrorKind::Locked,
            SessionError::BadRequest(_) => ErrorKind::BadRequest,
            SessionError::Timeout => ErrorKind::RequestTimeout,
            SessionError::Network(_) => ErrorKind::ServiceUnavailable,
            SessionError::UnexpectedResponse(_) => ErrorKind::BadGateway,
            SessionError::Storage(_) => ErrorKind::ServiceUnavailable,
            SessionError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Whether this failure says something about the account rather
    /// than about the transport
    pub fn is_definitive(&self) -> bool {
        matches!(
            self,
            SessionError::Unauthorized
                | SessionError::InvalidCredentials
                | SessionError::AccountLocked
        )
    }

    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.to_string());
        match self {
            SessionError::AccountLocked => err.with_action("Contact support to unlock your account"),
            SessionError::InvalidCredentials => err.with_action("Check your email and password"),
            _ => err,
        }
    }

    /// Log the error with an appropriate level
    pub fn log(&self) {
        match self {
            SessionError::Internal(msg) => {
                tracing::error!(message = %msg, "Session internal error");
            }
            SessionError::Network(_) | SessionError::Timeout | SessionError::UnexpectedResponse(_) => {
                tracing::warn!(error = %self, "Identity service failure");
            }
            SessionError::AccountLocked => {
                tracing::warn!("Locked account detected");
            }
            _ => {
                tracing::debug!(error = %self, "Session error");
            }
        }
    }
}

impl From<reqwest::Error> for SessionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SessionError::Timeout
        } else if err.is_decode() {
            SessionError::UnexpectedResponse(err.to_string())
        } else {
            SessionError::Network(err.to_string())
        }
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        err.to_app_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(SessionError::Unauthorized.to_app_error().status_code(), 401);
        assert_eq!(SessionError::AccountLocked.to_app_error().status_code(), 423);
        assert_eq!(SessionError::Timeout.to_app_error().status_code(), 408);
        assert_eq!(
            SessionError::Network("refused".into())
                .to_app_error()
                .status_code(),
            503
        );
    }

    #[test]
    fn test_locked_carries_action() {
        let err = SessionError::AccountLocked.to_app_error();
        assert!(err.action().is_some());
    }

    #[test]
    fn test_is_definitive() {
        assert!(SessionError::AccountLocked.is_definitive());
        assert!(SessionError::Unauthorized.is_definitive());
        assert!(!SessionError::Timeout.is_definitive());
        assert!(!SessionError::Network("x".into()).is_definitive());
    }
}
