//! Shared Kernel
//!
//! The unified [`error::app_error::AppError`], its
//! [`error::kind::ErrorKind`] and conversions from common library errors.
//! Nothing here knows about sessions, preferences or currencies.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
