//! Error Kind
//!
//! Classification of failures. Each kind carries its HTTP status and
//! reason phrase so the web layer can answer without inspecting
//! individual error types.

use serde::Serialize;

/// Error classification
///
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// assert_eq!(ErrorKind::Locked.status_code(), 423);
/// assert_eq!(ErrorKind::Locked.as_str(), "Locked");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// Malformed input
    BadRequest,
    /// No valid token, or wrong credentials
    Unauthorized,
    /// Signed in but not allowed, e.g. a non-admin on `/admin`
    Forbidden,
    NotFound,
    /// An upstream call did not answer in time
    RequestTimeout,
    UnprocessableEntity,
    /// The account is locked
    Locked,
    InternalServerError,
    /// An upstream service answered with something unusable
    BadGateway,
    /// An upstream service or the client storage is unavailable
    ServiceUnavailable,
}

impl ErrorKind {
    const fn parts(&self) -> (u16, &'static str) {
        match self {
            ErrorKind::BadRequest => (400, "Bad Request"),
            ErrorKind::Unauthorized => (401, "Unauthorized"),
            ErrorKind::Forbidden => (403, "Forbidden"),
            ErrorKind::NotFound => (404, "Not Found"),
            ErrorKind::RequestTimeout => (408, "Request Timeout"),
            ErrorKind::UnprocessableEntity => (422, "Unprocessable Entity"),
            ErrorKind::Locked => (423, "Locked"),
            ErrorKind::InternalServerError => (500, "Internal Server Error"),
            ErrorKind::BadGateway => (502, "Bad Gateway"),
            ErrorKind::ServiceUnavailable => (503, "Service Unavailable"),
        }
    }

    #[inline]
    pub const fn status_code(&self) -> u16 {
        self.parts().0
    }

    /// Reason phrase
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.parts().1
    }

    /// 5xx: our fault or an upstream's
    #[inline]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
