//! Cookie Management
//!
//! Cookie building and parsing, and [`CookieStorage`]: the browser cookie
//! jar seen as [`ClientStorage`] for the duration of one request.

use std::collections::HashMap;
use std::sync::Mutex;

use axum::http::{HeaderMap, HeaderValue, header};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::storage::{ClientStorage, StorageError, StorageResult};

/// SameSite policy for cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Attributes applied to every cookie written by a [`CookieStorage`]
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub path: String,
    /// `None` produces a session cookie
    pub max_age_secs: Option<i64>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
            max_age_secs: Some(365 * 24 * 3600),
        }
    }
}

impl CookieConfig {
    /// Same attributes, but expiring with the browser session
    pub fn session_scoped(&self) -> Self {
        Self {
            max_age_secs: None,
            ..self.clone()
        }
    }

    /// Build a Set-Cookie header value
    pub fn build_set_cookie(&self, name: &str, value: &str) -> String {
        let mut cookie = format!("{}={}", name, value);

        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie.push_str(&format!("; SameSite={}", self.same_site.as_str()));
        cookie.push_str(&format!("; Path={}", self.path));

        if let Some(max_age) = self.max_age_secs {
            cookie.push_str(&format!("; Max-Age={}", max_age));
        }

        cookie
    }

    /// Build a Set-Cookie header value that deletes the cookie
    pub fn build_delete_cookie(&self, name: &str) -> String {
        format!("{}=; HttpOnly; Path={}; Max-Age=0", name, self.path)
    }
}

fn parse_cookies(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|line| line.split(';'))
        .filter_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

// ============================================================================
// CookieStorage
// ============================================================================

/// Cookie jar as client storage
///
/// Reads come from the request's `Cookie` header overlaid with writes made
/// during the request. Writes are collected and turned into `Set-Cookie`
/// headers by [`CookieStorage::set_cookie_headers`]. Values are
/// base64url-encoded so arbitrary strings (JSON included) survive.
#[derive(Debug)]
pub struct CookieStorage {
    config: CookieConfig,
    incoming: HashMap<String, String>,
    pending: Mutex<HashMap<String, Option<String>>>,
}

impl CookieStorage {
    pub fn from_headers(headers: &HeaderMap, config: CookieConfig) -> Self {
        let incoming = parse_cookies(headers)
            .into_iter()
            .filter_map(|(name, raw)| {
                let bytes = URL_SAFE_NO_PAD.decode(raw.as_bytes()).ok()?;
                let value = String::from_utf8(bytes).ok()?;
                Some((name, value))
            })
            .collect();

        Self {
            config,
            incoming,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Set-Cookie headers for every write made through this storage
    pub fn set_cookie_headers(&self) -> Vec<HeaderValue> {
        let Ok(pending) = self.pending.lock() else {
            return Vec::new();
        };

        pending
            .iter()
            .filter_map(|(name, value)| {
                let cookie = match value {
                    Some(value) => self
                        .config
                        .build_set_cookie(name, &URL_SAFE_NO_PAD.encode(value.as_bytes())),
                    None => self.config.build_delete_cookie(name),
                };
                HeaderValue::from_str(&cookie).ok()
            })
            .collect()
    }

    /// Append pending Set-Cookie headers to an outgoing header map
    pub fn apply_to(&self, headers: &mut HeaderMap) {
        for value in self.set_cookie_headers() {
            headers.append(header::SET_COOKIE, value);
        }
    }
}

impl ClientStorage for CookieStorage {
    fn get(&self, key: &str) -> Option<String> {
        if let Ok(pending) = self.pending.lock() {
            if let Some(value) = pending.get(key) {
                return value.clone();
            }
        }
        self.incoming.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.pending
            .lock()
            .map_err(|_| StorageError::Unavailable("cookie jar lock poisoned".to_string()))?
            .insert(key.to_string(), Some(value.to_string()));
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.pending
            .lock()
            .map_err(|_| StorageError::Unavailable("cookie jar lock poisoned".to_string()))?
            .insert(key.to_string(), None);
        Ok(())
    }
}
