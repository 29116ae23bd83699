//! Form and JSON shapes

use preferences::{Theme, Units};
use serde::{Deserialize, Serialize};
use session::User;

// ============================================================================
// Forms
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SettingsForm {
    pub theme: Theme,
    pub language: String,
    pub currency: String,
    pub units: Units,
}

// ============================================================================
// JSON
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatusResponse {
    pub authenticated: bool,
    pub is_locked: bool,
    pub user: Option<User>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrenciesResponse {
    pub currencies: Vec<String>,
    /// RFC 3339
    pub last_updated: Option<String>,
    pub fallback: bool,
}
