//! Session Configuration

use std::time::Duration;

/// Session application configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Where anonymous users are sent by guards
    pub login_path: String,
    /// Where an authenticated user landing on `/` is sent
    pub home_path: String,
    /// Tag stored alongside the intended destination
    pub login_intent: String,
    /// Upper bound on a single resolution before the loading branch is shown
    pub resolve_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
            home_path: "/dashboard".to_string(),
            login_intent: "protected_route".to_string(),
            resolve_timeout: Duration::from_millis(1500),
        }
    }
}

impl SessionConfig {
    /// Create config for development (slow local identity service)
    pub fn development() -> Self {
        Self {
            resolve_timeout: Duration::from_secs(5),
            ..Default::default()
        }
    }
}
