//! In-Memory Identity Provider
//!
//! Account table and token map held in process. Used for local
//! development without an identity service, and in tests.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use crate::domain::identity::{Credentials, IdentityProvider, LoginOutput};
use crate::domain::user::{User, UserRole};
use crate::error::{SessionError, SessionResult};

struct Account {
    password: String,
    user: User,
}

#[derive(Default)]
pub struct InMemoryIdentityProvider {
    accounts: RwLock<HashMap<String, Account>>,
    tokens: RwLock<HashMap<String, String>>,
    latency: Option<Duration>,
    unavailable: bool,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeded with a regular, an admin and a locked account
    pub fn with_demo_accounts() -> Self {
        let provider = Self::new();
        provider.add_account(
            "demo123",
            User::new("usr_demo", "Demo User", "demo@carbon.app"),
        );
        provider.add_account(
            "admin123",
            User::new("usr_admin", "Admin User", "admin@carbon.app").with_role(UserRole::Admin),
        );
        provider.add_account(
            "locked123",
            User::new("usr_locked", "Locked User", "locked@carbon.app").locked(),
        );
        provider
    }

    /// Provider whose every call fails like an unreachable service
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Delay every call, to exercise timeouts
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn add_account(&self, password: impl Into<String>, user: User) {
        if let Ok(mut accounts) = self.accounts.write() {
            accounts.insert(
                user.email.to_lowercase(),
                Account {
                    password: password.into(),
                    user,
                },
            );
        }
    }

    /// Flip the backend-side lock flag of an account
    pub fn set_locked(&self, email: &str, locked: bool) {
        if let Ok(mut accounts) = self.accounts.write() {
            if let Some(account) = accounts.get_mut(&email.to_lowercase()) {
                account.user.is_locked = locked;
            }
        }
    }

    async fn simulate_network(&self) -> SessionResult<()> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.unavailable {
            return Err(SessionError::Network("connection refused".to_string()));
        }
        Ok(())
    }

    fn poisoned() -> SessionError {
        SessionError::Internal("identity table lock poisoned".to_string())
    }
}

impl IdentityProvider for InMemoryIdentityProvider {
    async fn whoami(&self, token: &str) -> SessionResult<User> {
        self.simulate_network().await?;

        let email = self
            .tokens
            .read()
            .map_err(|_| Self::poisoned())?
            .get(token)
            .cloned()
            .ok_or(SessionError::Unauthorized)?;

        let accounts = self.accounts.read().map_err(|_| Self::poisoned())?;
        let account = accounts.get(&email).ok_or(SessionError::Unauthorized)?;

        if account.user.is_locked {
            return Err(SessionError::AccountLocked);
        }
        Ok(account.user.clone())
    }

    async fn login(&self, credentials: &Credentials) -> SessionResult<LoginOutput> {
        self.simulate_network().await?;

        let email = credentials.email.trim().to_lowercase();
        let user = {
            let accounts = self.accounts.read().map_err(|_| Self::poisoned())?;
            let account = accounts
                .get(&email)
                .filter(|a| a.password == credentials.password)
                .ok_or(SessionError::InvalidCredentials)?;
            if account.user.is_locked {
                return Err(SessionError::AccountLocked);
            }
            account.user.clone()
        };

        let token = uuid::Uuid::new_v4().simple().to_string();
        self.tokens
            .write()
            .map_err(|_| Self::poisoned())?
            .insert(token.clone(), email);

        Ok(LoginOutput { token, user })
    }

    async fn logout(&self, token: &str) -> SessionResult<()> {
        self.simulate_network().await?;
        self.tokens
            .write()
            .map_err(|_| Self::poisoned())?
            .remove(token);
        Ok(())
    }
}
