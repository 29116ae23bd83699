//! Identity Provider Trait
//!
//! The "who am I" / login / logout contract. Implementations live in
//! the infrastructure layer.

use serde::{Deserialize, Serialize};

use crate::domain::user::User;
use crate::error::SessionResult;

/// Login credentials
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Successful login
#[derive(Debug, Clone, Deserialize)]
pub struct LoginOutput {
    pub token: String,
    pub user: User,
}

#[trait_variant::make(IdentityProvider: Send)]
pub trait LocalIdentityProvider {
    /// Resolve the user behind a bearer token
    async fn whoami(&self, token: &str) -> SessionResult<User>;

    /// Exchange credentials for a token and user
    async fn login(&self, credentials: &Credentials) -> SessionResult<LoginOutput>;

    /// Invalidate a token
    async fn logout(&self, token: &str) -> SessionResult<()>;
}
