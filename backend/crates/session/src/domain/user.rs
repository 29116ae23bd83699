//! User Entity
//!
//! The identity record returned by the identity service. Owned by the
//! session context for the lifetime of a session.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the user signed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum AuthMethod {
    #[default]
    Password,
    Google,
    Wallet,
    Other,
}

impl AuthMethod {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Password => "password",
            Self::Google => "google",
            Self::Wallet => "wallet",
            Self::Other => "other",
        }
    }
}

impl From<String> for AuthMethod {
    fn from(code: String) -> Self {
        match code.as_str() {
            "password" => Self::Password,
            "google" => Self::Google,
            "wallet" => Self::Wallet,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Backend-side block flag
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub auth_method: AuthMethod,
    #[serde(default)]
    pub role: UserRole,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            is_locked: false,
            auth_method: AuthMethod::default(),
            role: UserRole::default(),
        }
    }

    pub fn with_role(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }

    pub fn locked(mut self) -> Self {
        self.is_locked = true;
        self
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// First name, for greetings
    pub fn display_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.email)
    }
}
