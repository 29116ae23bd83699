//! Session State
//!
//! `{ user, is_loading, is_locked }` snapshot consumed by the gate and guard.
//!
//! `is_loading` is true only during the initial resolution window (or an
//! explicit re-check); `is_locked` is independent of `user`.

use crate::domain::user::User;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<User>,
    pub is_loading: bool,
    pub is_locked: bool,
}

impl SessionState {
    /// Initial state, before resolution finishes
    pub fn loading() -> Self {
        Self {
            user: None,
            is_loading: true,
            is_locked: false,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            user: None,
            is_loading: false,
            is_locked: false,
        }
    }

    pub fn authenticated(user: User) -> Self {
        let is_locked = user.is_locked;
        Self {
            user: Some(user),
            is_loading: false,
            is_locked,
        }
    }

    pub fn locked(user: Option<User>) -> Self {
        Self {
            user,
            is_loading: false,
            is_locked: true,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_resolved(&self) -> bool {
        !self.is_loading
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::loading()
    }
}
