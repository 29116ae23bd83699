//! Session/User Context
//!
//! Single owner of [`SessionState`]. Constructed once at the application
//! root and passed down; consumers either take a snapshot or subscribe to
//! changes. Resolution failures degrade to "anonymous" and are never
//! returned to the caller.

use std::sync::Arc;
use std::time::Duration;

use platform::storage::{ClientStorage, keys};
use tokio::sync::watch;

use crate::domain::identity::{Credentials, IdentityProvider};
use crate::domain::session_state::SessionState;
use crate::domain::user::User;
use crate::error::{SessionError, SessionResult};

pub struct SessionContext<I>
where
    I: IdentityProvider + Send + Sync + 'static,
{
    identity: Arc<I>,
    storage: Arc<dyn ClientStorage>,
    state: watch::Sender<SessionState>,
}

impl<I> SessionContext<I>
where
    I: IdentityProvider + Send + Sync + 'static,
{
    /// Create a context in the loading state
    pub fn new(identity: Arc<I>, storage: Arc<dyn ClientStorage>) -> Self {
        Self {
            identity,
            storage,
            state: watch::Sender::new(SessionState::loading()),
        }
    }

    /// Latest state
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Observe state changes
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn storage(&self) -> &Arc<dyn ClientStorage> {
        &self.storage
    }

    /// Resolve the current user from the stored token
    pub async fn resolve(&self) -> SessionState {
        let Some(token) = self.storage.get(keys::AUTH_TOKEN) else {
            tracing::debug!("No stored token, session is anonymous");
            return self.publish(SessionState::anonymous());
        };

        let next = match self.identity.whoami(&token).await {
            Ok(user) => {
                tracing::debug!(user_id = %user.id, locked = user.is_locked, "Session resolved");
                SessionState::authenticated(user)
            }
            Err(SessionError::AccountLocked) => {
                tracing::warn!("Identity service reports account locked");
                SessionState::locked(None)
            }
            Err(SessionError::Unauthorized) => {
                tracing::debug!("Stored token rejected, clearing it");
                self.forget_token();
                SessionState::anonymous()
            }
            Err(e) => {
                e.log();
                SessionState::anonymous()
            }
        };

        self.publish(next)
    }

    /// [`resolve`](Self::resolve) bounded by `deadline`
    ///
    /// On timeout the in-flight resolution is dropped and the state stays
    /// as it was (loading, for a fresh context).
    pub async fn resolve_within(&self, deadline: Duration) -> SessionState {
        match tokio::time::timeout(deadline, self.resolve()).await {
            Ok(state) => state,
            Err(_) => {
                tracing::warn!(
                    timeout_ms = deadline.as_millis() as u64,
                    "Session resolution timed out"
                );
                self.snapshot()
            }
        }
    }

    /// Explicit re-check: back to loading, then resolve
    pub async fn refresh(&self) -> SessionState {
        self.state.send_modify(|s| s.is_loading = true);
        self.resolve().await
    }

    /// Sign in with credentials
    ///
    /// On success the token is stored, the user set and the lock cleared.
    /// A locked account sets `is_locked`. Other failures leave the state
    /// untouched.
    pub async fn login(&self, credentials: &Credentials) -> SessionResult<User> {
        match self.identity.login(credentials).await {
            Ok(output) => {
                if let Err(e) = self.storage.set(keys::AUTH_TOKEN, &output.token) {
                    tracing::warn!(error = %e, "Failed to persist auth token");
                }
                tracing::info!(user_id = %output.user.id, "User signed in");
                self.set_user(output.user.clone());
                Ok(output.user)
            }
            Err(SessionError::AccountLocked) => {
                self.lock();
                Err(SessionError::AccountLocked)
            }
            Err(e) => {
                e.log();
                Err(e)
            }
        }
    }

    /// Set the signed-in user and clear the lock flag
    pub fn set_user(&self, user: User) {
        self.publish(SessionState {
            user: Some(user),
            is_loading: false,
            is_locked: false,
        });
    }

    /// Sign out
    ///
    /// Local state is cleared first; the remote call is best-effort.
    pub async fn logout(&self) {
        let token = self.storage.get(keys::AUTH_TOKEN);
        self.forget_token();
        self.state.send_modify(|s| {
            s.user = None;
            s.is_loading = false;
        });

        if let Some(token) = token {
            if let Err(e) = self.identity.logout(&token).await {
                tracing::warn!(error = %e, "Remote logout failed");
            }
        }
        tracing::info!("User signed out");
    }

    /// Mark the account as blocked
    pub fn lock(&self) {
        self.state.send_modify(|s| {
            s.is_locked = true;
            s.is_loading = false;
        });
    }

    fn publish(&self, next: SessionState) -> SessionState {
        self.state.send_replace(next.clone());
        next
    }

    fn forget_token(&self) {
        if let Err(e) = self.storage.remove(keys::AUTH_TOKEN) {
            tracing::warn!(error = %e, "Failed to remove auth token");
        }
    }
}
