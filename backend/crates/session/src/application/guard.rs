//! Auth Guard
//!
//! Per-page gate for protected content, expressed as an explicit state
//! machine:
//!
//! ```text
//!            ┌──> Blocked      (account locked)
//! Checking ──┼──> Redirecting  (no user; intent recorded)
//!            └──> Authorized
//! ```
//!
//! `Checking` is left exactly once per mount. Later snapshots are ignored
//! until [`AuthGuard::reset`] is called for an explicit session change.

use std::sync::Arc;

use platform::storage::ClientStorage;
use tokio::sync::watch;

use crate::application::config::SessionConfig;
use crate::application::intent::record_login_intent;
use crate::domain::session_state::SessionState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    Checking,
    Blocked,
    Redirecting { login_path: String },
    Authorized,
}

impl GuardState {
    #[inline]
    pub fn is_settled(&self) -> bool {
        !matches!(self, GuardState::Checking)
    }

    pub fn view(&self) -> GuardView {
        match self {
            GuardState::Checking => GuardView::Loading,
            GuardState::Blocked => GuardView::BlockedAccount,
            GuardState::Redirecting { .. } => GuardView::RedirectInProgress,
            GuardState::Authorized => GuardView::Content,
        }
    }
}

/// What the guarded page renders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardView {
    Loading,
    BlockedAccount,
    RedirectInProgress,
    Content,
}

pub struct AuthGuard {
    path: String,
    state: GuardState,
    storage: Arc<dyn ClientStorage>,
    config: Arc<SessionConfig>,
}

impl AuthGuard {
    /// Mount a guard for the page at `path`
    pub fn new(
        path: impl Into<String>,
        storage: Arc<dyn ClientStorage>,
        config: Arc<SessionConfig>,
    ) -> Self {
        Self {
            path: path.into(),
            state: GuardState::Checking,
            storage,
            config,
        }
    }

    pub fn state(&self) -> &GuardState {
        &self.state
    }

    pub fn view(&self) -> GuardView {
        self.state.view()
    }

    /// Feed a session snapshot
    ///
    /// Only the first resolved snapshot moves the guard out of `Checking`.
    pub fn observe(&mut self, session: &SessionState) -> &GuardState {
        if self.state.is_settled() || session.is_loading {
            return &self.state;
        }

        self.state = if session.is_locked {
            tracing::info!(path = %self.path, "Guard blocked locked account");
            GuardState::Blocked
        } else if session.user.is_none() {
            self.begin_redirect()
        } else {
            GuardState::Authorized
        };

        &self.state
    }

    /// Wait for the first resolved snapshot, then settle
    ///
    /// If the session context goes away first the guard stays in
    /// `Checking`; the result is discarded with the page.
    pub async fn wait(&mut self, session: &mut watch::Receiver<SessionState>) -> &GuardState {
        if self.state.is_settled() {
            return &self.state;
        }

        let resolved = match session.wait_for(|s| !s.is_loading).await {
            Ok(snapshot) => Some(snapshot.clone()),
            Err(_) => {
                tracing::debug!(path = %self.path, "Session context dropped before resolution");
                None
            }
        };

        if let Some(snapshot) = resolved {
            self.observe(&snapshot);
        }
        &self.state
    }

    /// Explicit session reset: re-arm the guard
    pub fn reset(&mut self) {
        self.state = GuardState::Checking;
    }

    fn begin_redirect(&self) -> GuardState {
        if let Err(e) =
            record_login_intent(self.storage.as_ref(), &self.path, &self.config.login_intent)
        {
            tracing::warn!(path = %self.path, error = %e, "Failed to record login intent");
        }

        tracing::debug!(
            path = %self.path,
            login_path = %self.config.login_path,
            "Redirecting anonymous user to login"
        );

        GuardState::Redirecting {
            login_path: self.config.login_path.clone(),
        }
    }
}
