//! Session Gate Middleware
//!
//! Runs on every request, before any page handler:
//! 1. opens the cookie-backed client storage and the per-request stores
//! 2. resolves the session, bounded by the configured timeout
//! 3. asks the layout gate for a render branch
//! 4. runs the auth guard on pages that carry one
//!
//! Handlers receive the resulting [`RequestScope`] as an extension. Cookie
//! writes made anywhere in the request are flushed onto the response here.

use std::any::Any;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::middleware::Next;
use axum::response::{Html, IntoResponse, Redirect, Response};
use currency::RateSource;
use platform::ClientStorage;
use platform::cookie::CookieStorage;
use preferences::{ColorScheme, PreferenceStore, ThemeFlag, apply_theme};
use session::{
    AuthGuard, GuardState, IdentityProvider, LayoutDecision, SessionContext, SessionState,
};

use crate::state::WebState;
use crate::view::{self, Chrome, PageFrame};

/// Client hint carrying the system color scheme
pub const COLOR_SCHEME_HINT: &str = "sec-ch-prefers-color-scheme";

/// Whether the page body is wrapped in the navigation chrome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    Bare,
    Chrome,
}

/// Per-request stores, shared with handlers
pub struct RequestScope<I>
where
    I: IdentityProvider + Send + Sync + 'static,
{
    pub session: SessionContext<I>,
    pub preferences: PreferenceStore,
    /// Cookies that expire with the browser session
    pub visits: Arc<CookieStorage>,
    pub frame: Frame,
    pub system_scheme: ColorScheme,
    pub path: String,
    durable: Arc<CookieStorage>,
}

impl<I> RequestScope<I>
where
    I: IdentityProvider + Send + Sync + 'static,
{
    fn open<R>(state: &WebState<I, R>, headers: &HeaderMap, path: &str) -> Self
    where
        R: RateSource + Send + Sync + 'static,
    {
        let durable = Arc::new(CookieStorage::from_headers(headers, state.cookies.clone()));
        let visits = Arc::new(CookieStorage::from_headers(
            headers,
            state.cookies.session_scoped(),
        ));

        let system_scheme = headers
            .get(COLOR_SCHEME_HINT)
            .and_then(|v| v.to_str().ok())
            .and_then(ColorScheme::from_client_hint)
            .unwrap_or_default();

        Self {
            session: SessionContext::new(state.identity.clone(), durable.clone()),
            preferences: PreferenceStore::load(durable.clone(), state.catalogs.clone()),
            visits,
            frame: Frame::Bare,
            system_scheme,
            path: path.to_string(),
            durable,
        }
    }

    /// Durable client storage (the cookie jar)
    pub fn storage(&self) -> Arc<dyn ClientStorage> {
        self.durable.clone()
    }

    pub fn translate(&self, key: &str) -> String {
        self.preferences.translate(key)
    }

    pub fn language(&self) -> String {
        self.preferences.get().language
    }

    /// Effective dark mode for this request
    pub fn is_dark(&self) -> bool {
        let flag = ThemeFlag::default();
        apply_theme(self.preferences.get().theme, self.system_scheme, &flag);
        flag.is_dark()
    }

    pub fn page_frame(&self) -> PageFrame {
        let chrome = match (self.frame, self.session.snapshot().user) {
            (Frame::Chrome, Some(user)) => {
                Some(Chrome::new(user.display_name(), |key| self.translate(key)))
            }
            _ => None,
        };

        PageFrame {
            language: self.language(),
            dark: self.is_dark(),
            path: self.path.clone(),
            app_name: self.translate("app.name"),
            chrome,
        }
    }

    /// Render a page body inside the frame chosen for this request
    pub fn render(&self, title: &str, body: &str) -> Html<String> {
        Html(self.page_frame().render(title, body))
    }

    pub fn loading_response(&self) -> Response {
        let html = view::loading(&self.language(), self.is_dark(), &self.translate("app.loading"));
        Html(html).into_response()
    }

    pub fn blocked_response(&self) -> Response {
        let html = view::blocked(
            &self.language(),
            self.is_dark(),
            &self.translate("auth.blocked_title"),
            &self.translate("auth.blocked_body"),
        );
        (StatusCode::LOCKED, Html(html)).into_response()
    }

    /// Flush cookie writes and advertise the color-scheme hint
    fn finish(&self, response: &mut Response) {
        let headers = response.headers_mut();
        self.durable.apply_to(headers);
        self.visits.apply_to(headers);
        headers.insert(
            header::HeaderName::from_static("accept-ch"),
            HeaderValue::from_static("Sec-CH-Prefers-Color-Scheme"),
        );
        headers.append(
            header::VARY,
            HeaderValue::from_static("Sec-CH-Prefers-Color-Scheme"),
        );
    }
}

pub async fn session_gate<I, R>(
    State(state): State<WebState<I, R>>,
    mut req: Request,
    next: Next,
) -> Response
where
    I: IdentityProvider + Send + Sync + 'static,
    R: RateSource + Send + Sync + 'static,
{
    let path = req.uri().path().to_string();
    let destination = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| path.clone());

    let mut scope = RequestScope::open(&state, req.headers(), &path);
    let snapshot = scope
        .session
        .resolve_within(state.session.resolve_timeout)
        .await;

    let decision = state.gate.decide(&path, &snapshot);
    tracing::debug!(
        path = %path,
        ?decision,
        loading = snapshot.is_loading,
        "Layout decision"
    );

    let early = match decision {
        LayoutDecision::Loading => Some(scope.loading_response()),
        LayoutDecision::RedirectHome { to } => Some(Redirect::to(&to).into_response()),
        LayoutDecision::WithLayout => {
            scope.frame = Frame::Chrome;
            None
        }
        LayoutDecision::Unwrapped => None,
    };

    let early = match early {
        Some(response) => Some(response),
        None if state.gate.table().requires_guard(&path) => {
            run_guard(&state, &mut scope, &destination, &snapshot)
        }
        None => None,
    };

    if let Some(mut response) = early {
        scope.finish(&mut response);
        return response;
    }

    let scope = Arc::new(scope);
    req.extensions_mut().insert(scope.clone());

    let mut response = next.run(req).await;
    scope.finish(&mut response);
    response
}

/// Guarded page: settle a fresh guard on the resolved snapshot
fn run_guard<I, R>(
    state: &WebState<I, R>,
    scope: &mut RequestScope<I>,
    destination: &str,
    snapshot: &SessionState,
) -> Option<Response>
where
    I: IdentityProvider + Send + Sync + 'static,
    R: RateSource + Send + Sync + 'static,
{
    let mut guard = AuthGuard::new(destination, scope.storage(), state.session.clone());
    match guard.observe(snapshot) {
        GuardState::Checking => Some(scope.loading_response()),
        GuardState::Blocked => Some(scope.blocked_response()),
        GuardState::Redirecting { login_path } => Some(Redirect::to(&login_path).into_response()),
        GuardState::Authorized => {
            scope.frame = Frame::Chrome;
            None
        }
    }
}

/// Error boundary: a panicking page renders a fallback with a retry link
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };

    tracing::error!(panic_message = %message, "Page handler panicked");

    let html = view::error_fallback("Something went wrong", "Try again");
    (StatusCode::INTERNAL_SERVER_ERROR, Html(html)).into_response()
}
