//! HTTP Handlers
//!
//! Pages render through the [`RequestScope`] set up by the session gate;
//! by the time a guarded page runs its guard has already authorized it.

use std::fmt::Write;
use std::sync::Arc;

use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Extension, Json};
use currency::{FormatOptions, RateSource};
use kernel::error::app_error::{AppError, AppResult};
use preferences::{Preferences, Theme, Units};
use session::application::intent::{login_intent, mark_dashboard_visited, take_intended_destination};
use session::{Credentials, IdentityProvider, SessionError};

use crate::dto::{CurrenciesResponse, LoginForm, SessionStatusResponse, SettingsForm};
use crate::middleware::RequestScope;
use crate::state::WebState;
use crate::view::escape;

type Scope<I> = Extension<Arc<RequestScope<I>>>;

/// Carbon credit listings: `(name, USD per tonne)`
const LISTINGS: &[(&str, f64)] = &[
    ("Rainforest protection, Pará", 12.5),
    ("Wind farm, Gujarat", 8.0),
    ("Mangrove restoration, Kwale", 24.0),
    ("Clean cookstoves, Accra", 1250.0),
];

// ============================================================================
// Public pages
// ============================================================================

/// GET /
pub async fn landing<I, R>(State(_): State<WebState<I, R>>, Extension(scope): Scope<I>) -> Response
where
    I: IdentityProvider + Send + Sync + 'static,
    R: RateSource + Send + Sync + 'static,
{
    let body = format!(
        "<section class=\"landing\"><h1>{}</h1><p>{}</p>\
         <p><a href=\"/login\">{}</a> · <a href=\"/signup\">{}</a></p></section>",
        escape(&scope.translate("app.name")),
        escape(&scope.translate("landing.headline")),
        escape(&scope.translate("auth.login")),
        escape(&scope.translate("auth.signup")),
    );
    scope.render(&scope.translate("app.name"), &body).into_response()
}

/// GET /about
pub async fn about<I, R>(State(_): State<WebState<I, R>>, Extension(scope): Scope<I>) -> Response
where
    I: IdentityProvider + Send + Sync + 'static,
    R: RateSource + Send + Sync + 'static,
{
    let body = format!(
        "<h1>{}</h1><p>{}</p>",
        escape(&scope.translate("app.name")),
        escape(&scope.translate("landing.headline")),
    );
    scope.render(&scope.translate("app.name"), &body).into_response()
}

// ============================================================================
// Sign in / out
// ============================================================================

/// GET /login
pub async fn login_page<I, R>(
    State(_): State<WebState<I, R>>,
    Extension(scope): Scope<I>,
) -> Response
where
    I: IdentityProvider + Send + Sync + 'static,
    R: RateSource + Send + Sync + 'static,
{
    let notice =
        login_intent(scope.storage().as_ref()).map(|_| scope.translate("auth.login_required"));
    login_form(&scope, StatusCode::OK, notice.as_deref())
}

/// POST /login
pub async fn login<I, R>(
    State(state): State<WebState<I, R>>,
    Extension(scope): Scope<I>,
    Form(form): Form<LoginForm>,
) -> Response
where
    I: IdentityProvider + Send + Sync + 'static,
    R: RateSource + Send + Sync + 'static,
{
    let credentials = Credentials::new(form.email.trim(), form.password);

    match scope.session.login(&credentials).await {
        Ok(_) => {
            let destination =
                take_intended_destination(scope.storage().as_ref(), &state.session.home_path);
            Redirect::to(&destination).into_response()
        }
        Err(SessionError::AccountLocked) => scope.blocked_response(),
        Err(SessionError::InvalidCredentials | SessionError::BadRequest(_)) => login_form(
            &scope,
            StatusCode::UNAUTHORIZED,
            Some(&scope.translate("auth.invalid_credentials")),
        ),
        Err(e) => {
            let status = StatusCode::from_u16(e.kind().status_code())
                .unwrap_or(StatusCode::SERVICE_UNAVAILABLE);
            login_form(&scope, status, Some(&scope.translate("errors.unavailable")))
        }
    }
}

/// POST /logout
pub async fn logout<I, R>(State(_): State<WebState<I, R>>, Extension(scope): Scope<I>) -> Response
where
    I: IdentityProvider + Send + Sync + 'static,
    R: RateSource + Send + Sync + 'static,
{
    scope.session.logout().await;
    Redirect::to("/").into_response()
}

fn login_form<I>(scope: &RequestScope<I>, status: StatusCode, message: Option<&str>) -> Response
where
    I: IdentityProvider + Send + Sync + 'static,
{
    let message = message
        .map(|m| format!("<p class=\"notice\" role=\"alert\">{}</p>", escape(m)))
        .unwrap_or_default();
    let title = scope.translate("auth.login");
    let body = format!(
        "<section class=\"login\"><h1>{title}</h1>{message}\
         <form method=\"post\" action=\"/login\">\
         <label>{} <input type=\"email\" name=\"email\" required></label>\
         <label>{} <input type=\"password\" name=\"password\" required></label>\
         <button type=\"submit\">{title}</button></form></section>",
        escape(&scope.translate("auth.email")),
        escape(&scope.translate("auth.password")),
        title = escape(&title),
    );
    (status, scope.render(&title, &body)).into_response()
}

// ============================================================================
// Guarded pages
// ============================================================================

/// GET /dashboard
pub async fn dashboard<I, R>(
    State(_): State<WebState<I, R>>,
    Extension(scope): Scope<I>,
) -> Response
where
    I: IdentityProvider + Send + Sync + 'static,
    R: RateSource + Send + Sync + 'static,
{
    let name = scope
        .session
        .snapshot()
        .user
        .map(|u| u.display_name().to_string())
        .unwrap_or_default();
    let preferences = scope.preferences.get();

    let mut body = format!(
        "<h1>{}, {}</h1>",
        escape(&scope.translate("dashboard.welcome")),
        escape(&name)
    );
    if mark_dashboard_visited(&*scope.visits) {
        let _ = write!(
            body,
            "<p class=\"banner\">{}</p>",
            escape(&scope.translate("dashboard.first_visit"))
        );
    }
    let _ = write!(
        body,
        "<section class=\"footprint\"><h2>{}</h2><p>{}</p></section>",
        escape(&scope.translate("dashboard.monthly_footprint")),
        escape(&preferences.units.format_emissions(0.0)),
    );

    scope
        .render(&scope.translate("nav.dashboard"), &body)
        .into_response()
}

/// GET /marketplace
pub async fn marketplace<I, R>(
    State(state): State<WebState<I, R>>,
    Extension(scope): Scope<I>,
) -> Response
where
    I: IdentityProvider + Send + Sync + 'static,
    R: RateSource + Send + Sync + 'static,
{
    let preferences = scope.preferences.get();
    let converter = state.currency.converter(Some(&preferences.currency)).await;
    let options = FormatOptions::default();

    let title = scope.translate("marketplace.title");
    let mut body = format!(
        "<h1>{}</h1><table class=\"listings\"><thead><tr><th></th><th>{}</th></tr></thead><tbody>",
        escape(&title),
        escape(&scope.translate("marketplace.price")),
    );
    for (name, usd_per_tonne) in LISTINGS {
        let _ = write!(
            body,
            "<tr><td>{}</td><td>{}</td></tr>",
            escape(name),
            escape(&converter.format_price(*usd_per_tonne, "USD", &options)),
        );
    }
    body.push_str("</tbody></table>");

    scope.render(&title, &body).into_response()
}

/// GET /settings
pub async fn settings_page<I, R>(
    State(state): State<WebState<I, R>>,
    Extension(scope): Scope<I>,
) -> Response
where
    I: IdentityProvider + Send + Sync + 'static,
    R: RateSource + Send + Sync + 'static,
{
    state.currency.ensure_rates().await;
    settings_form(&state, &scope, None).into_response()
}

/// POST /settings
pub async fn save_settings<I, R>(
    State(state): State<WebState<I, R>>,
    Extension(scope): Scope<I>,
    Form(form): Form<SettingsForm>,
) -> Response
where
    I: IdentityProvider + Send + Sync + 'static,
    R: RateSource + Send + Sync + 'static,
{
    let currency = form.currency.to_ascii_uppercase();
    if let Err(e) = check_choices(&state, &form.language, &currency).await {
        tracing::debug!(error = %e, "Rejected settings form");
        let notice = scope.translate("settings.invalid");
        return (StatusCode::BAD_REQUEST, settings_form(&state, &scope, Some(&notice)))
            .into_response();
    }

    let result = scope.preferences.update(|p| {
        p.theme = form.theme;
        p.language = form.language;
        p.currency = currency;
        p.units = form.units;
    });
    if let Err(e) = result {
        tracing::warn!(error = %e, "Settings saved for this request only");
    }
    Redirect::to("/settings").into_response()
}

/// Language and currency must be ones the app can serve
async fn check_choices<I, R>(
    state: &WebState<I, R>,
    language: &str,
    currency: &str,
) -> AppResult<()>
where
    I: IdentityProvider + Send + Sync + 'static,
    R: RateSource + Send + Sync + 'static,
{
    if !state.catalogs.supports(language) {
        return Err(AppError::bad_request(format!("Unknown language: {language}"))
            .with_action(format!("Use one of: {}", state.catalogs.languages().join(", "))));
    }
    let rates = state.currency.ensure_rates().await;
    if !rates.contains(currency) {
        return Err(AppError::bad_request(format!("Unknown currency: {currency}"))
            .with_action("Pick one of the currencies listed by /api/currencies"));
    }
    Ok(())
}

fn settings_form<I, R>(
    state: &WebState<I, R>,
    scope: &RequestScope<I>,
    notice: Option<&str>,
) -> Html<String>
where
    I: IdentityProvider + Send + Sync + 'static,
    R: RateSource + Send + Sync + 'static,
{
    let current = scope.preferences.get();

    let themes = [Theme::Light, Theme::Dark, Theme::System].map(|t| t.to_string());
    let languages: Vec<String> = state
        .catalogs
        .languages()
        .into_iter()
        .map(str::to_string)
        .collect();
    let currencies = state.currency.available_currencies();
    let units = [Units::Metric, Units::Imperial].map(|u| u.to_string());

    let title = scope.translate("settings.title");
    let notice = notice
        .map(|n| format!("<p class=\"notice error\">{}</p>", escape(n)))
        .unwrap_or_default();
    let body = format!(
        "<h1>{}</h1>{notice}<form method=\"post\" action=\"/settings\">{}{}{}{}\
         <button type=\"submit\">{}</button></form>",
        escape(&title),
        select(&scope.translate("settings.theme"), "theme", &themes, &current.theme.to_string()),
        select(&scope.translate("settings.language"), "language", &languages, &current.language),
        select(&scope.translate("settings.currency"), "currency", &currencies, &current.currency),
        select(&scope.translate("settings.units"), "units", &units, &current.units.to_string()),
        escape(&scope.translate("settings.save")),
    );

    scope.render(&title, &body)
}

/// GET /admin
pub async fn admin<I, R>(State(state): State<WebState<I, R>>, Extension(scope): Scope<I>) -> Response
where
    I: IdentityProvider + Send + Sync + 'static,
    R: RateSource + Send + Sync + 'static,
{
    let title = scope.translate("admin.title");
    let is_admin = scope.session.snapshot().user.is_some_and(|u| u.is_admin());
    if !is_admin {
        let body = format!("<h1>{}</h1>", escape(&scope.translate("admin.forbidden")));
        return (StatusCode::FORBIDDEN, scope.render(&title, &body)).into_response();
    }

    let updated = state
        .currency
        .last_updated()
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "never".to_string());
    let body = format!(
        "<h1>{}</h1><dl>\
         <dt>Currencies</dt><dd>{}</dd>\
         <dt>Rates updated</dt><dd>{}</dd>\
         <dt>Fallback rates</dt><dd>{}</dd>\
         <dt>Languages</dt><dd>{}</dd></dl>",
        escape(&title),
        escape(&state.currency.available_currencies().join(", ")),
        escape(&updated),
        state.currency.is_fallback(),
        escape(&state.catalogs.languages().join(", ")),
    );
    scope.render(&title, &body).into_response()
}

/// Anything unrouted; guarded prefixes have been through their guard
pub async fn not_found<I, R>(
    State(_): State<WebState<I, R>>,
    Extension(scope): Scope<I>,
) -> Response
where
    I: IdentityProvider + Send + Sync + 'static,
    R: RateSource + Send + Sync + 'static,
{
    let title = scope.translate("errors.not_found");
    let body = format!("<h1>{}</h1>", escape(&title));
    (StatusCode::NOT_FOUND, scope.render(&title, &body)).into_response()
}

fn select(label: &str, name: &str, options: &[String], selected: &str) -> String {
    let mut html = format!("<label>{} <select name=\"{name}\">", escape(label));
    for option in options {
        let mark = if option.eq_ignore_ascii_case(selected) {
            " selected"
        } else {
            ""
        };
        let _ = write!(
            html,
            "<option value=\"{0}\"{mark}>{0}</option>",
            escape(option)
        );
    }
    html.push_str("</select></label>");
    html
}

// ============================================================================
// JSON API
// ============================================================================

/// GET /api/session
pub async fn session_status<I, R>(
    State(_): State<WebState<I, R>>,
    Extension(scope): Scope<I>,
) -> Json<SessionStatusResponse>
where
    I: IdentityProvider + Send + Sync + 'static,
    R: RateSource + Send + Sync + 'static,
{
    let snapshot = scope.session.snapshot();
    Json(SessionStatusResponse {
        authenticated: snapshot.is_authenticated(),
        is_locked: snapshot.is_locked,
        user: snapshot.user,
    })
}

/// GET /api/preferences
pub async fn get_preferences<I, R>(
    State(_): State<WebState<I, R>>,
    Extension(scope): Scope<I>,
) -> Json<Preferences>
where
    I: IdentityProvider + Send + Sync + 'static,
    R: RateSource + Send + Sync + 'static,
{
    Json(scope.preferences.get())
}

/// POST /api/preferences
pub async fn update_preferences<I, R>(
    State(state): State<WebState<I, R>>,
    Extension(scope): Scope<I>,
    Json(mut preferences): Json<Preferences>,
) -> AppResult<Json<Preferences>>
where
    I: IdentityProvider + Send + Sync + 'static,
    R: RateSource + Send + Sync + 'static,
{
    preferences.currency = preferences.currency.to_ascii_uppercase();
    check_choices(&state, &preferences.language, &preferences.currency).await?;

    if let Err(e) = scope.preferences.set(preferences) {
        tracing::warn!(error = %e, "Preferences kept for this request only");
    }
    Ok(Json(scope.preferences.get()))
}

/// GET /api/currencies
pub async fn currencies<I, R>(State(state): State<WebState<I, R>>) -> Json<CurrenciesResponse>
where
    I: IdentityProvider + Send + Sync + 'static,
    R: RateSource + Send + Sync + 'static,
{
    state.currency.ensure_rates().await;
    Json(CurrenciesResponse {
        currencies: state.currency.available_currencies(),
        last_updated: state.currency.last_updated().map(|t| t.to_rfc3339()),
        fallback: state.currency.is_fallback(),
    })
}
