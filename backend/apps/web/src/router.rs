//! Web Router

use axum::http::{HeaderValue, Method, header};
use axum::{
    Router, middleware,
    routing::{get, post},
};
use currency::RateSource;
use session::IdentityProvider;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::{handle_panic, session_gate};
use crate::state::WebState;

pub fn web_router<I, R>(state: WebState<I, R>, allowed_origins: &[String]) -> Router
where
    I: IdentityProvider + Send + Sync + 'static,
    R: RateSource + Send + Sync + 'static,
{
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([header::CONTENT_TYPE, header::ACCEPT]))
        .allow_credentials(true);

    let api = Router::new()
        .route("/session", get(handlers::session_status::<I, R>))
        .route(
            "/preferences",
            get(handlers::get_preferences::<I, R>).post(handlers::update_preferences::<I, R>),
        )
        .route("/currencies", get(handlers::currencies::<I, R>))
        .layer(cors);

    Router::new()
        .route("/", get(handlers::landing::<I, R>))
        .route("/about", get(handlers::about::<I, R>))
        .route(
            "/login",
            get(handlers::login_page::<I, R>).post(handlers::login::<I, R>),
        )
        .route("/logout", post(handlers::logout::<I, R>))
        .route("/dashboard", get(handlers::dashboard::<I, R>))
        .route("/marketplace", get(handlers::marketplace::<I, R>))
        .route(
            "/settings",
            get(handlers::settings_page::<I, R>).post(handlers::save_settings::<I, R>),
        )
        .route("/admin", get(handlers::admin::<I, R>))
        .nest("/api", api)
        .fallback(handlers::not_found::<I, R>)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_gate::<I, R>,
        ))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, Response, StatusCode};
    use currency::{CurrencyConfig, CurrencyService, StaticRateSource};
    use platform::cookie::CookieConfig;
    use session::{InMemoryIdentityProvider, SessionConfig};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    fn app_with(identity: Arc<InMemoryIdentityProvider>, session: SessionConfig) -> Router {
        let cookies = CookieConfig {
            secure: false,
            ..Default::default()
        };
        let currency = CurrencyService::new(StaticRateSource::fallback(), CurrencyConfig::default());
        let state = WebState::new(identity, currency, session, cookies);
        web_router(state, &[])
    }

    fn app() -> Router {
        app_with(
            Arc::new(InMemoryIdentityProvider::with_demo_accounts()),
            SessionConfig::default(),
        )
    }

    fn get(uri: &str, cookies: &str) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if !cookies.is_empty() {
            builder = builder.header(header::COOKIE, cookies);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, cookies: &str, form: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if !cookies.is_empty() {
            builder = builder.header(header::COOKIE, cookies);
        }
        builder.body(Body::from(form.to_string())).unwrap()
    }

    /// `name=value` pairs from Set-Cookie headers, deletions dropped
    fn cookie_jar(response: &Response<Body>) -> String {
        response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| v.split(';').next())
            .filter(|pair| !pair.ends_with('='))
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn location(response: &Response<Body>) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    async fn body(response: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn sign_in(app: &Router, email: &str, password: &str) -> Response<Body> {
        app.clone()
            .oneshot(post_form(
                "/login",
                "",
                &format!("email={email}&password={password}"),
            ))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_anonymous_root_shows_landing() {
        let response = app().oneshot(get("/", "")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body(response).await;
        assert!(html.contains("Measure, reduce and offset"));
        assert!(!html.contains("app-nav"));
    }

    #[tokio::test]
    async fn test_anonymous_guarded_page_redirects_with_destination() {
        let response = app().oneshot(get("/marketplace", "")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login");

        let set_cookies: Vec<_> = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();
        assert!(set_cookies.iter().any(|c| c.starts_with("intendedDestination=")));
        assert!(set_cookies.iter().any(|c| c.starts_with("loginIntent=")));
    }

    #[tokio::test]
    async fn test_login_returns_to_intended_destination() {
        let app = app();
        let redirect = app.clone().oneshot(get("/marketplace", "")).await.unwrap();
        let jar = cookie_jar(&redirect);

        let response = app
            .clone()
            .oneshot(post_form(
                "/login",
                &jar,
                "email=demo%40carbon.app&password=demo123",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/marketplace");
        assert!(cookie_jar(&response).contains("authToken="));
    }

    #[tokio::test]
    async fn test_signed_in_guarded_page_has_layout() {
        let app = app();
        let login = sign_in(&app, "demo%40carbon.app", "demo123").await;
        assert_eq!(location(&login), "/dashboard");
        let jar = cookie_jar(&login);

        let response = app.clone().oneshot(get("/marketplace", &jar)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body(response).await;
        assert!(html.contains("app-nav"));
        assert!(html.contains("$12.50"));
    }

    #[tokio::test]
    async fn test_signed_in_root_redirects_home() {
        let app = app();
        let jar = cookie_jar(&sign_in(&app, "demo%40carbon.app", "demo123").await);

        let response = app.oneshot(get("/", &jar)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/dashboard");
    }

    #[tokio::test]
    async fn test_default_page_layout_follows_session() {
        let app = app();
        let anonymous = body(app.clone().oneshot(get("/about", "")).await.unwrap()).await;
        assert!(!anonymous.contains("app-nav"));

        let jar = cookie_jar(&sign_in(&app, "demo%40carbon.app", "demo123").await);
        let signed_in = body(app.oneshot(get("/about", &jar)).await.unwrap()).await;
        assert!(signed_in.contains("app-nav"));
    }

    #[tokio::test]
    async fn test_login_page_never_has_layout() {
        let app = app();
        let jar = cookie_jar(&sign_in(&app, "demo%40carbon.app", "demo123").await);
        let html = body(app.oneshot(get("/login", &jar)).await.unwrap()).await;
        assert!(!html.contains("app-nav"));
    }

    #[tokio::test]
    async fn test_invalid_credentials_rerender_form() {
        let response = sign_in(&app(), "demo%40carbon.app", "nope").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(body(response).await.contains("Invalid email or password"));
    }

    #[tokio::test]
    async fn test_locked_account_sees_blocked_screen() {
        let response = sign_in(&app(), "locked%40carbon.app", "locked123").await;
        assert_eq!(response.status(), StatusCode::LOCKED);
        assert!(body(response).await.contains("Account blocked"));
    }

    #[tokio::test]
    async fn test_account_locked_after_sign_in_is_blocked_on_guarded_pages() {
        let identity = Arc::new(InMemoryIdentityProvider::with_demo_accounts());
        let app = app_with(identity.clone(), SessionConfig::default());
        let jar = cookie_jar(&sign_in(&app, "demo%40carbon.app", "demo123").await);

        identity.set_locked("demo@carbon.app", true);
        let response = app.oneshot(get("/dashboard", &jar)).await.unwrap();
        assert_eq!(response.status(), StatusCode::LOCKED);
    }

    #[tokio::test]
    async fn test_slow_identity_service_shows_loading() {
        let identity = Arc::new(
            InMemoryIdentityProvider::with_demo_accounts()
                .with_latency(Duration::from_millis(200)),
        );
        let session = SessionConfig {
            resolve_timeout: Duration::from_millis(10),
            ..Default::default()
        };
        let app = app_with(identity, session);

        let response = app
            .oneshot(get("/", "authToken=c29tZS10b2tlbg"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body(response).await.contains("http-equiv=\"refresh\""));
    }

    #[tokio::test]
    async fn test_admin_requires_admin_role() {
        let app = app();
        let jar = cookie_jar(&sign_in(&app, "demo%40carbon.app", "demo123").await);
        let response = app.clone().oneshot(get("/admin", &jar)).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let jar = cookie_jar(&sign_in(&app, "admin%40carbon.app", "admin123").await);
        let response = app.oneshot(get("/admin", &jar)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_logout_clears_token() {
        let app = app();
        let jar = cookie_jar(&sign_in(&app, "demo%40carbon.app", "demo123").await);

        let response = app
            .clone()
            .oneshot(post_form("/logout", &jar, ""))
            .await
            .unwrap();
        assert_eq!(location(&response), "/");
        let deleted = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .any(|c| c.starts_with("authToken=;"));
        assert!(deleted);
    }

    #[tokio::test]
    async fn test_dashboard_first_visit_banner_once() {
        let app = app();
        let jar = cookie_jar(&sign_in(&app, "demo%40carbon.app", "demo123").await);

        let first = app.clone().oneshot(get("/dashboard", &jar)).await.unwrap();
        let visit_cookie = cookie_jar(&first);
        assert!(visit_cookie.contains("dashboardVisited="));
        assert!(body(first).await.contains("class=\"banner\""));

        let jar = format!("{jar}; {visit_cookie}");
        let second = app.oneshot(get("/dashboard", &jar)).await.unwrap();
        assert!(!body(second).await.contains("class=\"banner\""));
    }

    #[tokio::test]
    async fn test_preferences_round_trip_through_cookie() {
        let app = app();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/preferences")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"theme":"dark","language":"es","currency":"eur"}"#))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let jar = cookie_jar(&response);
        assert!(jar.contains("userPreferences="));

        let json: serde_json::Value =
            serde_json::from_str(&body(app.clone().oneshot(get("/api/preferences", &jar)).await.unwrap()).await)
                .unwrap();
        assert_eq!(json["currency"], "EUR");
        assert_eq!(json["language"], "es");
        assert_eq!(json["units"], "metric");

        let html = body(app.oneshot(get("/about", &jar)).await.unwrap()).await;
        assert!(html.contains("class=\"dark\""));
        assert!(html.contains("lang=\"es\""));
    }

    #[tokio::test]
    async fn test_unknown_currency_rejected() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/preferences")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"currency":"XYZ"}"#))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_language_rejected() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/preferences")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"language":"zz"}"#))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_settings_form_saves_valid_choices() {
        let app = app();
        let jar = cookie_jar(&sign_in(&app, "demo%40carbon.app", "demo123").await);

        let response = app
            .clone()
            .oneshot(post_form(
                "/settings",
                &jar,
                "theme=dark&language=es&currency=eur&units=imperial",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/settings");

        let jar = format!("{jar}; {}", cookie_jar(&response));
        let json: serde_json::Value =
            serde_json::from_str(&body(app.oneshot(get("/api/preferences", &jar)).await.unwrap()).await)
                .unwrap();
        assert_eq!(json["currency"], "EUR");
        assert_eq!(json["language"], "es");
        assert_eq!(json["units"], "imperial");
    }

    #[tokio::test]
    async fn test_settings_form_rejects_unknown_choices() {
        let app = app();
        let jar = cookie_jar(&sign_in(&app, "demo%40carbon.app", "demo123").await);

        for form in [
            "theme=dark&language=zz&currency=USD&units=metric",
            "theme=dark&language=en&currency=XYZ&units=metric",
        ] {
            let response = app
                .clone()
                .oneshot(post_form("/settings", &jar, form))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{form}");
            assert!(!cookie_jar(&response).contains("userPreferences="), "{form}");
            assert!(body(response).await.contains("not available"), "{form}");
        }
    }

    #[tokio::test]
    async fn test_system_theme_follows_client_hint() {
        let request = Request::builder()
            .uri("/about")
            .header("Sec-CH-Prefers-Color-Scheme", "\"dark\"")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert!(response.headers().contains_key("accept-ch"));
        assert!(body(response).await.contains("class=\"dark\""));
    }

    #[tokio::test]
    async fn test_currencies_endpoint() {
        let response = app().oneshot(get("/api/currencies", "")).await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&body(response).await).unwrap();
        assert_eq!(json["currencies"], serde_json::json!(["EUR", "GBP", "INR", "USD"]));
        assert_eq!(json["fallback"], false);
    }

    #[tokio::test]
    async fn test_unrouted_guarded_prefix_still_guarded() {
        let response = app().oneshot(get("/community/events", "")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login");
    }

    async fn boom() -> &'static str {
        panic!("boom")
    }

    #[tokio::test]
    async fn test_panicking_page_renders_fallback() {
        let app: Router = Router::new()
            .route("/boom", axum::routing::get(boom))
            .layer(CatchPanicLayer::custom(handle_panic));
        let response = app.oneshot(get("/boom", "")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body(response).await.contains("Try again"));
    }
}
