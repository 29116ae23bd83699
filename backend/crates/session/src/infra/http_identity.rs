//! HTTP Identity Provider
//!
//! Talks to the identity service:
//! - `GET  {base}/api/auth/me`     bearer token → user
//! - `POST {base}/api/auth/login`  `{email, password}` → `{token, user}`
//! - `POST {base}/api/auth/logout` bearer token

use platform::http_client::{HttpClientConfig, HttpClientError, build_client, join_url};
use reqwest::StatusCode;
use serde::Deserialize;

use crate::domain::identity::{Credentials, IdentityProvider, LoginOutput};
use crate::domain::user::User;
use crate::error::{SessionError, SessionResult};

/// Error code the identity service uses for blocked accounts
const ACCOUNT_LOCKED_CODE: &str = "ACCOUNT_LOCKED";

#[derive(Debug, Clone)]
pub struct HttpIdentityConfig {
    pub base_url: String,
    pub me_path: String,
    pub login_path: String,
    pub logout_path: String,
    pub http: HttpClientConfig,
}

impl HttpIdentityConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            me_path: "/api/auth/me".to_string(),
            login_path: "/api/auth/login".to_string(),
            logout_path: "/api/auth/logout".to_string(),
            http: HttpClientConfig::default(),
        }
    }
}

/// Structured error body returned by the identity service
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default, alias = "error")]
    message: Option<String>,
}

#[derive(Clone)]
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    config: HttpIdentityConfig,
}

impl HttpIdentityProvider {
    pub fn new(config: HttpIdentityConfig) -> Result<Self, HttpClientError> {
        let client = build_client(&config.http)?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.config.base_url, path)
    }

    /// Map a non-success response onto a session error
    async fn failure(response: reqwest::Response) -> SessionError {
        let status = response.status();
        let body: ErrorBody = response.json().await.unwrap_or_default();
        classify_failure(status, body)
    }
}

fn classify_failure(status: StatusCode, body: ErrorBody) -> SessionError {
    let locked = body.code.as_deref() == Some(ACCOUNT_LOCKED_CODE);
    match status {
        StatusCode::LOCKED => SessionError::AccountLocked,
        StatusCode::FORBIDDEN if locked => SessionError::AccountLocked,
        StatusCode::UNAUTHORIZED => SessionError::Unauthorized,
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => SessionError::BadRequest(
            body.message.unwrap_or_else(|| "invalid request".to_string()),
        ),
        status => SessionError::UnexpectedResponse(format!("status {}", status.as_u16())),
    }
}

impl IdentityProvider for HttpIdentityProvider {
    async fn whoami(&self, token: &str) -> SessionResult<User> {
        let response = self
            .client
            .get(self.url(&self.config.me_path))
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::failure(response).await);
        }

        let user: User = response.json().await?;
        Ok(user)
    }

    async fn login(&self, credentials: &Credentials) -> SessionResult<LoginOutput> {
        let response = self
            .client
            .post(self.url(&self.config.login_path))
            .json(credentials)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(match Self::failure(response).await {
                // On the login endpoint 401 means wrong email or password
                SessionError::Unauthorized => SessionError::InvalidCredentials,
                other => other,
            });
        }

        let output: LoginOutput = response.json().await?;
        Ok(output)
    }

    async fn logout(&self, token: &str) -> SessionResult<()> {
        let response = self
            .client
            .post(self.url(&self.config.logout_path))
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::failure(response).await);
        }
        Ok(())
    }
}
