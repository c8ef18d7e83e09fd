//! Bearer-token sessions with proactive re-authentication.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};
use tradebot_core::error::AuthError;

/// Access token plus its expiry.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Check whether the token expires within `margin` of `now`.
    pub fn is_stale_at(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        now + margin >= self.expires_at
    }
}

/// Exchanges credentials for an access token.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn login(&self) -> Result<AccessToken, AuthError>;
}

/// Caches a token and logs in again before it expires.
///
/// The lock is held across the login call, so concurrent callers wait for
/// the refresh instead of logging in twice.
pub struct TokenSession<A: Authenticator> {
    authenticator: A,
    token: Mutex<Option<AccessToken>>,
    refresh_margin: Duration,
}

impl<A: Authenticator> TokenSession<A> {
    /// Create a session with a 30 second refresh margin.
    pub fn new(authenticator: A) -> Self {
        Self {
            authenticator,
            token: Mutex::new(None),
            refresh_margin: Duration::seconds(30),
        }
    }

    /// Set how long before expiry a token is refreshed.
    pub fn with_refresh_margin(mut self, margin: Duration) -> Self {
        self.refresh_margin = margin;
        self
    }

    /// Bearer token valid right now, logging in if needed.
    pub async fn bearer(&self) -> Result<String, AuthError> {
        self.bearer_at(Utc::now()).await
    }

    /// Bearer token valid at `now`, logging in if needed.
    pub async fn bearer_at(&self, now: DateTime<Utc>) -> Result<String, AuthError> {
        let mut guard = self.token.lock().await;

        if let Some(token) = guard.as_ref() {
            if !token.is_stale_at(now, self.refresh_margin) {
                return Ok(token.value.clone());
            }
            info!(expires_at = %token.expires_at, "Access token stale, re-authenticating");
        }

        let token = self.authenticator.login().await?;
        debug!(expires_at = %token.expires_at, "Access token refreshed");
        let value = token.value.clone();
        *guard = Some(token);
        Ok(value)
    }

    /// Drop the cached token so the next call logs in.
    pub async fn invalidate(&self) {
        *self.token.lock().await = None;
    }
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: String,
    /// Lifetime in seconds
    expires_in: i64,
}

/// Username/password login against a token endpoint.
pub struct PasswordAuthenticator {
    client: Client,
    token_url: String,
    username: String,
    password: String,
}

impl PasswordAuthenticator {
    pub fn new(
        client: Client,
        token_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            client,
            token_url: token_url.into(),
            username: username.into(),
            password: password.into(),
        }
    }
}

#[async_trait]
impl Authenticator for PasswordAuthenticator {
    async fn login(&self) -> Result<AccessToken, AuthError> {
        let body = LoginRequest {
            username: &self.username,
            password: &self.password,
        };

        let resp = self
            .client
            .post(&self.token_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(AuthError::LoginFailed(format!("{}: {}", status, text)));
        }

        let data: LoginResponse = resp
            .json()
            .await
            .map_err(|e| AuthError::LoginFailed(e.to_string()))?;

        Ok(AccessToken {
            value: data.access_token,
            expires_at: Utc::now() + Duration::seconds(data.expires_in),
        })
    }
}
