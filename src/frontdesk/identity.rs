//! HTTP client for the remote identity API.
//!
//! Every method performs exactly one request and never retries. Status codes that carry
//! meaning for a screen are returned to the caller; transport failures surface as errors
//! (or as [`WhoAmI::Unavailable`] for the session lookup).

use crate::APP_USER_AGENT;
use anyhow::{Context, Result};
use reqwest::{header::AUTHORIZATION, Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::instrument;
use url::Url;

/// Account attributes returned by `GET /user`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
}

/// Result of resolving a session token.
#[derive(Debug)]
pub enum WhoAmI {
    /// The API answered `200` with a user record.
    Authenticated(User),
    /// The API answered with any other status.
    Rejected(StatusCode),
    /// The API could not be reached, timed out, or sent an unreadable user record.
    Unavailable(String),
}

#[derive(Debug, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Credentials accepted; carries the new session id.
    Session(String),
    /// No account for the email.
    NotFound,
    /// Wrong password.
    Incorrect,
    /// Any other status.
    Failed(StatusCode),
}

#[derive(Deserialize)]
struct LoginResponse {
    session_id: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DependencyStatus {
    Ok,
    Error,
}

impl DependencyStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Error => "error",
        }
    }

    #[must_use]
    pub const fn is_healthy(self) -> bool {
        matches!(self, Self::Ok)
    }
}

#[derive(Clone, Debug)]
pub struct IdentityClient {
    client: Client,
    base_url: Url,
}

impl IdentityClient {
    /// Build a client whose requests are all bounded by `timeout`.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(timeout)
            .build()
            .context("Error creating reqwest client")?;

        Ok(Self { client, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.as_str().trim_end_matches('/'))
    }

    /// Resolve a session token into a user. Without a token the lookup still happens, just
    /// without an `Authorization` header.
    #[instrument(skip_all)]
    pub async fn whoami(&self, token: Option<&str>) -> WhoAmI {
        let mut request = self.client.get(self.endpoint("/user"));
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => return WhoAmI::Unavailable(err.to_string()),
        };

        let status = response.status();
        if status != StatusCode::OK {
            return WhoAmI::Rejected(status);
        }

        match response.json::<User>().await {
            Ok(user) => WhoAmI::Authenticated(user),
            Err(err) => WhoAmI::Unavailable(format!("invalid user payload: {err}")),
        }
    }

    /// # Errors
    /// Returns an error on transport failure or an unreadable `200` body.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<LoginOutcome> {
        let response = self
            .client
            .post(self.endpoint("/login"))
            .json(&json!({ "email": email, "password": password.expose_secret() }))
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body: LoginResponse = response
                    .json()
                    .await
                    .context("Error parsing login response")?;
                Ok(LoginOutcome::Session(body.session_id))
            }
            StatusCode::NOT_FOUND => Ok(LoginOutcome::NotFound),
            StatusCode::UNAUTHORIZED => Ok(LoginOutcome::Incorrect),
            status => Ok(LoginOutcome::Failed(status)),
        }
    }

    /// # Errors
    /// Returns an error on transport failure.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<StatusCode> {
        let response = self
            .client
            .post(self.endpoint("/register"))
            .json(&json!({
                "name": name,
                "email": email,
                "password": password.expose_secret(),
            }))
            .send()
            .await?;

        Ok(response.status())
    }

    /// # Errors
    /// Returns an error on transport failure.
    #[instrument(skip(self, token))]
    pub async fn update_name(&self, token: &str, name: &str) -> Result<StatusCode> {
        let response = self
            .client
            .patch(self.endpoint("/user"))
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .json(&json!({ "name": name }))
            .send()
            .await?;

        Ok(response.status())
    }

    /// # Errors
    /// Returns an error on transport failure.
    #[instrument(skip(self))]
    pub async fn request_reset(&self, email: &str) -> Result<StatusCode> {
        let response = self
            .client
            .post(self.endpoint("/request-reset"))
            .json(&json!({ "email": email }))
            .send()
            .await?;

        Ok(response.status())
    }

    /// # Errors
    /// Returns an error on transport failure.
    #[instrument(skip_all)]
    pub async fn test_reset_token(&self, token: &str) -> Result<StatusCode> {
        let response = self
            .client
            .post(self.endpoint("/test-reset-token"))
            .json(&json!({ "token": token }))
            .send()
            .await?;

        Ok(response.status())
    }

    /// # Errors
    /// Returns an error on transport failure.
    #[instrument(skip_all)]
    pub async fn reset_password(
        &self,
        reset_token: &str,
        new_password: &SecretString,
    ) -> Result<StatusCode> {
        let response = self
            .client
            .post(self.endpoint("/reset"))
            .json(&json!({
                "reset_token": reset_token,
                "new_password": new_password.expose_secret(),
            }))
            .send()
            .await?;

        Ok(response.status())
    }

    /// Any HTTP answer counts as reachable.
    pub async fn probe(&self) -> DependencyStatus {
        match self.client.get(self.base_url.as_str()).send().await {
            Ok(_) => DependencyStatus::Ok,
            Err(_) => DependencyStatus::Error,
        }
    }
}
