//! Authentication backend client.
//!
//! The backend contract is `POST {email, password}` returning an access
//! token and the user's identity. When no endpoint is configured, `login`
//! mints a short-lived local demo token instead so the scaffold works end
//! to end without a server.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth::token::demo_token;
use crate::auth::validate::Credentials;
use crate::auth::Identity;

use super::ApiError;

/// HTTP request timeout in seconds.
/// 30s allows for slow backends while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Lifetime of locally minted demo tokens, matching a typical backend's
/// access-token TTL.
const DEMO_TOKEN_TTL_MINUTES: i64 = 30;

/// Identity attached to demo sign-ins when no backend is configured.
const DEMO_USER_NAME: &str = "Dia Azzawi";
const DEMO_USER_UID: i64 = 123456;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Successful login payload from the backend.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    pub user: Identity,
}

/// Client for the authentication backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct AuthClient {
    client: reqwest::Client,
    login_url: Option<String>,
}

impl AuthClient {
    /// Create a new client. `login_url` of `None` selects the local stub.
    pub fn new(login_url: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client, login_url })
    }

    /// Authenticate against the backend. This is the one suspending
    /// operation in the sign-in flow; the caller disables the submit action
    /// for its duration.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        match &self.login_url {
            Some(url) => self.login_remote(url, credentials).await,
            None => {
                debug!("no backend configured, minting demo token");
                Ok(LoginResponse {
                    access_token: demo_token(
                        Utc::now() + chrono::Duration::minutes(DEMO_TOKEN_TTL_MINUTES),
                    )
                    .value,
                    user: Identity {
                        name: DEMO_USER_NAME.to_string(),
                        uid: DEMO_USER_UID,
                    },
                })
            }
        }
    }

    async fn login_remote(
        &self,
        url: &str,
        credentials: &Credentials,
    ) -> Result<LoginResponse, ApiError> {
        let response = self
            .client
            .post(url)
            .json(&LoginRequest {
                email: &credentials.email,
                password: &credentials.password,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }

        response
            .json::<LoginResponse>()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }
}
