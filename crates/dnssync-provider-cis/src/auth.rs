//! IAM API-key authentication
//!
//! Exchanges the API key for a short-lived bearer token and caches it
//! until shortly before it expires. One authenticator is shared by every
//! zone client built from the same configuration.

use crate::api::{status_error, IamToken};
use dnssync_core::{Error, Result};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

const IAM_GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";

struct CachedToken {
    access_token: String,
    refresh_at: Instant,
}

/// Bearer token source backed by the IAM token endpoint
///
/// The Debug implementation does NOT expose the API key or token.
pub struct IamAuthenticator {
    /// ⚠️ NEVER log this value
    api_key: String,
    url: String,
    http: reqwest::Client,
    token: Mutex<Option<CachedToken>>,
}

impl std::fmt::Debug for IamAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IamAuthenticator")
            .field("api_key", &"<REDACTED>")
            .field("url", &self.url)
            .finish()
    }
}

impl IamAuthenticator {
    /// Create an authenticator
    ///
    /// # Errors
    ///
    /// Fails fast if the API key is empty.
    pub fn new(api_key: impl Into<String>, url: impl Into<String>, http: reqwest::Client) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(Error::config("IAM API key cannot be empty"));
        }

        Ok(Self {
            api_key,
            url: url.into(),
            http,
            token: Mutex::new(None),
        })
    }

    /// Return a valid bearer token, fetching a new one if needed
    pub async fn token(&self) -> Result<String> {
        let mut guard = self.token.lock().await;

        if let Some(cached) = guard.as_ref()
            && Instant::now() < cached.refresh_at
        {
            return Ok(cached.access_token.clone());
        }

        let fresh = self.request_token().await?;
        let access_token = fresh.access_token.clone();
        *guard = Some(CachedToken {
            access_token: fresh.access_token,
            refresh_at: Instant::now() + refresh_after(fresh.expires_in),
        });

        Ok(access_token)
    }

    /// Drop the cached token so the next call fetches a fresh one
    ///
    /// Called when CIS rejects the token before its expiry.
    pub async fn invalidate(&self) {
        if self.token.lock().await.take().is_some() {
            debug!("Discarded cached IAM token");
        }
    }

    async fn request_token(&self) -> Result<IamToken> {
        debug!("Requesting IAM token from {}", self.url);

        let response = self
            .http
            .post(&self.url)
            .header("Accept", "application/json")
            .form(&[("grant_type", IAM_GRANT_TYPE), ("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| Error::http(format!("IAM token request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());

        if !status.is_success() {
            return Err(status_error(status, &body, "IAM token request"));
        }

        serde_json::from_str(&body)
            .map_err(|e| Error::auth(format!("Failed to parse IAM token response: {}", e)))
    }
}

/// Refresh once 80% of the token lifetime has passed
fn refresh_after(expires_in: u64) -> Duration {
    Duration::from_secs(expires_in.saturating_mul(4) / 5)
}
