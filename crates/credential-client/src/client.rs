//! Reqwest-backed implementation of the credential API.

use crate::{ApiError, ApiResult, CredentialApi, IdentityProfile, RefreshOutcome};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, warn};

/// Timeout for `POST /refresh`.
pub const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for `POST /logout`.
pub const DEFAULT_LOGOUT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the credential API.
///
/// Holds the cookie jar the credential travels in; the cookie value is
/// never read, only sent back by reqwest on subsequent calls.
#[derive(Clone)]
pub struct CredentialClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl CredentialClient {
    /// Create a new client for the given API base URL.
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        let base_url = base_url.into();

        // Validate early so a bad config fails at construction, not on
        // the first revalidation.
        url::Url::parse(&base_url)?;

        let http_client = reqwest::Client::builder().cookie_store(true).build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn map_send_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Http(e)
    }
}

#[async_trait]
impl CredentialApi for CredentialClient {
    async fn fetch_identity(&self, timeout: Duration) -> ApiResult<IdentityProfile> {
        let url = self.endpoint("/identity");
        debug!(url = %url, timeout_ms = timeout.as_millis() as u64, "Fetching identity");

        let response = self
            .http_client
            .get(&url)
            .timeout(timeout)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = %status, "Identity fetch rejected");
            return Err(ApiError::Status { status, body });
        }

        let profile: IdentityProfile = response
            .json()
            .await
            .map_err(|e| ApiError::MalformedResponse(e.to_string()))?;

        debug!(user_id = %profile.user_id, "Identity fetched");
        Ok(profile)
    }

    async fn refresh(&self) -> RefreshOutcome {
        let url = self.endpoint("/refresh");
        debug!(url = %url, "Refreshing credential");

        let response = match self
            .http_client
            .post(&url)
            .timeout(DEFAULT_REFRESH_TIMEOUT)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "Credential refresh failed at network level");
                return RefreshOutcome::TransientFailure;
            }
        };

        let status = response.status();
        if status.is_success() {
            debug!("Credential refreshed");
            RefreshOutcome::Refreshed
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            debug!(status = %status, "No valid refresh credential");
            RefreshOutcome::NoCredential
        } else {
            // 5xx and anything else without an auth verdict: retryable
            warn!(status = %status, "Unexpected refresh response, treating as transient");
            RefreshOutcome::TransientFailure
        }
    }

    async fn logout(&self) -> ApiResult<()> {
        let url = self.endpoint("/logout");
        debug!(url = %url, "Requesting server-side logout");

        let response = self
            .http_client
            .post(&url)
            .timeout(DEFAULT_LOGOUT_TIMEOUT)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body });
        }

        debug!("Server-side logout acknowledged");
        Ok(())
    }
}
