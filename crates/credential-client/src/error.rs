//! Credential API error types.

use reqwest::StatusCode;
use thiserror::Error;

/// Error from a credential API call.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport-level HTTP error (connection, protocol, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status
    #[error("Endpoint returned HTTP {status}")]
    Status {
        status: StatusCode,
        body: String,
    },

    /// Per-call deadline exceeded
    #[error("Request timed out")]
    Timeout,

    /// Response body could not be decoded
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Base URL is not a valid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// Returns true if this error is transient and the call can be retried.
    ///
    /// Transient errors carry no authentication verdict: timeouts,
    /// connection-level failures, and 5xx server errors.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Timeout => true,
            ApiError::Http(e) => {
                if e.is_connect() || e.is_timeout() {
                    return true;
                }
                if let Some(status) = e.status() {
                    return status.is_server_error();
                }
                // Request never produced a response (DNS, reset, ...)
                e.is_request()
            }
            ApiError::Status { status, .. } => status.is_server_error(),
            _ => false,
        }
    }

    /// Returns true for an explicit 401/403 verdict.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            ApiError::Status { status, .. }
                if *status == StatusCode::UNAUTHORIZED || *status == StatusCode::FORBIDDEN
        )
    }
}

/// Result type alias using ApiError.
pub type ApiResult<T> = Result<T, ApiError>;
