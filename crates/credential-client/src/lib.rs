//! HTTP client for the Tempora credential API.
//!
//! The credential itself is an HTTP-only cookie: this crate never reads
//! or stores its value, it only observes success or failure of calls
//! made with credentials attached. It provides:
//! - The `CredentialApi` trait the session coordinator is written
//!   against, plus its `Arc<dyn _>` handle type
//! - A reqwest-backed implementation (`CredentialClient`) with a cookie
//!   jar and per-call timeouts
//! - Outcome classification (`RefreshOutcome`, `ApiError::is_transient`)

mod api;
mod client;
mod error;
mod types;

pub use api::{CredentialApi, CredentialApiHandle};
pub use client::{CredentialClient, DEFAULT_LOGOUT_TIMEOUT, DEFAULT_REFRESH_TIMEOUT};
pub use error::{ApiError, ApiResult};
pub use types::{IdentityProfile, RefreshOutcome};

pub use reqwest::StatusCode;
