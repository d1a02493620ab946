//! The credential API seam the session coordinator is written against.

use crate::{ApiResult, IdentityProfile, RefreshOutcome};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Operations of the cookie-based credential API.
///
/// Implemented by [`crate::CredentialClient`] for production and by
/// scripted fakes in tests.
#[async_trait]
pub trait CredentialApi: Send + Sync {
    /// `GET /identity` — validate the current credential and fetch the
    /// user profile. The timeout is per call (the coordinator uses a
    /// tighter deadline on revalidation paths than on initial load).
    async fn fetch_identity(&self, timeout: Duration) -> ApiResult<IdentityProfile>;

    /// `POST /refresh` — exchange the long-lived refresh credential for
    /// a renewed short-lived one. The outcome is always classified,
    /// never an error.
    async fn refresh(&self) -> RefreshOutcome;

    /// `POST /logout` — best-effort server-side invalidation.
    async fn logout(&self) -> ApiResult<()>;
}

/// Thread-safe handle for accessing the credential API.
pub type CredentialApiHandle = Arc<dyn CredentialApi>;
