//! Tunable knobs for the revalidation coordinator.

use std::time::Duration;

use crate::backoff::BackoffPolicy;

/// Timing and retry parameters for session checks.
///
/// The defaults match production behavior; tests shrink the settle delays
/// and drive the clock manually.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Maximum number of retries after the initial attempt of a run.
    /// Shared between the proactive-refresh and identity-fetch phases.
    pub max_retries: u32,
    /// Backoff schedule for transient identity-fetch failures.
    pub retry_backoff: BackoffPolicy,
    /// Backoff schedule for transient proactive-refresh failures.
    pub refresh_backoff: BackoffPolicy,
    /// Pause after a successful refresh so the new credential cookie is
    /// visible to the identity endpoint.
    pub refresh_settle: Duration,
    /// Pause after a reactive refresh (triggered by a 401) before the
    /// identity fetch is retried.
    pub reauth_settle: Duration,
    /// Debounce applied to focus/visibility triggers before a run starts.
    pub focus_settle: Duration,
    /// Identity request timeout for the initial check on mount.
    pub initial_identity_timeout: Duration,
    /// Identity request timeout for focus/visibility revalidations.
    pub revalidation_identity_timeout: Duration,
    /// Skip the automatic check on mount (embedding host does its own).
    pub suppress_initial_check: bool,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_backoff: BackoffPolicy::new(
                Duration::from_millis(1000),
                Duration::from_secs(10),
            ),
            refresh_backoff: BackoffPolicy::new(
                Duration::from_millis(1000),
                Duration::from_secs(5),
            ),
            refresh_settle: Duration::from_millis(100),
            reauth_settle: Duration::from_millis(200),
            focus_settle: Duration::from_millis(300),
            initial_identity_timeout: Duration::from_secs(30),
            revalidation_identity_timeout: Duration::from_secs(10),
            suppress_initial_check: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = CoordinatorConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(
            config.retry_backoff.delay_for_attempt(0),
            Duration::from_millis(1000)
        );
        assert!(config.initial_identity_timeout > config.revalidation_identity_timeout);
        assert!(!config.suppress_initial_check);
    }
}
