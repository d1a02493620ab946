//! Capped exponential backoff for retryable session operations.

use std::time::Duration;

/// Exponential backoff schedule: `base * 2^attempt`, clamped to `cap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    base: Duration,
    cap: Duration,
}

impl BackoffPolicy {
    pub const fn new(base: Duration, cap: Duration) -> Self {
        Self { base, cap }
    }

    /// Delay to sleep before retry number `attempt + 1`.
    ///
    /// Attempt 0 gets the base delay; each subsequent attempt doubles it
    /// until the cap is reached. Saturates instead of overflowing for
    /// absurd attempt counts.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base_ms = self.base.as_millis() as u64;
        let delay_ms = match 1u64.checked_shl(attempt) {
            Some(factor) => base_ms.saturating_mul(factor),
            None => u64::MAX,
        };
        Duration::from_millis(delay_ms).min(self.cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubles_until_cap() {
        let policy = BackoffPolicy::new(Duration::from_millis(1000), Duration::from_secs(10));
        assert_eq!(policy.delay_for_attempt(0), Duration::from_millis(1000));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(2000));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(4000));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(8000));
        assert_eq!(policy.delay_for_attempt(4), Duration::from_secs(10));
        assert_eq!(policy.delay_for_attempt(5), Duration::from_secs(10));
    }

    #[test]
    fn refresh_schedule_caps_lower() {
        let policy = BackoffPolicy::new(Duration::from_millis(1000), Duration::from_secs(5));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(4000));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_secs(5));
    }

    #[test]
    fn huge_attempt_saturates() {
        let policy = BackoffPolicy::new(Duration::from_millis(500), Duration::from_secs(30));
        assert_eq!(policy.delay_for_attempt(200), Duration::from_secs(30));
        assert_eq!(policy.delay_for_attempt(u32::MAX), Duration::from_secs(30));
    }

    #[test]
    fn zero_base_stays_zero() {
        let policy = BackoffPolicy::new(Duration::ZERO, Duration::from_secs(10));
        assert_eq!(policy.delay_for_attempt(0), Duration::ZERO);
        assert_eq!(policy.delay_for_attempt(8), Duration::ZERO);
    }
}
