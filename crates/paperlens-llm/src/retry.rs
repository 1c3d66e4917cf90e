//! Retry/backoff strategy.
//!
//! Shared by every call site so chunk-level and merge-level requests
//! get identical semantics: retry the transient statuses with
//! exponential backoff, then hand the last reply back to the caller
//! instead of raising.

use std::time::Duration;

/// Statuses expected to resolve themselves after a delay.
pub const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempt ceiling, counting the first try.
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 4,
            base_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    pub fn is_retryable(&self, status: u16) -> bool {
        RETRYABLE_STATUSES.contains(&status)
    }

    /// Delay before the attempt following `attempt` (1-based):
    /// `base_delay * 2^(attempt - 1)`, capped to avoid shift overflow.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base_delay * (1u32 << exponent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_per_attempt() {
        let policy = RetryPolicy::new(4, Duration::from_secs(2));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_secs(4));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_secs(8));
    }

    #[test]
    fn test_exponent_is_capped() {
        let policy = RetryPolicy::new(64, Duration::from_millis(1));
        assert_eq!(policy.delay_for_attempt(40), policy.delay_for_attempt(17));
    }

    #[test]
    fn test_retryable_statuses() {
        let policy = RetryPolicy::default();
        for status in [429, 500, 502, 503, 504] {
            assert!(policy.is_retryable(status), "{status} should be retryable");
        }
        for status in [200, 400, 401, 403, 404] {
            assert!(!policy.is_retryable(status), "{status} should be terminal");
        }
    }
}
