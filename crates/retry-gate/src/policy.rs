use std::time::Duration;

use crate::FailureClass;

/// Attempt and backoff budget for one gate instance.
///
/// The delay before attempt `n + 1` is `base_delay * 2^(n-1)`; a rate-limit
/// signal additionally imposes `rate_limit_cooldown` before the next
/// attempt, independent of the backoff schedule.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    /// Attempt cap for network, timeout and rate-limit failures.
    pub max_attempts: u32,
    /// Attempt cap for other transient upstream failures (one retry).
    pub transient_attempts: u32,
    pub base_delay: Duration,
    pub rate_limit_cooldown: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            transient_attempts: 2,
            base_delay: Duration::from_millis(500),
            rate_limit_cooldown: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Policy for page navigation and metric extraction.
    pub fn page() -> Self {
        Self {
            base_delay: Duration::from_secs(1),
            ..Self::default()
        }
    }

    /// Policy for hosted-reasoning calls.
    pub fn semantic() -> Self {
        Self::default()
    }

    /// How many attempts the given failure class is allowed in total.
    pub fn attempts_for(&self, class: FailureClass) -> u32 {
        match class {
            FailureClass::Network | FailureClass::Timeout | FailureClass::RateLimited => {
                self.max_attempts.max(1)
            }
            FailureClass::Transient => self.transient_attempts.max(1),
            FailureClass::NotFound | FailureClass::Fatal => 1,
        }
    }

    pub fn backoff_delay(&self, completed_attempts: u32) -> Duration {
        let exponent = completed_attempts.saturating_sub(1).min(16);
        self.base_delay * 2u32.pow(exponent)
    }
}
