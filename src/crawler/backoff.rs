//! Retry schedule for page fetches
//!
//! The schedule is pure: given an attempt index it yields the delay window,
//! and the only randomness is the jitter sample passed in.

use crate::config::FetchConfig;
use std::time::Duration;

/// Bounded retry with exponential backoff plus jitter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,

    /// Delay before the first retry; doubles on every further retry
    pub base_delay: Duration,

    /// Exclusive upper bound of the random extra delay
    pub jitter: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &FetchConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
            jitter: Duration::from_millis(config.jitter_ms),
        }
    }

    /// A policy that retries immediately, for tests
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay: Duration::ZERO,
            jitter: Duration::ZERO,
        }
    }

    /// Delay window before the given attempt (0-based)
    ///
    /// Attempt 0 is the initial request and has no delay. Attempt `n > 0`
    /// waits between `base * 2^(n-1)` (inclusive) and that plus `jitter`
    /// (exclusive). Doubling saturates rather than overflowing.
    ///
    /// # Examples
    ///
    /// ```
    /// use reel_harvest::crawler::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy {
    ///     max_attempts: 3,
    ///     base_delay: Duration::from_secs(5),
    ///     jitter: Duration::from_secs(3),
    /// };
    /// assert_eq!(policy.delay_bounds(0), None);
    /// assert_eq!(
    ///     policy.delay_bounds(2),
    ///     Some((Duration::from_secs(10), Duration::from_secs(13)))
    /// );
    /// ```
    pub fn delay_bounds(&self, attempt: u32) -> Option<(Duration, Duration)> {
        if attempt == 0 {
            return None;
        }

        let factor = 1u32.checked_shl(attempt - 1).unwrap_or(u32::MAX);
        let min = self.base_delay.saturating_mul(factor);
        Some((min, min.saturating_add(self.jitter)))
    }

    /// Delay before the given attempt for a jitter sample in `[0, 1)`
    pub fn delay_with_jitter(&self, attempt: u32, sample: f64) -> Duration {
        match self.delay_bounds(attempt) {
            None => Duration::ZERO,
            Some((min, _)) => {
                let sample = sample.clamp(0.0, 1.0);
                min.saturating_add(self.jitter.mul_f64(sample))
            }
        }
    }

    /// Delay before the given attempt with a freshly drawn jitter sample
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.delay_with_jitter(attempt, fastrand::f64())
    }

    /// True if another attempt is allowed after `attempt` (0-based) failed
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt + 1 < self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&FetchConfig::default())
    }
}
