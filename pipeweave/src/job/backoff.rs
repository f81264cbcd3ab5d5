//! Deterministic backoff policy for status polling.
//!
//! Unlike generic retry helpers this policy carries no jitter: the UI
//! layer depends on a predictable delay schedule, and independent jobs
//! never poll the same resource.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Growth factor applied to the delay after every poll attempt.
const BACKOFF_MULTIPLIER: f64 = 1.5;

/// Capped exponential backoff: `initial * 1.5^attempt`, never exceeding
/// the ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BackoffPolicy {
    /// Delay before the second fetch, in milliseconds.
    pub initial_ms: u64,
    /// Upper bound on any single delay, in milliseconds.
    pub ceiling_ms: u64,
}

impl BackoffPolicy {
    /// Creates a policy from an initial interval and a ceiling.
    #[must_use]
    pub fn new(initial_ms: u64, ceiling_ms: u64) -> Self {
        Self {
            initial_ms,
            ceiling_ms,
        }
    }

    /// Delay to wait after the given zero-based attempt.
    ///
    /// With `initial_ms = 2000` and `ceiling_ms = 10000` the schedule is
    /// 2000, 3000, 4500, 6750, 10000, 10000, ...
    #[must_use]
    pub fn delay_for(&self, attempt: usize) -> Duration {
        #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss, clippy::cast_sign_loss)]
        let scaled = (self.initial_ms as f64
            * BACKOFF_MULTIPLIER.powi(attempt.min(i32::MAX as usize) as i32))
        .round() as u64;
        Duration::from_millis(scaled.min(self.ceiling_ms))
    }
}

/// Configuration for one polling run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PollConfig {
    /// Maximum number of status fetches before giving up.
    pub max_attempts: usize,
    /// Backoff schedule between fetches.
    pub backoff: BackoffPolicy,
}

impl PollConfig {
    /// Defaults for EDA report generation: 60 attempts, 2s initial
    /// interval, 10s ceiling.
    #[must_use]
    pub fn eda() -> Self {
        Self {
            max_attempts: 60,
            backoff: BackoffPolicy::new(2_000, 10_000),
        }
    }

    /// Defaults for model training: 120 attempts, 3s initial interval,
    /// 15s ceiling.
    #[must_use]
    pub fn training() -> Self {
        Self {
            max_attempts: 120,
            backoff: BackoffPolicy::new(3_000, 15_000),
        }
    }

    /// Sets the maximum attempts.
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Sets the initial polling interval in milliseconds.
    #[must_use]
    pub fn with_interval_ms(mut self, interval_ms: u64) -> Self {
        self.backoff.initial_ms = interval_ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_delay_schedule_matches_spec_example() {
        let policy = BackoffPolicy::new(2_000, 10_000);
        let delays: Vec<u64> = (0..7).map(|a| policy.delay_for(a).as_millis() as u64).collect();
        assert_eq!(delays, vec![2_000, 3_000, 4_500, 6_750, 10_000, 10_000, 10_000]);
    }

    #[test]
    fn test_delays_non_decreasing_and_capped() {
        let policy = PollConfig::training().backoff;
        let mut prev = Duration::ZERO;
        for attempt in 0..200 {
            let delay = policy.delay_for(attempt);
            assert!(delay >= prev, "delay regressed at attempt {attempt}");
            assert!(delay <= Duration::from_millis(policy.ceiling_ms));
            prev = delay;
        }
    }

    #[test]
    fn test_presets() {
        let eda = PollConfig::eda();
        assert_eq!(eda.max_attempts, 60);
        assert_eq!(eda.backoff, BackoffPolicy::new(2_000, 10_000));

        let training = PollConfig::training();
        assert_eq!(training.max_attempts, 120);
        assert_eq!(training.backoff, BackoffPolicy::new(3_000, 15_000));
    }

    #[test]
    fn test_builder_overrides() {
        let config = PollConfig::eda().with_max_attempts(5).with_interval_ms(100);
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.backoff.initial_ms, 100);
        assert_eq!(config.backoff.ceiling_ms, 10_000);
    }
}
