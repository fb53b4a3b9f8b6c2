//! Exponential backoff with optional jitter.

use std::time::Duration;

use rand::Rng;

use crate::config::RetryConfig;

/// Calculate the delay before the retry that follows failed attempt
/// `attempt` (0-based): `base_ms * 2^attempt`, capped at `max_ms`.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64, jitter_ratio: f64) -> Duration {
    let exponential_base = 2u64.saturating_pow(attempt);
    let delay_ms = base_ms.saturating_mul(exponential_base);
    let capped_delay = delay_ms.min(max_ms);

    if jitter_ratio <= 0.0 {
        return Duration::from_millis(capped_delay);
    }

    let jitter_range = (capped_delay as f64 * jitter_ratio) as u64;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay + jitter)
}

/// Backoff parameters shared by every retried call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackoffPolicy {
    pub base_ms: u64,
    pub max_ms: u64,
    pub jitter_ratio: f64,
}

impl BackoffPolicy {
    pub fn delay_after(&self, attempt: u32) -> Duration {
        calculate_backoff(attempt, self.base_ms, self.max_ms, self.jitter_ratio)
    }
}

impl From<&RetryConfig> for BackoffPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            base_ms: config.backoff_base_ms,
            max_ms: config.max_delay_ms,
            jitter_ratio: config.jitter_ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_calculation() {
        assert_eq!(calculate_backoff(0, 300, 120_000, 0.0), Duration::from_millis(300));
        assert_eq!(calculate_backoff(1, 300, 120_000, 0.0), Duration::from_millis(600));
        assert_eq!(calculate_backoff(2, 300, 120_000, 0.0), Duration::from_millis(1200));

        let max = calculate_backoff(20, 100, 1000, 0.0);
        assert_eq!(max, Duration::from_millis(1000));
    }

    #[test]
    fn test_jitter_stays_within_ratio() {
        for _ in 0..50 {
            let delay = calculate_backoff(1, 100, 10_000, 0.1);
            assert!(delay >= Duration::from_millis(200));
            assert!(delay < Duration::from_millis(220));
        }
    }

    #[test]
    fn test_huge_attempt_saturates() {
        assert_eq!(calculate_backoff(u32::MAX, 300, 5_000, 0.0), Duration::from_millis(5_000));
    }
}
