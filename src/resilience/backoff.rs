//! Backoff between connection attempts.

use std::time::Duration;

use rand::Rng;

use crate::config::{BackoffKind, RetryConfig};

/// Delay schedule applied between failed attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Same delay before every retry.
    Constant(Duration),
    /// Doubling delay with up to 10% jitter, capped at `max`.
    Exponential { base: Duration, max: Duration },
}

impl Backoff {
    /// Delay to wait after the given failed attempt (1-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        match *self {
            Backoff::Constant(delay) => delay,
            Backoff::Exponential { base, max } => {
                calculate_backoff(attempt, base.as_millis() as u64, max.as_millis() as u64)
            }
        }
    }
}

impl From<&RetryConfig> for Backoff {
    fn from(config: &RetryConfig) -> Self {
        match config.backoff {
            BackoffKind::Constant => Backoff::Constant(Duration::from_millis(config.delay_ms)),
            BackoffKind::Exponential => Backoff::Exponential {
                base: Duration::from_millis(config.delay_ms),
                max: Duration::from_millis(config.max_delay_ms),
            },
        }
    }
}

/// Calculate exponential backoff delay with jitter.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let delay_ms = base_ms.saturating_mul(exponential_base);
    let capped_delay = delay_ms.min(max_ms);

    // Apply jitter (0 to 10% of the delay)
    let jitter_range = capped_delay / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay + jitter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_calculation() {
        let b1 = calculate_backoff(1, 100, 2000);
        assert!(b1.as_millis() >= 100);

        let b2 = calculate_backoff(2, 100, 2000);
        assert!(b2.as_millis() >= 200);

        let max = calculate_backoff(10, 100, 1000);
        assert!(max.as_millis() >= 1000);
        assert!(max.as_millis() < 1100);
    }

    #[test]
    fn test_constant_never_grows() {
        let backoff = Backoff::Constant(Duration::from_secs(3));
        for attempt in 1..=20 {
            assert_eq!(backoff.delay(attempt), Duration::from_secs(3));
        }
    }

    #[test]
    fn test_from_config() {
        let config = RetryConfig::default();
        assert_eq!(
            Backoff::from(&config),
            Backoff::Constant(Duration::from_secs(3))
        );

        let config = RetryConfig {
            backoff: BackoffKind::Exponential,
            delay_ms: 100,
            max_delay_ms: 800,
            ..RetryConfig::default()
        };
        assert_eq!(
            Backoff::from(&config),
            Backoff::Exponential {
                base: Duration::from_millis(100),
                max: Duration::from_millis(800),
            }
        );
    }
}
