//! Retry logic.
//!
//! # Responsibilities
//! - Run a fallible async operation up to a bounded number of attempts
//! - Wait the configured backoff between attempts (never after the last one)
//! - Hand the last observed error back on exhaustion
//!
//! # Design Decisions
//! - Success short-circuits the remaining attempts
//! - Backoff is a plain `tokio::time::sleep`; the caller is blocked meanwhile
//! - No overall deadline; the attempt bound is the only limit

use std::fmt::Display;
use std::future::Future;

use crate::config::RetryConfig;
use crate::resilience::backoff::Backoff;

/// Bounded retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first; values below 1 are treated as 1.
    pub max_attempts: u32,
    pub backoff: Backoff,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Backoff) -> Self {
        Self {
            max_attempts,
            backoff,
        }
    }

    /// A policy that tries exactly once.
    pub fn once() -> Self {
        Self::new(1, Backoff::Constant(std::time::Duration::ZERO))
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(config.max_attempts, Backoff::from(config))
    }
}

/// Every attempt failed.
#[derive(Debug)]
pub struct Exhausted<E> {
    pub attempts: u32,
    pub last_error: E,
}

/// Run `operation` until it succeeds or the policy's attempts run out.
///
/// `operation` receives the 1-based attempt number.
pub async fn retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    dependency: &str,
    mut operation: F,
) -> Result<T, Exhausted<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = policy.attempts();
    let mut attempt = 0;

    loop {
        attempt += 1;

        match operation(attempt).await {
            Ok(value) => {
                tracing::debug!(dependency, attempt, "Attempt succeeded");
                return Ok(value);
            }
            Err(error) if attempt >= max_attempts => {
                tracing::error!(
                    dependency,
                    attempt,
                    error = %error,
                    "Final attempt failed"
                );
                return Err(Exhausted {
                    attempts: attempt,
                    last_error: error,
                });
            }
            Err(error) => {
                let delay = policy.backoff.delay(attempt);
                tracing::warn!(
                    dependency,
                    attempt,
                    max_attempts,
                    delay = ?delay,
                    error = %error,
                    "Attempt failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
