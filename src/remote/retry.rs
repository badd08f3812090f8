use crate::core::constants::{RETRY_BACKOFF_MS, RETRY_MAX_ATTEMPTS};
use serde::{Deserialize, Serialize};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Bounded fixed-backoff retry applied to every mutating remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Pause between a retryable failure and the next attempt.
    pub backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: RETRY_MAX_ATTEMPTS,
            backoff_ms: RETRY_BACKOFF_MS,
        }
    }
}

impl RetryPolicy {
    /// Same attempt budget without sleeping, for tests and dry runs.
    pub fn immediate() -> Self {
        Self {
            backoff_ms: 0,
            ..Self::default()
        }
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

/// Final result of a retried call together with how many attempts it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempted<T, E> {
    pub attempts: u32,
    pub result: Result<T, E>,
}

impl<T, E> Attempted<T, E> {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs `op` until it succeeds, fails with an error `is_retryable` rejects,
/// or the attempt budget is spent. `op` receives the 1-based attempt number.
pub fn retry_with_backoff<T, E, R, F>(
    policy: &RetryPolicy,
    is_retryable: R,
    mut op: F,
) -> Attempted<T, E>
where
    R: Fn(&E) -> bool,
    F: FnMut(u32) -> Result<T, E>,
    E: std::fmt::Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op(attempt) {
            Ok(value) => {
                return Attempted {
                    attempts: attempt,
                    result: Ok(value),
                }
            }
            Err(err) if is_retryable(&err) && attempt < max_attempts => {
                debug!(attempt, max_attempts, error = %err, "retryable failure, backing off");
                thread::sleep(policy.backoff());
                attempt += 1;
            }
            Err(err) => {
                if is_retryable(&err) {
                    warn!(attempts = attempt, error = %err, "retry budget exhausted");
                }
                return Attempted {
                    attempts: attempt,
                    result: Err(err),
                };
            }
        }
    }
}
