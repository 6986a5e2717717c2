//! Exponential backoff around fallible network operations.
//!
//! [`RetryPolicy::run`] is the only place the backoff arithmetic lives. The
//! caller supplies the operation and a classifier deciding which errors are
//! transient; everything else propagates on first occurrence.

use std::fmt;
use std::time::Duration;

use tracing::{error, warn};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(5);

/// Blocking pause between remote calls.
///
/// Production code uses [`ThreadSleeper`]; tests substitute a recorder so
/// backoff schedules can be asserted without waiting.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by `std::thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// [`Sleeper`] that records requested durations and returns immediately.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    slept: std::cell::RefCell<Vec<Duration>>,
}

#[cfg(any(test, feature = "test-util"))]
impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> Vec<Duration> {
        self.slept.borrow().clone()
    }

    pub fn count(&self) -> usize {
        self.slept.borrow().len()
    }
}

#[cfg(any(test, feature = "test-util"))]
impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.slept.borrow_mut().push(duration);
    }
}

/// Errors that know whether they are worth another attempt.
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero is treated as one.
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Delay after the zero-indexed `attempt` failed: `base_delay * 2^attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Run `op` until it succeeds, fails non-retryably, or attempts run out.
    ///
    /// `op` receives the zero-indexed attempt number. No sleep follows the
    /// final attempt; its error is returned as-is.
    pub fn run<T, E, C, F>(
        &self,
        sleeper: &dyn Sleeper,
        operation: &str,
        is_retryable: C,
        mut op: F,
    ) -> Result<T, E>
    where
        E: fmt::Display,
        C: Fn(&E) -> bool,
        F: FnMut(u32) -> Result<T, E>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            let err = match op(attempt) {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if !is_retryable(&err) {
                return Err(err);
            }

            if attempt + 1 >= max_attempts {
                error!(
                    operation,
                    attempts = max_attempts,
                    error = %err,
                    "all attempts failed"
                );
                return Err(err);
            }

            let delay = self.delay_for(attempt);
            warn!(
                operation,
                attempt = attempt + 1,
                max_attempts,
                delay_secs = delay.as_secs_f64(),
                error = %err,
                "connection error, retrying"
            );
            sleeper.sleep(delay);
            attempt += 1;
        }
    }

    /// [`RetryPolicy::run`] with the error type's own [`Retryable`] classification.
    pub fn run_retryable<T, E, F>(&self, sleeper: &dyn Sleeper, operation: &str, op: F) -> Result<T, E>
    where
        E: Retryable + fmt::Display,
        F: FnMut(u32) -> Result<T, E>,
    {
        self.run(sleeper, operation, |err: &E| err.is_retryable(), op)
    }
}
