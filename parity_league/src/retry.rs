//! Bounded retry policy for participant calls.
//!
//! A [`RetryPolicy`] knows nothing about the game. It runs an operation up to
//! `max_attempts` times with a fixed delay in between, and stops early on the
//! first success or the first error its classifier calls terminal. The delay
//! goes through a [`Sleeper`] so tests can observe it without a real timer.

use async_trait::async_trait;
use std::{fmt, future::Future, sync::Arc, time::Duration};
use thiserror::Error;

use crate::participant::CallError;

/// How a failed call should be treated
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    /// Worth another attempt (no response, broken channel)
    Retryable,
    /// Retrying cannot help
    Terminal,
}

/// Default classifier: only missing responses are retryable.
#[must_use]
pub fn classify(error: &CallError) -> ErrorClass {
    match error {
        CallError::DeadlineExpired(_) | CallError::ConnectionFailure(_) => ErrorClass::Retryable,
        CallError::InvalidValue(_) | CallError::Rejected(_) | CallError::ProtocolViolation(_) => {
            ErrorClass::Terminal
        }
    }
}

/// Waits between attempts
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by the tokio timer
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Final error of a retried operation
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("{error} (after {attempts} attempt(s))")]
pub struct RetryFailure {
    /// Attempts actually made
    pub attempts: u32,
    /// Error of the last attempt
    pub error: CallError,
    /// True when the budget ran out on retryable errors
    pub exhausted: bool,
}

/// Fixed-delay retry strategy
#[derive(Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
    classifier: fn(&CallError) -> ErrorClass,
    sleeper: Arc<dyn Sleeper>,
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

impl RetryPolicy {
    /// Create a policy; `max_attempts` below 1 is treated as 1
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
            classifier: classify,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Single attempt, no delay
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn with_classifier(mut self, classifier: fn(&CallError) -> ErrorClass) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `op` until it succeeds, fails terminally, or the budget is spent.
    ///
    /// `op` receives the 1-based attempt number.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, RetryFailure>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, CallError>>,
    {
        let mut attempt = 1;
        loop {
            let error = match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            if (self.classifier)(&error) == ErrorClass::Terminal {
                return Err(RetryFailure {
                    attempts: attempt,
                    error,
                    exhausted: false,
                });
            }

            if attempt >= self.max_attempts {
                return Err(RetryFailure {
                    attempts: attempt,
                    error,
                    exhausted: true,
                });
            }

            log::debug!(
                "Attempt {}/{} failed with retryable error: {}; retrying in {:?}",
                attempt,
                self.max_attempts,
                error,
                self.delay
            );
            self.sleeper.sleep(self.delay).await;
            attempt += 1;
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(2))
    }
}
