//! Explicit retry policy for store calls.
//!
//! A policy is a value: a bounded attempt count plus a wait strategy.
//! Callers invoke it imperatively around an operation together with a
//! predicate deciding which errors are worth retrying. Logical errors
//! (not-found, conflict) must never pass that predicate.

use std::future::Future;
use std::time::Duration;

use tokio_retry::strategy::{ExponentialBackoff, FixedInterval};
use tokio_retry::RetryIf;

/// Bounded retry policy with a fixed or exponential wait strategy.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: usize,
    wait: WaitStrategy,
}

#[derive(Debug, Clone, Copy)]
enum WaitStrategy {
    Fixed(Duration),
    Exponential { base: Duration },
}

impl RetryPolicy {
    /// Policy waiting a fixed interval between attempts.
    pub fn fixed(max_attempts: usize, wait: Duration) -> Self {
        Self {
            max_attempts,
            wait: WaitStrategy::Fixed(wait),
        }
    }

    /// Policy doubling the wait after every attempt, starting at `base`.
    pub fn exponential(max_attempts: usize, base: Duration) -> Self {
        Self {
            max_attempts,
            wait: WaitStrategy::Exponential { base },
        }
    }

    fn delays(&self) -> Box<dyn Iterator<Item = Duration> + Send> {
        // One fewer delay than attempts: the first try is immediate.
        let retries = self.max_attempts.saturating_sub(1);
        match self.wait {
            WaitStrategy::Fixed(wait) => Box::new(FixedInterval::new(wait).take(retries)),
            WaitStrategy::Exponential { base } => {
                // ExponentialBackoff yields 2^n * factor, so a factor of
                // base/2 produces base, 2*base, 4*base, ...
                let factor = (base.as_millis() as u64 / 2).max(1);
                Box::new(ExponentialBackoff::from_millis(2).factor(factor).take(retries))
            }
        }
    }

    /// Runs `operation`, retrying errors accepted by `is_retryable`
    /// until the attempt budget is exhausted.
    pub async fn run<T, E, A, F, C>(&self, operation: A, is_retryable: C) -> Result<T, E>
    where
        A: FnMut() -> F,
        F: Future<Output = Result<T, E>>,
        C: FnMut(&E) -> bool,
    {
        RetryIf::spawn(self.delays(), operation, is_retryable).await
    }
}
