//! Bounded-retry decorator for collaborator calls.
//!
//! Retry bookkeeping and alerting live here so the allocation pipeline stays
//! free of attempt-count conditionals.

use std::future::Future;
use std::time::Duration;

use tracing::{error, warn};

use shipsource_core::{SourcingError, SourcingResult};

use crate::alert::Alerter;
use crate::error::CollabError;

/// Delay growth between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffStrategy {
    Fixed,
    Linear,
    Exponential,
}

/// Retry policy for one collaborator type.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first (1 = no retries).
    pub max_attempts: u32,
    /// Base delay between attempts.
    pub base_delay: Duration,
    /// Delay cap.
    pub max_delay: Duration,
    pub strategy: BackoffStrategy,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(50),
            max_delay: Duration::from_secs(2),
            strategy: BackoffStrategy::Exponential,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Default::default()
        }
    }

    /// A fixed delay between every attempt.
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay: delay,
            max_delay: delay,
            strategy: BackoffStrategy::Fixed,
        }
    }

    pub fn exponential(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            max_delay,
            strategy: BackoffStrategy::Exponential,
        }
    }

    pub fn linear(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            max_delay: Duration::from_secs(2),
            strategy: BackoffStrategy::Linear,
        }
    }

    /// Delay before the attempt following failed attempt `attempt`
    /// (1-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let base_ms = self.base_delay.as_millis() as f64;
        let max_ms = self.max_delay.as_millis() as f64;

        let delay_ms = match self.strategy {
            BackoffStrategy::Fixed => base_ms,
            BackoffStrategy::Linear => (base_ms * attempt as f64).min(max_ms),
            BackoffStrategy::Exponential => {
                let exp = 2_f64.powi((attempt - 1) as i32);
                (base_ms * exp).min(max_ms)
            }
        };
        Duration::from_millis(delay_ms as u64)
    }
}

/// Run `op` under `policy`. Transient failures are retried with backoff;
/// permanent failures and exhaustion convert to a fatal
/// [`SourcingError::Collaborator`] for this order, with an alert raised.
pub async fn with_retry<T, F, Fut>(
    service: &'static str,
    policy: &RetryPolicy,
    alerter: &dyn Alerter,
    mut op: F,
) -> SourcingResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CollabError>>,
{
    let mut attempt = 1u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < policy.max_attempts => {
                warn!(
                    service,
                    attempt,
                    error = %err,
                    "collaborator call failed; retrying"
                );
                tokio::time::sleep(policy.delay_for_attempt(attempt)).await;
                attempt += 1;
            }
            Err(err) => {
                error!(
                    service,
                    attempt,
                    error = %err,
                    "collaborator call failed; giving up"
                );
                alerter.alert(service, &err.to_string());
                return Err(SourcingError::collaborator(service, err.to_string()));
            }
        }
    }
}
