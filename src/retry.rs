// src/retry.rs
use serde_json::Value;
use std::time::Duration;

use crate::config::RetryConfig;
use crate::errors::{EvalError, Result};
use crate::models::EvaluationRequest;
use crate::providers::LlmProvider;

/// Bounded exponential backoff. No jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
        }
    }
}

impl RetryPolicy {
    /// Wait after failed attempt `attempt` (numbered from 1): `2^attempt * base_delay`.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }
}

/// A successful delivery and what it took to get it.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub body: Value,
    pub attempts: u32,
    pub waited: Duration,
}

/// Wraps a provider with the retry policy.
pub struct RetryingRequester<P> {
    provider: P,
    policy: RetryPolicy,
}

impl<P: LlmProvider> RetryingRequester<P> {
    pub fn new(provider: P, policy: RetryPolicy) -> Self {
        Self { provider, policy }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Delivers `request`, retrying transport failures and non-success statuses.
    ///
    /// Returns on the first success. A success whose body does not decode is
    /// returned as an error straight away. Once `max_attempts` is reached the
    /// last failure is wrapped in `EvalError::RetriesExhausted`.
    pub async fn deliver(&self, request: &EvaluationRequest) -> Result<Delivery> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut waited = Duration::ZERO;
        let mut attempt = 0;

        loop {
            attempt += 1;

            match self.provider.send(request).await {
                Ok(body) => {
                    return Ok(Delivery { body, attempts: attempt, waited });
                }
                Err(e) if e.is_retryable() => {
                    if attempt >= max_attempts {
                        log::error!("Giving up after {} attempts: {}", attempt, e);
                        return Err(EvalError::RetriesExhausted {
                            attempts: attempt,
                            last: Box::new(e),
                        });
                    }

                    let backoff = self.policy.delay_after(attempt);
                    log::warn!(
                        "Attempt {}/{} failed: {}. Retrying in {}ms",
                        attempt,
                        max_attempts,
                        e,
                        backoff.as_millis()
                    );
                    tokio::time::sleep(backoff).await;
                    waited += backoff;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
