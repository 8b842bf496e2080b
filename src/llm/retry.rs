use async_trait::async_trait;
use std::time::Duration;

use super::LlmClient;
use crate::error::BackendError;
use crate::types::Turn;

/// Bounded timeout and retry settings applied around every backend call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub request_timeout: Duration,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    /// A single attempt with the given timeout
    pub fn no_retry(request_timeout: Duration) -> Self {
        Self {
            max_attempts: 1,
            request_timeout,
            ..Self::default()
        }
    }

    /// Attempts per call including the first; at least 1
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Limit on a single attempt
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// First delay between attempts and the cap it doubles up to
    pub fn with_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.initial_backoff = initial;
        self.max_backoff = max;
        self
    }

    /// Delay before attempt `attempt + 1`, where `attempt` starts at 1
    pub fn backoff_for(&self, attempt: u32, error: &BackendError) -> Duration {
        if let BackendError::RateLimited {
            retry_after: Some(hint),
        } = error
        {
            return (*hint).min(self.max_backoff);
        }
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            request_timeout: Duration::from_secs(120),
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(30),
        }
    }
}

/// Wraps a backend with a per-attempt timeout and capped exponential backoff.
///
/// Only transient failures are retried; everything else is returned on first sight.
pub struct ResilientClient<C> {
    inner: C,
    policy: RetryPolicy,
}

impl<C: LlmClient> ResilientClient<C> {
    /// Applies `policy` to every call made through `inner`
    pub fn new(inner: C, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    async fn attempt(&self, turns: &[Turn], seed: u64) -> Result<String, BackendError> {
        match tokio::time::timeout(self.policy.request_timeout, self.inner.query(turns, seed)).await {
            Ok(result) => result,
            Err(_) => Err(BackendError::Timeout(self.policy.request_timeout)),
        }
    }
}

#[async_trait]
impl<C: LlmClient> LlmClient for ResilientClient<C> {
    async fn query(&self, turns: &[Turn], seed: u64) -> Result<String, BackendError> {
        let mut attempt = 1;
        loop {
            match self.attempt(turns, seed).await {
                Ok(text) => return Ok(text),
                Err(err) if err.is_transient() && attempt < self.policy.max_attempts => {
                    let delay = self.policy.backoff_for(attempt, &err);
                    log::warn!(
                        "{} attempt {}/{} failed: {}; retrying in {:?}",
                        self.inner.name(),
                        attempt,
                        self.policy.max_attempts,
                        err,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
