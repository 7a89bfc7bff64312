//! Retry policy for archive requests.
//!
//! Transient failures (timeouts, connection errors, 408, 429 and 5xx) are
//! retried with exponential backoff. Everything else is returned as-is.

use reqwest::StatusCode;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::utils::constants::{
    DEFAULT_BACKOFF_FACTOR_SECS, DEFAULT_MAX_BACKOFF_SECS, DEFAULT_MAX_RETRIES,
};

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry; doubles on every further retry
    pub backoff_factor: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_factor: Duration::from_secs_f64(DEFAULT_BACKOFF_FACTOR_SECS),
            max_delay: Duration::from_secs_f64(DEFAULT_MAX_BACKOFF_SECS),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff_factor: Duration, max_delay: Duration) -> Self {
        Self {
            max_retries,
            backoff_factor,
            max_delay,
        }
    }

    /// No retries at all.
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO, Duration::ZERO)
    }

    /// Delay before retry number `retry` (1-based).
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        if retry == 0 {
            return Duration::ZERO;
        }
        let factor = 2u32.saturating_pow(retry - 1);
        self.backoff_factor
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Run `operation` until it yields a non-retryable outcome or the
    /// retries are used up. The last outcome is returned either way.
    pub async fn execute<F, Fut>(&self, operation: F) -> Result<reqwest::Response, reqwest::Error>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<reqwest::Response, reqwest::Error>>,
    {
        let mut retry = 0;

        loop {
            let outcome = operation().await;

            let retryable = match &outcome {
                Ok(response) => is_retryable_status(response.status()),
                Err(e) => is_retryable_error(e),
            };

            if !retryable || retry >= self.max_retries {
                if retry > 0 {
                    debug!("Request finished after {} retries", retry);
                }
                return outcome;
            }

            retry += 1;
            let delay = self.delay_for_retry(retry);
            match &outcome {
                Ok(response) => warn!(
                    "Archive returned {}, retry {}/{} in {:?}",
                    response.status(),
                    retry,
                    self.max_retries,
                    delay
                ),
                Err(e) => warn!(
                    "Request failed ({}), retry {}/{} in {:?}",
                    e, retry, self.max_retries, delay
                ),
            }
            tokio::time::sleep(delay).await;
        }
    }
}

pub fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error()
        || status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
}

pub fn is_retryable_error(error: &reqwest::Error) -> bool {
    if error.is_timeout() || error.is_connect() {
        return true;
    }
    error.status().is_some_and(is_retryable_status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 5);
        assert_eq!(policy.backoff_factor, Duration::from_millis(200));
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.delay_for_retry(0), Duration::ZERO);
        assert_eq!(policy.delay_for_retry(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for_retry(2), Duration::from_millis(400));
        assert_eq!(policy.delay_for_retry(3), Duration::from_millis(800));
        assert_eq!(policy.delay_for_retry(5), Duration::from_millis(3200));
    }

    #[test]
    fn test_backoff_capped() {
        let policy = RetryPolicy::new(40, Duration::from_millis(200), Duration::from_secs(1));

        assert_eq!(policy.delay_for_retry(4), Duration::from_secs(1));
        assert_eq!(policy.delay_for_retry(40), Duration::from_secs(1));
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable_status(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(is_retryable_status(StatusCode::BAD_GATEWAY));
        assert!(is_retryable_status(StatusCode::GATEWAY_TIMEOUT));
        assert!(is_retryable_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable_status(StatusCode::REQUEST_TIMEOUT));

        assert!(!is_retryable_status(StatusCode::OK));
        assert!(!is_retryable_status(StatusCode::BAD_REQUEST));
        assert!(!is_retryable_status(StatusCode::NOT_FOUND));
    }
}
