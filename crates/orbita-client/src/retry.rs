//! Caller-level retry policy
//!
//! Nothing in the pager or aggregator retries. Callers that want retries wrap
//! a whole operation (one page, or a whole aggregation) with [`retry`] or
//! [`network_retry`].

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use crate::FetchError;

/// How many times to re-run a failed operation, and how long to wait
///
/// The wait doubles after every attempt, starting at `base_delay` and never
/// exceeding `max_delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one
    pub retries: u32,
    /// Wait before the first retry
    pub base_delay: Duration,
    /// Longest wait between two attempts
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(2)
    }
}

impl RetryPolicy {
    /// Policy with `retries` extra attempts and the default waits
    pub fn new(retries: u32) -> Self {
        Self {
            retries,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(4),
        }
    }

    /// Replace the base and maximum waits
    pub fn with_delays(self, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            base_delay,
            max_delay,
            ..self
        }
    }

    /// Wait before retry number `attempt` (0-based)
    fn delay_before(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(1u32 << attempt.min(16))
            .min(self.max_delay)
    }
}

/// Retry an async operation while `should_retry` accepts its error
///
/// The error of the last attempt is returned once retries are exhausted.
pub async fn retry<F, Fut, T, E>(
    policy: &RetryPolicy,
    should_retry: impl Fn(&E) -> bool,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !should_retry(&err) || attempt >= policy.retries {
                    return Err(err);
                }

                sleep(policy.delay_before(attempt)).await;
                attempt += 1;
            }
        }
    }
}

/// Retry only connectivity failures (network errors and timeouts)
///
/// # Examples
/// ```
/// use orbita_client::retry::{network_retry, RetryPolicy};
/// use orbita_client::{fetch_all, CursorPager};
///
/// async fn example<P: CursorPager>(pager: &P) -> orbita_client::Result<usize> {
///     let items = network_retry(&RetryPolicy::new(2), || fetch_all(pager, 20)).await?;
///     Ok(items.len())
/// }
/// ```
pub async fn network_retry<F, Fut, T>(policy: &RetryPolicy, operation: F) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    retry(policy, FetchError::is_network_error, operation).await
}
