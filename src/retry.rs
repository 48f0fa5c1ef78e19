//! Uniform retry with randomized backoff
//!
//! Every network-facing step shares one retry shape: attempt, classify,
//! pause for a freshly sampled backoff, try again while the budget lasts.
//! Callers receive the final error once the budget is spent so they can
//! degrade (skip an item, keep partial results) instead of aborting the run.

use std::future::Future;
use tracing::warn;

use crate::config::DelayWindow;
use crate::error::ScrapeResult;

/// Retry budget and backoff window shared by every retried step
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, first try included
    pub max_attempts: u32,
    /// Randomized pause between attempts
    pub backoff: DelayWindow,
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_attempts: u32, backoff: DelayWindow) -> Self {
        Self {
            max_attempts,
            backoff,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: crate::utils::DEFAULT_MAX_RETRIES,
            backoff: crate::utils::DEFAULT_RETRY_BACKOFF,
        }
    }
}

/// Run `op` until it succeeds, fails permanently, or exhausts the budget
///
/// Only errors classified transient by `ScrapeError::is_transient` are
/// retried; permanent errors fail fast on the first occurrence. `what`
/// names the operation in retry logs.
pub async fn with_retries<F, Fut, T>(policy: RetryPolicy, what: &str, op: F) -> ScrapeResult<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = ScrapeResult<T>>,
{
    let mut attempt = 1u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if !e.is_transient() => {
                warn!("{what}: permanent error, failing fast: {e}");
                return Err(e);
            }
            Err(e) if attempt >= policy.max_attempts => {
                warn!(
                    "{what}: giving up after {attempt}/{} attempts: {e}",
                    policy.max_attempts
                );
                return Err(e);
            }
            Err(e) => {
                let delay = policy.backoff.sample();
                warn!(
                    "{what}: attempt {attempt}/{} failed, retrying in {}ms: {e}",
                    policy.max_attempts,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScrapeError;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn instant_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, DelayWindow::from_millis(0, 0))
    }

    fn transient() -> ScrapeError {
        ScrapeError::Render {
            url: "https://shop.example.com/listing/1".to_string(),
            message: "connection reset".to_string(),
        }
    }

    #[tokio::test]
    async fn first_success_needs_no_retry() {
        let calls = AtomicU32::new(0);
        let result = with_retries(instant_policy(3), "op", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, ScrapeError>(42)
        })
        .await;

        assert_eq!(result.expect("should succeed"), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn transient_failures_below_budget_still_succeed() {
        // Two failures then success fits inside a three-attempt budget.
        let calls = AtomicU32::new(0);
        let result = with_retries(instant_policy(3), "op", || async {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n < 2 { Err(transient()) } else { Ok(n) }
        })
        .await;

        assert_eq!(result.expect("third attempt should succeed"), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn budget_exhaustion_returns_last_error() {
        let calls = AtomicU32::new(0);
        let result: ScrapeResult<u32> = with_retries(instant_policy(3), "op", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(transient())
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn permanent_error_fails_fast() {
        let calls = AtomicU32::new(0);
        let result: ScrapeResult<u32> = with_retries(instant_policy(3), "op", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(ScrapeError::Config("broken".to_string()))
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
