// src/checker/retry.rs
// =============================================================================
// A Fetch decorator that re-issues failed requests.
//
// Retry rules:
// - attempt 0 always happens, immediately
// - only transport errors are retried; a 404 or 500 is a successful fetch
// - after a failure, wait policy.wait_for(i) and try again, for i in
//   0..max_attempts, stopping at the first success
// - the last result wins, whether it is a success or a failure
// - a cancelled wait stops the loop and returns the last failure
// =============================================================================

use async_trait::async_trait;
use log::debug;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::backoff::RetryPolicy;
use super::fetch::Fetch;

#[derive(Debug, Clone)]
pub struct RetryingFetcher<F> {
    inner: F,
    policy: RetryPolicy,
}

impl<F> RetryingFetcher<F> {
    pub fn new(inner: F, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl<F: Fetch> Fetch for RetryingFetcher<F> {
    type Response = F::Response;
    type Error = F::Error;

    async fn fetch(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<Self::Response, Self::Error> {
        let mut result = self.inner.fetch(url, cancel).await;

        for attempt in 0..self.policy.max_attempts {
            if let Err(err) = &result {
                let wait = self.policy.wait_for(attempt);
                debug!(
                    "GET {url} failed ({err}), retry {}/{} in {wait:?}",
                    attempt + 1,
                    self.policy.max_attempts
                );

                if !wait_or_cancel(wait, cancel).await {
                    debug!("GET {url}: retry wait interrupted by cancellation");
                    break;
                }

                result = self.inner.fetch(url, cancel).await;
            } else {
                break;
            }
        }

        result
    }
}

// Sleeps for `wait` unless the token fires first.
// Returns false if the wait was cut short.
async fn wait_or_cancel(wait: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(wait) => true,
    }
}
