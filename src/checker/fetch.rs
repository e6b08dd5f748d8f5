// src/checker/fetch.rs
// =============================================================================
// The seam between "check a URL" and "talk to the network".
//
// Fetch is a tiny trait: given a URL, produce a response or an error. The
// real implementation (HttpFetcher) uses reqwest. RetryingFetcher (retry.rs)
// wraps any Fetch and is itself a Fetch, so the two can be stacked.
//
// Every fetch receives the run's CancellationToken. HttpFetcher races the
// request against the token, so Ctrl-C aborts requests that are in flight.
// =============================================================================

use async_trait::async_trait;
use reqwest::{redirect, Client, Response};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::error::FetchError;

/// Issues one GET request
#[async_trait]
pub trait Fetch: Send + Sync {
    type Response: Send;
    type Error: std::error::Error + Send + Sync + 'static;

    async fn fetch(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<Self::Response, Self::Error>;
}

// Plain reqwest-backed fetcher, no retries
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a client with a per-request timeout that covers connecting,
    /// sending and reading the body
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::limited(10))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    type Response = Response;
    type Error = FetchError;

    async fn fetch(&self, url: &str, cancel: &CancellationToken) -> Result<Response, FetchError> {
        // `biased` checks the token first, so an already cancelled run
        // never opens a connection
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            result = self.client.get(url).send() => Ok(result?),
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What are associated types (type Response; type Error;)?
//    - Each implementor picks its own concrete types
//    - HttpFetcher uses reqwest::Response, test fetchers can use a plain u32
//    - RetryingFetcher<F> just reuses whatever F picked
//
// 2. Why #[async_trait]?
//    - It lets traits have async methods that can be used from spawned tasks
//    - The macro rewrites them to return boxed, Send futures
//
// 3. Why is the Client built once?
//    - reqwest::Client keeps a connection pool
//    - Reusing it across all URLs saves TCP and TLS handshakes
// -----------------------------------------------------------------------------
