// src/checker/http.rs
// =============================================================================
// This module checks a single URL: status code, size and latency.
//
// Key functionality:
// - Sends one logical GET through a Fetch (usually a RetryingFetcher)
// - Reads the whole body and counts the bytes
// - Measures wall-clock time, retries and body included
//
// Why count the body instead of trusting Content-Length?
// - The header can be missing (chunked responses)
// - With compression it describes the encoded size, not what we received
// =============================================================================

use async_trait::async_trait;
use reqwest::Response;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use super::fetch::Fetch;
use crate::error::{CheckError, FetchError};

// Result of one successful check
//
// "Successful" means we got a response and read its body. A 404 is still a
// successful check; its status code just says 404.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    /// Numeric HTTP status (200, 404, ...)
    pub status_code: u16,
    /// Reason phrase for the status ("OK", "Not Found", ...)
    pub status_text: String,
    /// Number of body bytes actually received
    pub content_length: u64,
    /// Time from sending the first request to the end of the body
    pub elapsed: Duration,
}

/// Checks one URL
#[async_trait]
pub trait UrlCheck: Send + Sync {
    async fn check(&self, url: &str, cancel: &CancellationToken) -> Result<CheckResult, CheckError>;
}

// The real checker, generic over how requests are sent
#[derive(Debug, Clone)]
pub struct Checker<F> {
    fetcher: F,
}

impl<F> Checker<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl<F> UrlCheck for Checker<F>
where
    F: Fetch<Response = Response, Error = FetchError>,
{
    async fn check(&self, url: &str, cancel: &CancellationToken) -> Result<CheckResult, CheckError> {
        let started = Instant::now();

        let mut response = self
            .fetcher
            .fetch(url, cancel)
            .await
            .map_err(|source| {
                // A retry wait cut short by the token hands back the last
                // transport error, not FetchError::Cancelled
                if cancel.is_cancelled() {
                    CheckError::Cancelled { url: url.to_string() }
                } else {
                    CheckError::Fetch {
                        url: url.to_string(),
                        source,
                    }
                }
            })?;

        let status = response.status();

        // The response (and its connection) is dropped on every return path,
        // including the error returns inside drain_body
        let content_length = drain_body(url, &mut response, cancel).await?;

        Ok(CheckResult {
            status_code: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            content_length,
            elapsed: started.elapsed(),
        })
    }
}

// Reads the body chunk by chunk and returns how many bytes arrived
async fn drain_body(
    url: &str,
    response: &mut Response,
    cancel: &CancellationToken,
) -> Result<u64, CheckError> {
    let mut total: u64 = 0;

    loop {
        let chunk = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(CheckError::Cancelled { url: url.to_string() });
            }
            chunk = response.chunk() => chunk.map_err(|source| CheckError::Body {
                url: url.to_string(),
                source,
            })?,
        };

        match chunk {
            Some(bytes) => total += bytes.len() as u64,
            None => return Ok(total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::backoff::RetryPolicy;
    use crate::checker::fetch::HttpFetcher;
    use crate::checker::retry::RetryingFetcher;
    use mockito::Server;

    fn checker() -> Checker<HttpFetcher> {
        Checker::new(HttpFetcher::new(Duration::from_secs(5)).unwrap())
    }

    #[tokio::test]
    async fn test_check_ok_response() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/hello")
            .with_status(200)
            .with_body("hello world")
            .create_async()
            .await;

        let result = checker()
            .check(&format!("{}/hello", server.url()), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(result.status_code, 200);
        assert_eq!(result.status_text, "OK");
        assert_eq!(result.content_length, 11);
    }

    #[tokio::test]
    async fn test_check_counts_body_without_content_length() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/chunked")
            .with_status(200)
            .with_chunked_body(|w| {
                w.write_all(b"abc")?;
                w.write_all(b"defg")
            })
            .create_async()
            .await;

        let result = checker()
            .check(&format!("{}/chunked", server.url()), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(result.content_length, 7);
    }

    #[tokio::test]
    async fn test_check_error_status_is_a_result() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/gone")
            .with_status(404)
            .with_body("nope")
            .create_async()
            .await;

        let result = checker()
            .check(&format!("{}/gone", server.url()), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(result.status_code, 404);
        assert_eq!(result.status_text, "Not Found");
        assert_eq!(result.content_length, 4);
    }

    #[tokio::test]
    async fn test_check_unknown_status_text() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/odd")
            .with_status(599)
            .create_async()
            .await;

        let result = checker()
            .check(&format!("{}/odd", server.url()), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(result.status_code, 599);
        assert_eq!(result.status_text, "Unknown");
    }

    #[tokio::test]
    async fn test_check_fetch_failure_is_attributed_to_url() {
        let policy = RetryPolicy {
            max_attempts: 0,
            ..RetryPolicy::default()
        };
        let fetcher = RetryingFetcher::new(HttpFetcher::new(Duration::from_secs(5)).unwrap(), policy);

        let err = Checker::new(fetcher)
            .check("http://127.0.0.1:1/", &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, CheckError::Fetch { .. }));
        assert!(err.to_string().contains("http://127.0.0.1:1/"));
        assert!(!err.is_cancelled());
    }

    #[tokio::test]
    async fn test_check_cancelled_before_start() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = checker().check("http://127.0.0.1:1/", &cancel).await.unwrap_err();

        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn test_check_cancelled_while_waiting_to_retry() {
        let policy = RetryPolicy {
            max_attempts: 3,
            min_wait: Duration::from_secs(5),
            max_wait: Duration::from_secs(5),
            ..RetryPolicy::default()
        };
        let fetcher = RetryingFetcher::new(HttpFetcher::new(Duration::from_secs(5)).unwrap(), policy);

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            trigger.cancel();
        });

        let started = Instant::now();
        let err = Checker::new(fetcher)
            .check("http://127.0.0.1:1/", &cancel)
            .await
            .unwrap_err();

        assert!(err.is_cancelled(), "got {err:?}");
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
