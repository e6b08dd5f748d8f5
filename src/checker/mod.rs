// src/checker/mod.rs
// =============================================================================
// This module contains everything needed to check one URL.
//
// Submodules:
// - backoff: How long to wait between retries
// - fetch:   The Fetch trait and the reqwest-backed HttpFetcher
// - retry:   RetryingFetcher, a Fetch that retries another Fetch
// - http:    Checker, which turns a fetch into a CheckResult
//
// The layers stack like this:
//
//   Checker -> RetryingFetcher -> HttpFetcher -> reqwest::Client
// =============================================================================

mod backoff;
mod fetch;
mod http;
mod retry;

pub use backoff::{Backoff, RetryPolicy};
pub use fetch::HttpFetcher;
pub use http::{CheckResult, Checker, UrlCheck};
pub use retry::RetryingFetcher;
