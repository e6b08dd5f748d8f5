// src/error.rs
// =============================================================================
// Error types shared across the pipeline.
//
// Each stage of the pipeline has its own error enum so the log line for a
// failure says which URL broke and in which phase (open, read, fetch, body,
// emit). main.rs converts whatever reaches it into anyhow::Error.
//
// Rust concepts:
// - thiserror: derive Display + Error for enums instead of writing them by hand
// - #[source] / #[from]: keep the underlying cause for error chains
// =============================================================================

use std::io;
use thiserror::Error;

// Errors from the line source (the URL file)
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source file does not exist
    #[error("source file not found: {path}")]
    NotFound { path: String },

    /// We are not allowed to read the source file
    #[error("source file permission denied: {path}")]
    PermissionDenied { path: String },

    /// Any other failure while opening the file
    #[error("failed to open source file {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Reading the next line failed
    #[error("failed to read line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },

    /// The line was read but is not valid UTF-8
    #[error("line {line} is not valid UTF-8")]
    Decode { line: usize },
}

// Errors from a single HTTP fetch
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network, DNS, TLS or timeout failure reported by reqwest
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The cancellation token fired while the request was in flight
    #[error("request cancelled")]
    Cancelled,
}

// Errors from checking one URL
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("fetch {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("reading body of {url} failed: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("check of {url} cancelled")]
    Cancelled { url: String },
}

impl CheckError {
    /// True when the check stopped because the run was cancelled, not
    /// because the URL itself failed
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            CheckError::Cancelled { .. }
                | CheckError::Fetch {
                    source: FetchError::Cancelled,
                    ..
                }
        )
    }
}

// Terminal outcome of a run that did not succeed
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RunError {
    #[error("run cancelled")]
    Cancelled,
}

// Invalid combinations of command-line options
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("parallelism must be at least 1")]
    ZeroParallelism,

    #[error("min wait ({min_ms}ms) is greater than max wait ({max_ms}ms)")]
    WaitRange { min_ms: u64, max_ms: u64 },
}
