// src/config.rs
// =============================================================================
// Turns parsed CLI arguments into the settings the pipeline runs with.
//
// Everything is resolved here, once, so the rest of the program never looks
// at global state: the worker count is an explicit number handed to the
// Manager, and the retry policy is an immutable value shared by all workers.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use crate::checker::{Backoff, RetryPolicy};
use crate::cli::Cli;
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub source: PathBuf,
    /// Number of workers, always at least 1
    pub parallelism: usize,
    pub client_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Config {
    /// `default_parallelism` is used when neither --sync nor --parallel is given
    pub fn from_cli(cli: &Cli, default_parallelism: usize) -> Result<Self, ConfigError> {
        let parallelism = if cli.sync {
            1
        } else {
            cli.parallel.unwrap_or(default_parallelism)
        };

        if parallelism == 0 {
            return Err(ConfigError::ZeroParallelism);
        }

        if cli.min_wait_ms > cli.max_wait_ms {
            return Err(ConfigError::WaitRange {
                min_ms: cli.min_wait_ms,
                max_ms: cli.max_wait_ms,
            });
        }

        Ok(Self {
            source: cli.source.clone(),
            parallelism,
            client_timeout: Duration::from_secs(cli.timeout),
            retry: RetryPolicy {
                max_attempts: cli.retries,
                min_wait: Duration::from_millis(cli.min_wait_ms),
                max_wait: Duration::from_millis(cli.max_wait_ms),
                backoff: Backoff::Exponential,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        let mut full = vec!["url-manager", "-s", "urls.txt"];
        full.extend_from_slice(args);
        Cli::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_defaults_match_retry_policy_default() {
        let config = Config::from_cli(&cli(&[]), 8).unwrap();
        assert_eq!(config.parallelism, 8);
        assert_eq!(config.client_timeout, Duration::from_secs(10));
        assert_eq!(config.retry, RetryPolicy::default());
    }

    #[test]
    fn test_sync_forces_one_worker() {
        let config = Config::from_cli(&cli(&["--sync", "-p", "16"]), 8).unwrap();
        assert_eq!(config.parallelism, 1);
    }

    #[test]
    fn test_explicit_parallelism() {
        let config = Config::from_cli(&cli(&["-p", "3"]), 8).unwrap();
        assert_eq!(config.parallelism, 3);
    }

    #[test]
    fn test_zero_parallelism_rejected() {
        let err = Config::from_cli(&cli(&["-p", "0"]), 8).unwrap_err();
        assert_eq!(err, ConfigError::ZeroParallelism);
    }

    #[test]
    fn test_inverted_wait_range_rejected() {
        let err = Config::from_cli(&cli(&["--min-wait", "500", "--max-wait", "100"]), 8).unwrap_err();
        assert_eq!(
            err,
            ConfigError::WaitRange {
                min_ms: 500,
                max_ms: 100
            }
        );
    }
}
