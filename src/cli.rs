// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// url-manager has no subcommands: it reads one file of URLs and checks them.
//
//   url-manager -s urls.txt            check with one worker per CPU
//   url-manager -s urls.txt --sync     one worker, results in input order
//   url-manager -s urls.txt -d         debug logging on stderr
// =============================================================================

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "url-manager",
    version = "0.1.0",
    about = "Check websites listed in a file",
    long_about = "url-manager reads a newline-delimited list of URLs and checks them concurrently, \
                  printing status, size and duration for every URL."
)]
pub struct Cli {
    /// Source file with one URL per line
    #[arg(short = 's', long = "source")]
    pub source: PathBuf,

    /// Debug logging
    #[arg(short = 'd', long)]
    pub debug: bool,

    /// Sync mode with one worker; results come out in input order
    #[arg(short = 'c', long)]
    pub sync: bool,

    /// Number of workers (defaults to the number of CPUs)
    ///
    /// Ignored when --sync is given
    #[arg(short = 'p', long)]
    pub parallel: Option<usize>,

    /// Retries after a failed request (0 = send each request once)
    #[arg(long, default_value_t = 3)]
    pub retries: u32,

    /// Wait before the first retry, in milliseconds
    #[arg(long = "min-wait", default_value_t = 2000)]
    pub min_wait_ms: u64,

    /// Upper bound for any retry wait, in milliseconds
    #[arg(long = "max-wait", default_value_t = 10_000)]
    pub max_wait_ms: u64,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["url-manager", "-s", "urls.txt"]).unwrap();
        assert_eq!(cli.source, PathBuf::from("urls.txt"));
        assert!(!cli.debug);
        assert!(!cli.sync);
        assert_eq!(cli.parallel, None);
        assert_eq!(cli.retries, 3);
        assert_eq!(cli.min_wait_ms, 2000);
        assert_eq!(cli.max_wait_ms, 10_000);
        assert_eq!(cli.timeout, 10);
    }

    #[test]
    fn test_long_flags() {
        let cli = Cli::try_parse_from([
            "url-manager",
            "--source",
            "urls.txt",
            "--debug",
            "--sync",
            "--retries",
            "0",
        ])
        .unwrap();
        assert!(cli.debug);
        assert!(cli.sync);
        assert_eq!(cli.retries, 0);
    }

    #[test]
    fn test_source_is_required() {
        let err = Cli::try_parse_from(["url-manager", "-d"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }
}
