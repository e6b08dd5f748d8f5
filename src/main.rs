// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging and resolve the configuration
// 3. Open the source file (fail fast if we can't)
// 4. Wire HttpFetcher -> RetryingFetcher -> Checker -> Manager
// 5. Run until the input is done or Ctrl-C / SIGTERM cancels the run
//
// Exit codes:
//   0 = run finished (also after a cancellation, which is not an error)
//   1 = the run could not start (bad options, unreadable source)
//   2 = unexpected error
// =============================================================================

mod checker;
mod cli;
mod config;
mod error;
mod logging;
mod manager;
mod output;
mod source;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, error};
use std::io;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use checker::{Checker, HttpFetcher, RetryingFetcher};
use cli::Cli;
use config::Config;
use error::{RunError, SourceError};
use manager::{Manager, RunSummary};
use output::TextPrinter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logger(cli.debug);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run(cli: Cli) -> Result<i32> {
    let config = match Config::from_cli(&cli, num_cpus::get()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return Ok(1);
        }
    };
    logging::log_config(&config);

    let source = match source::open_source(&config.source).await {
        Ok(source) => source,
        Err(e) => {
            report_source_error(&e);
            return Ok(1);
        }
    };

    let fetcher = HttpFetcher::new(config.client_timeout).context("failed to build HTTP client")?;
    let checker = Arc::new(Checker::new(RetryingFetcher::new(fetcher, config.retry)));
    let printer = Arc::new(TextPrinter::new(io::stdout()));

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_signal(cancel.clone()));

    let manager = Manager::new(source, checker, printer, config.parallelism);
    match manager.run(cancel).await {
        Ok(summary) => {
            log_summary(&summary);
            Ok(0)
        }
        Err(RunError::Cancelled) => {
            debug!("run cancelled by signal");
            Ok(0)
        }
    }
}

// Pre-run failures are shown even without --debug
fn report_source_error(e: &SourceError) {
    match e {
        SourceError::NotFound { .. } => eprintln!("Error: source file not found"),
        SourceError::PermissionDenied { .. } => eprintln!("Error: source file permission denied"),
        other => eprintln!("Error: {other}"),
    }
}

fn log_summary(summary: &RunSummary) {
    debug!(
        "{} URLs checked, {} dropped, {} invalid lines, {} unreadable lines",
        summary.checked, summary.dropped, summary.invalid, summary.read_errors
    );
}

// Cancels the run on Ctrl-C, or on SIGTERM where that exists
async fn cancel_on_signal(cancel: CancellationToken) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut term = match signal(SignalKind::terminate()) {
            Ok(term) => term,
            Err(e) => {
                error!("cannot listen for SIGTERM: {e}");
                let _ = tokio::signal::ctrl_c().await;
                cancel.cancel();
                return;
            }
        };

        tokio::select! {
            _ = tokio::signal::ctrl_c() => debug!("received SIGINT"),
            _ = term.recv() => debug!("received SIGTERM"),
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        debug!("received Ctrl-C");
    }

    cancel.cancel();
}
