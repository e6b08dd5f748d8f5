// src/logging.rs
// Logger setup. Logs go to stderr so stdout only carries result lines.

use log::{debug, LevelFilter};

use crate::config::Config;

/// Errors only, or everything down to debug with `-d`.
/// RUST_LOG is read first; the flag decides the final level.
pub fn init_logger(debug: bool) {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Error
    };

    // try_init: a second call (e.g. from tests) is a no-op instead of a panic
    let _ = env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp_millis()
        .format_target(false)
        .target(env_logger::Target::Stderr)
        .try_init();

    debug!("logger initialized with level {level:?}");
}

pub fn log_config(config: &Config) {
    debug!(
        "config: source={}, workers={}, timeout={:?}",
        config.source.display(),
        config.parallelism,
        config.client_timeout
    );
    debug!(
        "retry: attempts={}, min_wait={:?}, max_wait={:?}, backoff={:?}",
        config.retry.max_attempts,
        config.retry.min_wait,
        config.retry.max_wait,
        config.retry.backoff
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logger_twice_does_not_panic() {
        init_logger(true);
        init_logger(false);
    }
}
