// src/checker/backoff.rs
// =============================================================================
// Backoff policies: how long to wait before retry attempt N.
//
// attempt is 0-based, so the wait before the first retry is backoff(0).
//
// Exponential:        min * 2^attempt, clamped to max
// LinearWithJitter:   declared but intentionally unsupported
// =============================================================================

use std::time::Duration;

/// Strategy used to space out retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backoff {
    /// Doubles the wait on every attempt, starting at the minimum
    #[default]
    Exponential,
    /// Not supported. Calling [`Backoff::compute`] with this variant panics.
    LinearWithJitter,
}

impl Backoff {
    /// Computes the wait before retry `attempt`.
    ///
    /// Pure: no I/O and no shared state, so the same inputs always give the
    /// same duration.
    ///
    /// # Panics
    ///
    /// Panics for [`Backoff::LinearWithJitter`], which is a programming error
    /// rather than a runtime condition.
    pub fn compute(self, min: Duration, max: Duration, attempt: u32) -> Duration {
        match self {
            Backoff::Exponential => exponential(min, max, attempt),
            Backoff::LinearWithJitter => {
                unimplemented!("linear-with-jitter backoff is not supported")
            }
        }
    }
}

/// `min * 2^attempt`, or `max` if that exceeds `max` or overflows `Duration`
pub fn exponential(min: Duration, max: Duration, attempt: u32) -> Duration {
    let wait = 2u32
        .checked_pow(attempt)
        .and_then(|factor| min.checked_mul(factor));

    match wait {
        Some(wait) if wait <= max => wait,
        _ => max,
    }
}

// Retry settings, built once at startup and shared read-only by every worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt. 0 means the request is sent once.
    pub max_attempts: u32,
    pub min_wait: Duration,
    pub max_wait: Duration,
    pub backoff: Backoff,
}

impl RetryPolicy {
    /// Wait before retry `attempt` under this policy
    pub fn wait_for(&self, attempt: u32) -> Duration {
        self.backoff.compute(self.min_wait, self.max_wait, attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            min_wait: Duration::from_secs(2),
            max_wait: Duration::from_secs(10),
            backoff: Backoff::Exponential,
        }
    }
}
