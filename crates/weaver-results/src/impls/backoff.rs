//! Capped exponential backoff with optional jitter.

use std::time::Duration;

use rand::Rng;

use crate::ports::BackoffPolicy;

/// Default growth factor (delay of attempt 0 before jitter).
pub const DEFAULT_FACTOR: Duration = Duration::from_millis(50);

/// Default cap on a single delay.
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_millis(2_000);

/// Exponents above this are clamped; the cap is hit long before anyway.
pub const DEFAULT_MAX_EXPONENT: u32 = 32;

/// Backoff policy for result polling.
///
/// delay = min(factor * 2^min(attempt, max_exponent), max_backoff)
///
/// With jitter enabled, the delay is drawn uniformly from `[delay/2, delay]`
/// so that many waiters on the same store don't poll in lockstep.
///
/// Example with factor=50ms, max_backoff=2s, no jitter:
/// - attempt 0: 50ms
/// - attempt 1: 100ms
/// - attempt 2: 200ms
/// - attempt 5: 1.6s
/// - attempt 6+: 2s
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    pub factor: Duration,
    pub max_backoff: Duration,
    pub max_exponent: u32,
    pub jitter: bool,
}

impl ExponentialBackoff {
    pub fn new(factor: Duration, max_backoff: Duration) -> Self {
        Self {
            factor,
            max_backoff,
            max_exponent: DEFAULT_MAX_EXPONENT,
            jitter: true,
        }
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Delay before jitter is applied.
    pub fn capped_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.min(self.max_exponent);
        let factor_ms = duration_millis(self.factor);
        let multiplier = 1_u64.checked_shl(exponent).unwrap_or(u64::MAX);
        let delay_ms = factor_ms
            .saturating_mul(multiplier)
            .min(duration_millis(self.max_backoff));
        Duration::from_millis(delay_ms)
    }
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self::new(DEFAULT_FACTOR, DEFAULT_MAX_BACKOFF)
    }
}

impl BackoffPolicy for ExponentialBackoff {
    fn next_delay(&self, attempt: u32) -> Duration {
        let delay = self.capped_delay(attempt);
        if !self.jitter {
            return delay;
        }

        let half_ms = duration_millis(delay) / 2;
        let jitter_ms = rand::thread_rng().gen_range(0..=half_ms);
        Duration::from_millis(half_ms + jitter_ms)
    }
}

fn duration_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
