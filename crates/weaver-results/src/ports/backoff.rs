//! BackoffPolicy port: attempt index -> delay between result polls.

use std::sync::Arc;
use std::time::Duration;

/// Maps a poll attempt (0-indexed) to how long to wait before the next one.
///
/// Implementations should grow the delay with the attempt count (optionally
/// with jitter). They know nothing about deadlines; the caller decides
/// whether the delay still fits.
pub trait BackoffPolicy: Send + Sync {
    fn next_delay(&self, attempt: u32) -> Duration;
}

impl<B: BackoffPolicy + ?Sized> BackoffPolicy for Arc<B> {
    fn next_delay(&self, attempt: u32) -> Duration {
        (**self).next_delay(attempt)
    }
}
