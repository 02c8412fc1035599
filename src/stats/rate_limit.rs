//! Rate-limited warnings
//!
//! A stuck client can overflow its queue on every event. This keeps the log
//! to at most one line per interval, carrying the number of suppressed hits.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Default interval between overflow warnings
pub const DEFAULT_LOG_INTERVAL: Duration = Duration::from_secs(10);

/// Gate that opens at most once per interval
#[derive(Debug)]
pub struct RateLimitedLogger {
    min_interval: Duration,
    origin: Instant,
    /// Millis since `origin` of the last open, plus one; zero means never
    last_open_ms: AtomicU64,
    suppressed: AtomicU64,
}

impl RateLimitedLogger {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            origin: Instant::now(),
            last_open_ms: AtomicU64::new(0),
            suppressed: AtomicU64::new(0),
        }
    }

    /// Record a hit
    ///
    /// Returns `Some(suppressed)` when the caller should log now, where
    /// `suppressed` counts the hits swallowed since the previous log.
    pub fn hit(&self) -> Option<u64> {
        let now_ms = self.origin.elapsed().as_millis() as u64 + 1;
        let interval_ms = self.min_interval.as_millis() as u64;
        let last = self.last_open_ms.load(Ordering::Relaxed);

        let due = last == 0 || now_ms.saturating_sub(last) >= interval_ms;
        if due
            && self
                .last_open_ms
                .compare_exchange(last, now_ms, Ordering::Relaxed, Ordering::Relaxed)
                .is_ok()
        {
            Some(self.suppressed.swap(0, Ordering::Relaxed))
        } else {
            self.suppressed.fetch_add(1, Ordering::Relaxed);
            None
        }
    }
}

impl Default for RateLimitedLogger {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_INTERVAL)
    }
}
