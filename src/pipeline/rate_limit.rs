// Path: src/pipeline/rate_limit.rs
//! A minimal rate-limited log gate: caps how often worker-thread failure
//! logging fires during a burst of identical failures (spec's "fatal logger
//! exceptions... rate-limited with a threshold handler").

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Throttles a log call to at most once per `interval`, counting how many
/// calls were swallowed in between so the eventual log line can report them.
pub struct RateLimitedLogGate {
    interval: Duration,
    epoch: Instant,
    last_logged_millis: AtomicU64,
    suppressed_since_last: AtomicUsize,
}

impl RateLimitedLogGate {
    pub fn new(interval: Duration) -> Self {
        RateLimitedLogGate {
            interval,
            epoch: Instant::now(),
            last_logged_millis: AtomicU64::new(0),
            suppressed_since_last: AtomicUsize::new(0),
        }
    }

    /// Call once per candidate log event. Returns `Some(suppressed_count)`
    /// (the number of calls swallowed since the last allowed one) if the
    /// caller should log now, or `None` if this call falls inside the
    /// current throttling window and must be skipped.
    pub fn allow(&self) -> Option<usize> {
        let now = (self.epoch.elapsed().as_millis() as u64).max(1);
        let last = self.last_logged_millis.load(Ordering::Relaxed);
        let window = self.interval.as_millis() as u64;
        if last != 0 && now.saturating_sub(last) < window {
            self.suppressed_since_last.fetch_add(1, Ordering::Relaxed);
            return None;
        }
        if self
            .last_logged_millis
            .compare_exchange(last, now, Ordering::Relaxed, Ordering::Relaxed)
            .is_err()
        {
            self.suppressed_since_last.fetch_add(1, Ordering::Relaxed);
            return None;
        }
        Some(self.suppressed_since_last.swap(0, Ordering::Relaxed))
    }
}
