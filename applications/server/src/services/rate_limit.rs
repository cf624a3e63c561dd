//! Approximate request throttling
//!
//! Fixed-window counter over a single process-wide window. Concurrent
//! requests can race the window rollover and let a handful of extra
//! requests through at the boundary; the limit is a coarse safeguard,
//! not an accounting tool. State resets on restart.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::{Duration, Instant};

pub struct RateLimiter {
    limit: u32,
    window: Duration,
    started: Instant,
    current_window: AtomicU64,
    count: AtomicU32,
}

impl RateLimiter {
    /// Limit requests per minute; 0 disables throttling
    pub fn new(limit_per_minute: u32) -> Self {
        Self::with_window(limit_per_minute, Duration::from_secs(60))
    }

    /// Limiter with a custom window length
    pub fn with_window(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            started: Instant::now(),
            current_window: AtomicU64::new(0),
            count: AtomicU32::new(0),
        }
    }

    /// Count one request against the current window.
    ///
    /// Returns false when the request would exceed the limit.
    pub fn try_acquire(&self) -> bool {
        if self.limit == 0 {
            return true;
        }

        let window_index =
            (self.started.elapsed().as_millis() / self.window.as_millis().max(1)) as u64;
        if self.current_window.swap(window_index, Ordering::Relaxed) != window_index {
            self.count.store(0, Ordering::Relaxed);
        }

        self.count.fetch_add(1, Ordering::Relaxed) < self.limit
    }
}
