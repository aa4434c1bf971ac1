//! Sliding window counter.

use std::time::{Duration, Instant};

use super::strategy::{elapsed, Strategy};
use crate::error::{ensure_positive, ensure_window, Result};

/// Approximates a sliding window with two counters.
///
/// The previous window's count is weighted by how much of it still overlaps
/// the sliding window, assuming its requests were spread evenly:
///
/// ```text
/// estimate = previous * (1 - elapsed / window) + current
/// ```
///
/// A request is admitted while `estimate < limit`. When a window rolls over
/// the current count becomes the previous one, however long ago the current
/// window began.
#[derive(Debug, Clone)]
pub struct SlidingWindowCounter {
    limit: u64,
    window: Duration,
    current_window_start: Instant,
    current_count: u64,
    previous_count: u64,
}

impl SlidingWindowCounter {
    pub fn new(limit: u64, window: Duration, now: Instant) -> Result<Self> {
        ensure_positive("limit", limit)?;
        ensure_window("window", window)?;
        Ok(Self {
            limit,
            window,
            current_window_start: now,
            current_count: 0,
            previous_count: 0,
        })
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn current_count(&self) -> u64 {
        self.current_count
    }

    pub fn previous_count(&self) -> u64 {
        self.previous_count
    }

    /// Weighted request count at `now`, without rolling the window.
    pub fn estimate(&self, now: Instant) -> f64 {
        let elapsed = elapsed(now, self.current_window_start)
            .min(self.window)
            .as_secs_f64();
        let weight = 1.0 - elapsed / self.window.as_secs_f64();
        self.previous_count as f64 * weight + self.current_count as f64
    }
}

impl Strategy for SlidingWindowCounter {
    fn advance(&mut self, now: Instant) {
        if elapsed(now, self.current_window_start) >= self.window {
            self.previous_count = self.current_count;
            self.current_count = 0;
            self.current_window_start = now;
        }
    }

    fn try_admit(&mut self, now: Instant) -> bool {
        if self.estimate(now) < self.limit as f64 {
            self.current_count += 1;
            true
        } else {
            false
        }
    }

    fn restarted(&self, now: Instant) -> Self {
        Self {
            current_window_start: now,
            current_count: 0,
            previous_count: 0,
            ..self.clone()
        }
    }
}
