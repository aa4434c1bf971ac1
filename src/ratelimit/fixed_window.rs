//! Fixed window counter.

use std::time::{Duration, Instant};

use super::strategy::{elapsed, Strategy};
use crate::error::{ensure_positive, ensure_window, Result};

/// Counts requests in consecutive fixed windows.
///
/// The window restarts at the first call made `window` or more after the
/// current window began. Every call counts, admitted or not. Up to twice the
/// limit can pass around a window boundary: a full window's worth at the end
/// of one window and another at the start of the next.
#[derive(Debug, Clone)]
pub struct FixedWindow {
    /// Maximum requests per window
    limit: u64,
    /// Length of each window
    window: Duration,
    /// When the current window started
    window_start: Instant,
    /// Requests seen in the current window
    count: u64,
}

impl FixedWindow {
    /// Create a fixed window limiter whose first window starts at `now`.
    pub fn new(limit: u64, window: Duration, now: Instant) -> Result<Self> {
        ensure_positive("limit", limit)?;
        ensure_window("window", window)?;
        Ok(Self {
            limit,
            window,
            window_start: now,
            count: 0,
        })
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Requests counted in the current window, including rejected ones.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Get the remaining quota in the current window.
    pub fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.count)
    }

    /// Get the duration until the current window resets.
    pub fn duration_until_reset(&self, now: Instant) -> Duration {
        self.window.saturating_sub(elapsed(now, self.window_start))
    }
}

impl Strategy for FixedWindow {
    fn advance(&mut self, now: Instant) {
        if elapsed(now, self.window_start) >= self.window {
            self.window_start = now;
            self.count = 0;
        }
    }

    fn try_admit(&mut self, _now: Instant) -> bool {
        self.count = self.count.saturating_add(1);
        self.count <= self.limit
    }

    fn restarted(&self, now: Instant) -> Self {
        Self {
            window_start: now,
            count: 0,
            ..self.clone()
        }
    }
}
