//! Sliding window log.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use super::strategy::{elapsed, Strategy};
use crate::error::{ensure_positive, ensure_window, Result};

/// Keeps the timestamp of every admitted request still inside the window.
///
/// Exact, at the cost of holding up to `limit` timestamps. Entries older than
/// `window` are evicted from the front on every call.
#[derive(Debug, Clone)]
pub struct SlidingWindowLog {
    limit: u64,
    window: Duration,
    /// Admitted request times, oldest first
    log: VecDeque<Instant>,
}

impl SlidingWindowLog {
    pub fn new(limit: u64, window: Duration) -> Result<Self> {
        ensure_positive("limit", limit)?;
        ensure_window("window", window)?;
        Ok(Self {
            limit,
            window,
            log: VecDeque::new(),
        })
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Number of admitted requests still retained.
    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Oldest retained request time.
    pub fn oldest(&self) -> Option<Instant> {
        self.log.front().copied()
    }
}

impl Strategy for SlidingWindowLog {
    fn advance(&mut self, now: Instant) {
        while let Some(&oldest) = self.log.front() {
            if elapsed(now, oldest) <= self.window {
                break;
            }
            self.log.pop_front();
        }
    }

    fn try_admit(&mut self, now: Instant) -> bool {
        if (self.log.len() as u64) >= self.limit {
            return false;
        }
        // Never record a time earlier than the newest entry so the log stays
        // sorted and front eviction stays correct under clock skew.
        let stamp = match self.log.back() {
            Some(&newest) if newest > now => newest,
            _ => now,
        };
        self.log.push_back(stamp);
        true
    }

    fn restarted(&self, _now: Instant) -> Self {
        Self {
            limit: self.limit,
            window: self.window,
            log: VecDeque::new(),
        }
    }
}
