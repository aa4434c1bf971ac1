//! Token bucket.

use std::time::Instant;

use super::strategy::{elapsed, Strategy};
use crate::error::{ensure_positive, ensure_rate, Result};

/// Admits a request per whole token; tokens refill continuously.
///
/// Starts full, so a burst of `capacity` requests passes immediately. The
/// sustained rate is bounded by `refill_per_sec`. Refill is computed lazily
/// from the time since the last refill, and the refill clock only moves when
/// time has actually passed.
#[derive(Debug, Clone)]
pub struct TokenBucket {
    capacity: u32,
    refill_per_sec: f64,
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    pub fn new(capacity: u32, refill_per_sec: f64, now: Instant) -> Result<Self> {
        ensure_positive("capacity", capacity as u64)?;
        ensure_rate("refill_per_sec", refill_per_sec)?;
        Ok(Self {
            capacity,
            refill_per_sec,
            tokens: capacity as f64,
            last_refill: now,
        })
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn refill_per_sec(&self) -> f64 {
        self.refill_per_sec
    }

    /// Tokens available as of the last call.
    pub fn tokens(&self) -> f64 {
        self.tokens
    }
}

impl Strategy for TokenBucket {
    fn advance(&mut self, now: Instant) {
        let seconds = elapsed(now, self.last_refill).as_secs_f64();
        if seconds > 0.0 {
            self.tokens = (self.tokens + seconds * self.refill_per_sec).min(self.capacity as f64);
            self.last_refill = now;
        }
    }

    fn try_admit(&mut self, _now: Instant) -> bool {
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    fn restarted(&self, now: Instant) -> Self {
        Self {
            tokens: self.capacity as f64,
            last_refill: now,
            ..self.clone()
        }
    }
}
