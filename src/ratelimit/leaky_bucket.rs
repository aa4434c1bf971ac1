//! Leaky bucket.

use std::time::Instant;

use super::strategy::{elapsed, Strategy};
use crate::error::{ensure_positive, ensure_rate, Result};

/// Each admitted request adds one unit of water; the bucket drains at
/// `leak_per_sec`.
///
/// Starts empty. A request is admitted while the level is below `capacity`,
/// so an admission can lift the level to just under `capacity + 1`. Once
/// full, admission follows the leak rate.
#[derive(Debug, Clone)]
pub struct LeakyBucket {
    capacity: u32,
    leak_per_sec: f64,
    water: f64,
    last_leak: Instant,
}

impl LeakyBucket {
    pub fn new(capacity: u32, leak_per_sec: f64, now: Instant) -> Result<Self> {
        ensure_positive("capacity", capacity as u64)?;
        ensure_rate("leak_per_sec", leak_per_sec)?;
        Ok(Self {
            capacity,
            leak_per_sec,
            water: 0.0,
            last_leak: now,
        })
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn leak_per_sec(&self) -> f64 {
        self.leak_per_sec
    }

    /// Water level as of the last call.
    pub fn water(&self) -> f64 {
        self.water
    }
}

impl Strategy for LeakyBucket {
    fn advance(&mut self, now: Instant) {
        let seconds = elapsed(now, self.last_leak).as_secs_f64();
        if seconds > 0.0 {
            self.water = (self.water - seconds * self.leak_per_sec).max(0.0);
            self.last_leak = now;
        }
    }

    fn try_admit(&mut self, _now: Instant) -> bool {
        if self.water < self.capacity as f64 {
            self.water += 1.0;
            true
        } else {
            false
        }
    }

    fn restarted(&self, now: Instant) -> Self {
        Self {
            water: 0.0,
            last_leak: now,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn ms(t0: Instant, millis: u64) -> Instant {
        t0 + Duration::from_millis(millis)
    }

    #[test]
    fn test_invalid_parameters() {
        let t0 = Instant::now();
        assert!(LeakyBucket::new(0, 1.0, t0).is_err());
        assert!(LeakyBucket::new(5, -2.0, t0).is_err());
        assert!(LeakyBucket::new(5, f64::INFINITY, t0).is_err());
    }

    #[test]
    fn test_fills_to_capacity() {
        let t0 = Instant::now();
        let mut bucket = LeakyBucket::new(5, 1.0, t0).unwrap();

        for _ in 0..5 {
            assert!(bucket.allow(t0));
        }
        assert!(!bucket.allow(t0));
        assert_eq!(bucket.water(), 5.0);
    }

    #[test]
    fn test_admits_once_level_drops_below_capacity() {
        let t0 = Instant::now();
        let mut bucket = LeakyBucket::new(5, 1.0, t0).unwrap();
        for _ in 0..5 {
            assert!(bucket.allow(t0));
        }

        bucket.advance(ms(t0, 500));
        assert_eq!(bucket.water(), 4.5);
        assert!(bucket.allow(ms(t0, 500)));
        assert_eq!(bucket.water(), 5.5);
        assert!(!bucket.allow(ms(t0, 500)));
    }

    #[test]
    fn test_admits_at_leak_rate_once_full() {
        let t0 = Instant::now();
        let mut bucket = LeakyBucket::new(5, 1.0, t0).unwrap();
        for _ in 0..5 {
            assert!(bucket.allow(t0));
        }

        assert!(bucket.allow(ms(t0, 500)));
        // Back to exactly capacity, which is not below it.
        assert!(!bucket.allow(ms(t0, 1_000)));
        assert!(bucket.allow(ms(t0, 1_500)));

        // Frequent polling does not speed admission up.
        let admitted = (1..=40)
            .filter(|i| bucket.allow(ms(t0, 1_500 + i * 125)))
            .count();
        assert_eq!(admitted, 5);
        assert!(bucket.water() < 6.0);
    }

    #[test]
    fn test_drains_to_empty() {
        let t0 = Instant::now();
        let mut bucket = LeakyBucket::new(3, 2.0, t0).unwrap();
        for _ in 0..3 {
            assert!(bucket.allow(t0));
        }
        bucket.advance(ms(t0, 10_000));
        assert_eq!(bucket.water(), 0.0);
    }

    #[test]
    fn test_clock_skew_is_ignored() {
        let t0 = Instant::now();
        let mut bucket = LeakyBucket::new(1, 1.0, ms(t0, 5_000)).unwrap();
        assert!(bucket.allow(ms(t0, 5_000)));
        assert!(!bucket.allow(t0));
        assert_eq!(bucket.water(), 1.0);
    }
}
