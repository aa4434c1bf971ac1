//! Admission strategies as plain values.

use std::time::{Duration, Instant};

use super::fixed_window::FixedWindow;
use super::leaky_bucket::LeakyBucket;
use super::sliding_counter::SlidingWindowCounter;
use super::sliding_log::SlidingWindowLog;
use super::token_bucket::TokenBucket;

/// The state of one admission policy, updated lazily from the caller's clock.
///
/// A decision is always two steps against a single `now`: bring the
/// time-driven state up to date, then test and commit the request. Wrap a
/// strategy in [`SharedLimiter`](super::SharedLimiter) to share it.
pub trait Strategy: Send {
    /// Apply window rollover, refill or leak up to `now`.
    fn advance(&mut self, now: Instant);

    /// Test the request against the up-to-date state and record it if admitted.
    fn try_admit(&mut self, now: Instant) -> bool;

    /// A fresh instance with the same parameters, started at `now`.
    fn restarted(&self, now: Instant) -> Self
    where
        Self: Sized;

    fn allow(&mut self, now: Instant) -> bool {
        self.advance(now);
        self.try_admit(now)
    }
}

/// Time elapsed from `since` to `now`. Clock skew reads as zero.
pub(crate) fn elapsed(now: Instant, since: Instant) -> Duration {
    now.saturating_duration_since(since)
}

/// Any of the five strategies, chosen at construction time.
#[derive(Debug, Clone)]
pub enum Limiter {
    FixedWindow(FixedWindow),
    SlidingLog(SlidingWindowLog),
    SlidingCounter(SlidingWindowCounter),
    TokenBucket(TokenBucket),
    LeakyBucket(LeakyBucket),
}

impl Limiter {
    /// Short strategy name used in logs and reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Limiter::FixedWindow(_) => "fixed_window",
            Limiter::SlidingLog(_) => "sliding_log",
            Limiter::SlidingCounter(_) => "sliding_counter",
            Limiter::TokenBucket(_) => "token_bucket",
            Limiter::LeakyBucket(_) => "leaky_bucket",
        }
    }
}

impl Strategy for Limiter {
    fn advance(&mut self, now: Instant) {
        match self {
            Limiter::FixedWindow(s) => s.advance(now),
            Limiter::SlidingLog(s) => s.advance(now),
            Limiter::SlidingCounter(s) => s.advance(now),
            Limiter::TokenBucket(s) => s.advance(now),
            Limiter::LeakyBucket(s) => s.advance(now),
        }
    }

    fn try_admit(&mut self, now: Instant) -> bool {
        match self {
            Limiter::FixedWindow(s) => s.try_admit(now),
            Limiter::SlidingLog(s) => s.try_admit(now),
            Limiter::SlidingCounter(s) => s.try_admit(now),
            Limiter::TokenBucket(s) => s.try_admit(now),
            Limiter::LeakyBucket(s) => s.try_admit(now),
        }
    }

    fn restarted(&self, now: Instant) -> Self {
        match self {
            Limiter::FixedWindow(s) => Limiter::FixedWindow(s.restarted(now)),
            Limiter::SlidingLog(s) => Limiter::SlidingLog(s.restarted(now)),
            Limiter::SlidingCounter(s) => Limiter::SlidingCounter(s.restarted(now)),
            Limiter::TokenBucket(s) => Limiter::TokenBucket(s.restarted(now)),
            Limiter::LeakyBucket(s) => Limiter::LeakyBucket(s.restarted(now)),
        }
    }
}

macro_rules! impl_from_strategy {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Limiter {
                fn from(strategy: $ty) -> Self {
                    Limiter::$variant(strategy)
                }
            }
        )*
    };
}

impl_from_strategy!(
    FixedWindow(FixedWindow),
    SlidingLog(SlidingWindowLog),
    SlidingCounter(SlidingWindowCounter),
    TokenBucket(TokenBucket),
    LeakyBucket(LeakyBucket),
);
