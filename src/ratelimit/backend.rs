//! Rate limiter trait shared by every admission strategy.

use std::time::Instant;

/// A request-admission policy that can be shared across threads.
///
/// `allow` makes an immediate decision and never blocks; callers decide what
/// to do with a rejected request. Each call may update internal bookkeeping
/// even when it returns `false`.
pub trait RateLimiter: Send + Sync {
    /// Decide whether a request arriving at `now` is admitted.
    fn allow(&self, now: Instant) -> bool;

    /// Decide using the monotonic system clock.
    fn allow_now(&self) -> bool {
        self.allow(Instant::now())
    }
}

impl<L: RateLimiter + ?Sized> RateLimiter for std::sync::Arc<L> {
    fn allow(&self, now: Instant) -> bool {
        (**self).allow(now)
    }
}

impl<L: RateLimiter + ?Sized> RateLimiter for Box<L> {
    fn allow(&self, now: Instant) -> bool {
        (**self).allow(now)
    }
}
