//! Per-key rate limiting.

use dashmap::DashMap;
use std::time::Instant;
use tracing::{debug, trace};

use super::backend::RateLimiter;
use super::clock::{Clock, SystemClock};
use super::rules::LimiterConfig;
use super::shared::SharedLimiter;
use super::strategy::{Limiter, Strategy};
use crate::error::Result;

/// One limiter per key (client, IP address, API key, ...), all built from the
/// same rule.
///
/// Limiters are created lazily on a key's first request with their clock
/// starting at that request. Each key's limiter is serialized on its own
/// lock; different keys never contend on limiter state.
///
/// Idle keys are never evicted automatically: a limiter stays in the map
/// until [`remove`](Self::remove) or [`clear`](Self::clear). Callers keyed by
/// unbounded populations such as client IPs own eviction of idle keys.
pub struct KeyedRateLimiter<C = SystemClock> {
    /// Limiters indexed by key
    limiters: DashMap<String, SharedLimiter<Limiter>>,
    /// Validated prototype that new keys are restarted from
    template: Limiter,
    rule: LimiterConfig,
    clock: C,
}

impl KeyedRateLimiter<SystemClock> {
    /// Create a keyed limiter on the system clock.
    pub fn new(rule: LimiterConfig) -> Result<Self> {
        Self::with_clock(rule, SystemClock)
    }
}

impl<C: Clock> KeyedRateLimiter<C> {
    /// Create a keyed limiter reading time from `clock`.
    ///
    /// The rule is validated here so that per-key creation cannot fail.
    pub fn with_clock(rule: LimiterConfig, clock: C) -> Result<Self> {
        let template = rule.build(clock.now())?;
        Ok(Self {
            limiters: DashMap::new(),
            template,
            rule,
            clock,
        })
    }

    /// Decide a request for `key` at the clock's current time.
    pub fn check(&self, key: &str) -> bool {
        let now = self.clock.now();
        self.check_at(key, now)
    }

    /// Decide a request for `key` at `now`.
    pub fn check_at(&self, key: &str, now: Instant) -> bool {
        trace!(key, strategy = self.template.kind(), "Checking rate limit");

        let allowed = match self.limiters.get(key) {
            Some(limiter) => limiter.allow(now),
            None => self
                .limiters
                .entry(key.to_string())
                .or_insert_with(|| {
                    debug!(
                        key,
                        strategy = self.template.kind(),
                        "Creating new rate limiter"
                    );
                    SharedLimiter::new(self.template.restarted(now))
                })
                .allow(now),
        };

        if !allowed {
            debug!(key, "Rate limit exceeded");
        }
        allowed
    }

    /// The rule every key's limiter is built from.
    pub fn rule(&self) -> &LimiterConfig {
        &self.rule
    }

    /// Copy of the limiter state for `key`, if it has one.
    pub fn snapshot(&self, key: &str) -> Option<Limiter> {
        self.limiters.get(key).map(|l| l.snapshot())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.limiters.contains_key(key)
    }

    /// Forget a key's limiter. Its next request starts from a fresh limiter.
    pub fn remove(&self, key: &str) -> bool {
        self.limiters.remove(key).is_some()
    }

    /// Clear all limiters.
    pub fn clear(&self) {
        self.limiters.clear();
    }

    /// Get the number of active limiters.
    pub fn len(&self) -> usize {
        self.limiters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limiters.is_empty()
    }
}
