//! Serialized access to a limiter's state.

use std::time::Instant;

use parking_lot::Mutex;

use super::backend::RateLimiter;
use super::strategy::Strategy;

/// Wraps a [`Strategy`] value so it can be shared across threads.
///
/// Every `allow` holds the lock for the whole advance/test/commit sequence,
/// so no caller ever sees a partially updated state.
#[derive(Debug)]
pub struct SharedLimiter<S> {
    state: Mutex<S>,
}

impl<S: Strategy> SharedLimiter<S> {
    pub fn new(strategy: S) -> Self {
        Self {
            state: Mutex::new(strategy),
        }
    }

    /// Inspect the state under the lock.
    pub fn with_state<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.state.lock())
    }

    pub fn into_inner(self) -> S {
        self.state.into_inner()
    }
}

impl<S: Strategy + Clone> SharedLimiter<S> {
    /// Copy of the current state.
    pub fn snapshot(&self) -> S {
        self.state.lock().clone()
    }
}

impl<S: Strategy> From<S> for SharedLimiter<S> {
    fn from(strategy: S) -> Self {
        Self::new(strategy)
    }
}

impl<S: Strategy> RateLimiter for SharedLimiter<S> {
    fn allow(&self, now: Instant) -> bool {
        self.state.lock().allow(now)
    }
}
