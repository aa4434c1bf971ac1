//! Rate limiting strategies and state management.
//!
//! Five interchangeable strategies share one [`RateLimiter`] interface:
//! fixed window, sliding window log, sliding window counter, token bucket and
//! leaky bucket. Each is a plain value implementing [`Strategy`]; wrap it in a
//! [`SharedLimiter`] to call it from many threads, or use
//! [`KeyedRateLimiter`] for one limiter per client.
//!
//! All state advances lazily from the `now` passed to each call. There are no
//! background timers.

mod backend;
mod clock;
mod fixed_window;
mod leaky_bucket;
mod limiter;
mod rules;
mod shared;
mod sliding_counter;
mod sliding_log;
mod strategy;
mod token_bucket;

pub use backend::RateLimiter;
pub use clock::{Clock, ManualClock, SystemClock};
pub use fixed_window::FixedWindow;
pub use leaky_bucket::LeakyBucket;
pub use limiter::KeyedRateLimiter;
pub use rules::LimiterConfig;
pub use shared::SharedLimiter;
pub use sliding_counter::SlidingWindowCounter;
pub use sliding_log::SlidingWindowLog;
pub use strategy::{Limiter, Strategy};
pub use token_bucket::TokenBucket;
