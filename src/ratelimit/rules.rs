//! Limiter rules: which strategy to build and with what parameters.
//!
//! Rules are plain serde types so they can live in the YAML configuration
//! file. Validation happens when a rule is built into a [`Limiter`].

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use super::fixed_window::FixedWindow;
use super::leaky_bucket::LeakyBucket;
use super::sliding_counter::SlidingWindowCounter;
use super::sliding_log::SlidingWindowLog;
use super::strategy::Limiter;
use super::token_bucket::TokenBucket;
use crate::error::{Result, TollgateError};

/// A single limiter rule, tagged by strategy.
///
/// ```yaml
/// strategy: token_bucket
/// capacity: 5
/// refill_per_sec: 1.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum LimiterConfig {
    FixedWindow {
        /// Maximum requests per window
        limit: u64,
        /// Window length in milliseconds
        window_ms: u64,
    },
    SlidingLog {
        limit: u64,
        window_ms: u64,
    },
    SlidingCounter {
        limit: u64,
        window_ms: u64,
    },
    TokenBucket {
        /// Burst size
        capacity: u32,
        /// Sustained requests per second
        refill_per_sec: f64,
    },
    LeakyBucket {
        /// Queue depth
        capacity: u32,
        /// Drain rate in requests per second
        leak_per_sec: f64,
    },
}

impl LimiterConfig {
    /// Strategy name as written in configuration.
    pub fn kind(&self) -> &'static str {
        match self {
            LimiterConfig::FixedWindow { .. } => "fixed_window",
            LimiterConfig::SlidingLog { .. } => "sliding_log",
            LimiterConfig::SlidingCounter { .. } => "sliding_counter",
            LimiterConfig::TokenBucket { .. } => "token_bucket",
            LimiterConfig::LeakyBucket { .. } => "leaky_bucket",
        }
    }

    /// Validate the rule and build a limiter whose clock starts at `now`.
    pub fn build(&self, now: Instant) -> Result<Limiter> {
        let limiter = match *self {
            LimiterConfig::FixedWindow { limit, window_ms } => {
                FixedWindow::new(limit, Duration::from_millis(window_ms), now)?.into()
            }
            LimiterConfig::SlidingLog { limit, window_ms } => {
                SlidingWindowLog::new(limit, Duration::from_millis(window_ms))?.into()
            }
            LimiterConfig::SlidingCounter { limit, window_ms } => {
                SlidingWindowCounter::new(limit, Duration::from_millis(window_ms), now)?.into()
            }
            LimiterConfig::TokenBucket {
                capacity,
                refill_per_sec,
            } => TokenBucket::new(capacity, refill_per_sec, now)?.into(),
            LimiterConfig::LeakyBucket {
                capacity,
                leak_per_sec,
            } => LeakyBucket::new(capacity, leak_per_sec, now)?.into(),
        };
        Ok(limiter)
    }

    /// Parse a single rule from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| TollgateError::Config(format!("Failed to parse limiter rule: {}", e)))
    }
}
