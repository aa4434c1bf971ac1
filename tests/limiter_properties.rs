//! Property and scenario tests for the rate limiters.

use std::time::{Duration, Instant};

use proptest::prelude::*;
use tollgate::ratelimit::{
    FixedWindow, KeyedRateLimiter, LeakyBucket, LimiterConfig, ManualClock, RateLimiter,
    SharedLimiter, SlidingWindowCounter, SlidingWindowLog, Strategy as _, TokenBucket,
};

/// Signed offsets in milliseconds from a base instant well after `t0`, so
/// negative steps model clock skew.
fn timeline() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-2_000i64..5_000, 1..200)
}

fn at(base: Instant, offset_ms: i64) -> Instant {
    if offset_ms >= 0 {
        base + Duration::from_millis(offset_ms as u64)
    } else {
        base - Duration::from_millis(offset_ms.unsigned_abs())
    }
}

proptest! {
    #[test]
    fn token_bucket_stays_within_bounds(
        capacity in 1u32..20,
        rate in 0.0f64..50.0,
        steps in timeline(),
    ) {
        let base = Instant::now() + Duration::from_secs(3_600);
        let mut bucket = TokenBucket::new(capacity, rate, base).unwrap();
        let mut cursor = 0i64;
        for step in steps {
            cursor += step;
            bucket.allow(at(base, cursor));
            prop_assert!(bucket.tokens() >= 0.0);
            prop_assert!(bucket.tokens() <= capacity as f64);
        }
    }

    #[test]
    fn leaky_bucket_stays_within_bounds(
        capacity in 1u32..20,
        rate in 0.0f64..50.0,
        steps in timeline(),
    ) {
        let base = Instant::now() + Duration::from_secs(3_600);
        let mut bucket = LeakyBucket::new(capacity, rate, base).unwrap();
        let mut cursor = 0i64;
        for step in steps {
            cursor += step;
            bucket.allow(at(base, cursor));
            prop_assert!(bucket.water() >= 0.0);
            prop_assert!(bucket.water() <= capacity as f64 + 1.0);
        }
    }

    #[test]
    fn sliding_log_never_exceeds_limit_in_any_window(
        limit in 1u64..10,
        gaps in prop::collection::vec(0u64..400, 1..200),
    ) {
        let window = Duration::from_secs(1);
        let t0 = Instant::now();
        let mut limiter = SlidingWindowLog::new(limit, window).unwrap();

        let mut now = t0;
        let mut admitted: Vec<Instant> = Vec::new();
        for gap in gaps {
            now += Duration::from_millis(gap);
            if limiter.allow(now) {
                admitted.push(now);
            }
            let in_window = admitted
                .iter()
                .filter(|&&t| now.duration_since(t) <= window)
                .count() as u64;
            prop_assert!(in_window <= limit);
            prop_assert!(limiter.len() as u64 <= limit);
        }
    }

    #[test]
    fn fixed_window_admits_at_most_limit_per_window(
        limit in 1u64..10,
        gaps in prop::collection::vec(0u64..300, 1..200),
    ) {
        let t0 = Instant::now();
        let mut limiter = FixedWindow::new(limit, Duration::from_secs(1), t0).unwrap();
        let mut now = t0;
        let mut admitted_in_window = 0u64;
        for gap in gaps {
            now += Duration::from_millis(gap);
            let allowed = limiter.allow(now);
            // Every call counts, so a count of one marks a fresh window.
            if limiter.count() == 1 {
                admitted_in_window = 0;
            }
            if allowed {
                admitted_in_window += 1;
            }
            prop_assert_eq!(allowed, limiter.count() <= limit);
            prop_assert!(admitted_in_window <= limit);
        }
    }

    #[test]
    fn sliding_counter_current_never_exceeds_limit(
        limit in 1u64..10,
        gaps in prop::collection::vec(0u64..800, 1..200),
    ) {
        let t0 = Instant::now();
        let mut limiter = SlidingWindowCounter::new(limit, Duration::from_secs(1), t0).unwrap();
        let mut now = t0;
        for gap in gaps {
            now += Duration::from_millis(gap);
            limiter.allow(now);
            prop_assert!(limiter.current_count() <= limit);
        }
    }
}

#[test]
fn test_fixed_window_boundary_burst() {
    let t0 = Instant::now();
    let limiter = SharedLimiter::new(FixedWindow::new(5, Duration::from_secs(10), t0).unwrap());

    let admitted = (0..5)
        .filter(|_| limiter.allow(t0 + Duration::from_millis(9_900)))
        .count()
        + (0..5)
            .filter(|_| limiter.allow(t0 + Duration::from_millis(10_100)))
            .count();
    assert_eq!(admitted, 10);
}

#[test]
fn test_sliding_window_log_accuracy() {
    let t0 = Instant::now();
    let limiter = SharedLimiter::new(SlidingWindowLog::new(3, Duration::from_secs(1)).unwrap());

    for _ in 0..3 {
        assert!(limiter.allow(t0));
    }
    assert!(!limiter.allow(t0));
    assert!(limiter.allow(t0 + Duration::from_millis(1_010)));
}

#[test]
fn test_token_bucket_burst_then_throttle() {
    let t0 = Instant::now();
    let limiter = SharedLimiter::new(TokenBucket::new(5, 1.0, t0).unwrap());

    for _ in 0..5 {
        assert!(limiter.allow(t0));
    }
    assert!(!limiter.allow(t0));
    assert!(!limiter.allow(t0 + Duration::from_millis(500)));
    assert!(limiter.allow(t0 + Duration::from_secs(1)));
}

#[test]
fn test_leaky_bucket_smoothing() {
    let t0 = Instant::now();
    let limiter = SharedLimiter::new(LeakyBucket::new(5, 1.0, t0).unwrap());

    for _ in 0..5 {
        assert!(limiter.allow(t0));
    }
    assert!(!limiter.allow(t0));
    // Half a unit drained puts the level below capacity.
    assert!(limiter.allow(t0 + Duration::from_millis(500)));
    assert!(!limiter.allow(t0 + Duration::from_millis(500)));
    assert!(!limiter.allow(t0 + Duration::from_secs(1)));
    assert!(limiter.allow(t0 + Duration::from_millis(1_500)));
    assert_eq!(limiter.snapshot().water(), 5.5);
}

#[test]
fn test_strategies_are_interchangeable() {
    let clock = ManualClock::default();
    let rules = [
        LimiterConfig::FixedWindow { limit: 3, window_ms: 1_000 },
        LimiterConfig::SlidingLog { limit: 3, window_ms: 1_000 },
        LimiterConfig::SlidingCounter { limit: 3, window_ms: 1_000 },
        LimiterConfig::TokenBucket { capacity: 3, refill_per_sec: 1.0 },
        LimiterConfig::LeakyBucket { capacity: 3, leak_per_sec: 1.0 },
    ];

    for rule in rules {
        let keyed = KeyedRateLimiter::with_clock(rule.clone(), clock.clone()).unwrap();
        let admitted = (0..10).filter(|_| keyed.check("client")).count();
        assert_eq!(admitted, 3, "{} admitted {}", rule.kind(), admitted);
    }
}
