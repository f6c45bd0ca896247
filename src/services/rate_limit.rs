// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-client request limiter.
//!
//! A keyed GCRA limiter from `governor`: each client may burst up to
//! `max_requests`, and capacity refills evenly over `window`.

use governor::{
    clock::{Clock, DefaultClock},
    middleware::StateInformationMiddleware,
    state::keyed::DefaultKeyedStateStore,
    Quota,
};
use std::num::NonZeroU32;
use std::time::Duration;

type KeyedLimiter = governor::RateLimiter<
    String,
    DefaultKeyedStateStore<String>,
    DefaultClock,
    StateInformationMiddleware,
>;

/// Outcome of a single admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

/// Counts requests per client key.
pub struct RateLimiter {
    max_requests: u32,
    limiter: KeyedLimiter,
    clock: DefaultClock,
}

impl RateLimiter {
    /// `max_requests` per `window`; a zero limit is treated as one.
    pub fn new(window: Duration, max_requests: u32) -> Self {
        let burst = NonZeroU32::new(max_requests).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::with_period(window / burst.get())
            .unwrap_or_else(|| Quota::per_second(burst))
            .allow_burst(burst);

        Self {
            max_requests: burst.get(),
            limiter: governor::RateLimiter::keyed(quota)
                .with_middleware::<StateInformationMiddleware>(),
            clock: DefaultClock::default(),
        }
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    /// Record a request from `key` unless it is over the limit.
    pub fn check(&self, key: &str) -> RateDecision {
        match self.limiter.check_key(&key.to_string()) {
            Ok(snapshot) => RateDecision::Allowed {
                remaining: snapshot.remaining_burst_capacity(),
            },
            Err(not_until) => RateDecision::Limited {
                retry_after: not_until.wait_time_from(self.clock.now()),
            },
        }
    }

    /// Forget clients whose state has fully refilled.
    pub fn prune(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits_after_max_requests() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 3);

        assert_eq!(
            limiter.check("1.2.3.4"),
            RateDecision::Allowed { remaining: 2 }
        );
        assert_eq!(
            limiter.check("1.2.3.4"),
            RateDecision::Allowed { remaining: 1 }
        );
        assert_eq!(
            limiter.check("1.2.3.4"),
            RateDecision::Allowed { remaining: 0 }
        );
        assert!(matches!(
            limiter.check("1.2.3.4"),
            RateDecision::Limited { .. }
        ));

        // Other clients are unaffected.
        assert!(matches!(
            limiter.check("5.6.7.8"),
            RateDecision::Allowed { .. }
        ));
    }

    #[test]
    fn test_retry_after_within_refill_interval() {
        let limiter = RateLimiter::new(Duration::from_secs(10), 1);
        limiter.check("client");

        match limiter.check("client") {
            RateDecision::Limited { retry_after } => {
                assert!(retry_after > Duration::ZERO);
                assert!(retry_after <= Duration::from_secs(10));
            }
            other => panic!("expected limit, got {:?}", other),
        }
    }

    #[test]
    fn test_capacity_refills() {
        let limiter = RateLimiter::new(Duration::from_millis(20), 1);
        assert!(matches!(limiter.check("client"), RateDecision::Allowed { .. }));
        assert!(matches!(limiter.check("client"), RateDecision::Limited { .. }));

        std::thread::sleep(Duration::from_millis(40));
        assert!(matches!(limiter.check("client"), RateDecision::Allowed { .. }));
    }

    #[test]
    fn test_zero_limit_allows_one() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 0);
        assert_eq!(limiter.max_requests(), 1);
        assert!(matches!(limiter.check("client"), RateDecision::Allowed { .. }));
        assert!(matches!(limiter.check("client"), RateDecision::Limited { .. }));
    }

    #[test]
    fn test_prune_drops_idle_clients() {
        let limiter = RateLimiter::new(Duration::from_millis(5), 5);
        limiter.check("idle");
        assert_eq!(limiter.tracked_clients(), 1);

        std::thread::sleep(Duration::from_millis(30));
        limiter.prune();
        assert_eq!(limiter.tracked_clients(), 0);
    }
}
