//! # Feature: Rate Limiting
//!
//! Stops command spam with a per-user sliding window. Backed by DashMap so the
//! prefix and slash paths can share one limiter.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Report how long a limited user has to wait
//! - 1.0.0: Initial release with per-user sliding window rate limiting

use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::{RATE_LIMIT, TIME_WINDOW_SECS};

/// Idle users are swept out once per this many checks.
const PRUNE_EVERY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed,
    Limited { retry_after: Duration },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateDecision::Allowed)
    }
}

#[derive(Clone)]
pub struct RateLimiter {
    requests: Arc<DashMap<u64, Vec<Instant>>>,
    checks: Arc<AtomicUsize>,
    max_requests: usize,
    time_window: Duration,
}

impl Default for RateLimiter {
    fn default() -> Self {
        RateLimiter::new(RATE_LIMIT, Duration::from_secs(TIME_WINDOW_SECS))
    }
}

impl RateLimiter {
    pub fn new(max_requests: usize, time_window: Duration) -> Self {
        RateLimiter {
            requests: Arc::new(DashMap::new()),
            checks: Arc::new(AtomicUsize::new(0)),
            max_requests,
            time_window,
        }
    }

    /// Records the attempt when it is allowed.
    pub fn check(&self, user_id: u64) -> RateDecision {
        if self.checks.fetch_add(1, Ordering::Relaxed) % PRUNE_EVERY == PRUNE_EVERY - 1 {
            self.prune();
        }

        let now = Instant::now();
        let mut entry = self.requests.entry(user_id).or_default();

        entry.retain(|&time| now.duration_since(time) < self.time_window);

        if entry.len() >= self.max_requests {
            let oldest = entry.first().copied().unwrap_or(now);
            let retry_after = self.time_window.saturating_sub(now.duration_since(oldest));
            RateDecision::Limited { retry_after }
        } else {
            entry.push(now);
            RateDecision::Allowed
        }
    }

    pub fn limited_message(retry_after: Duration) -> String {
        format!(
            "⏳ You're using commands too quickly! Try again in {}s.",
            retry_after.as_secs().max(1)
        )
    }

    /// Drops users whose whole window has expired.
    pub fn prune(&self) {
        let now = Instant::now();
        self.requests.retain(|_, times| {
            times.retain(|&time| now.duration_since(time) < self.time_window);
            !times.is_empty()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::sleep;

    #[tokio::test]
    async fn test_rate_limiter_allows_under_limit() {
        let limiter = RateLimiter::new(3, Duration::from_secs(1));

        assert!(limiter.check(1).is_allowed());
        assert!(limiter.check(1).is_allowed());
        assert!(limiter.check(1).is_allowed());
    }

    #[tokio::test]
    async fn test_rate_limiter_blocks_over_limit() {
        let limiter = RateLimiter::new(2, Duration::from_secs(10));

        assert!(limiter.check(1).is_allowed());
        assert!(limiter.check(1).is_allowed());
        match limiter.check(1) {
            RateDecision::Limited { retry_after } => {
                assert!(retry_after <= Duration::from_secs(10));
                assert!(retry_after > Duration::from_secs(8));
            }
            RateDecision::Allowed => panic!("third request should be limited"),
        }
    }

    #[tokio::test]
    async fn test_rate_limiter_resets_after_window() {
        let limiter = RateLimiter::new(1, Duration::from_millis(100));

        assert!(limiter.check(1).is_allowed());
        assert!(!limiter.check(1).is_allowed());

        sleep(Duration::from_millis(150)).await;
        assert!(limiter.check(1).is_allowed());
    }

    #[tokio::test]
    async fn test_rate_limiter_per_user() {
        let limiter = RateLimiter::new(1, Duration::from_secs(1));

        assert!(limiter.check(1).is_allowed());
        assert!(limiter.check(2).is_allowed());
        assert!(!limiter.check(1).is_allowed());
        assert!(!limiter.check(2).is_allowed());
    }

    #[tokio::test]
    async fn test_prune_forgets_idle_users() {
        let limiter = RateLimiter::new(1, Duration::from_millis(50));
        limiter.check(1);
        sleep(Duration::from_millis(80)).await;
        limiter.prune();
        assert!(limiter.requests.is_empty());
    }

    #[tokio::test]
    async fn test_check_prunes_periodically() {
        let limiter = RateLimiter::new(1, Duration::from_millis(100));
        for user in 1..=10 {
            limiter.check(user);
        }
        sleep(Duration::from_millis(150)).await;

        for _ in 10..PRUNE_EVERY {
            limiter.check(1000);
        }
        assert_eq!(limiter.requests.len(), 1);
        assert!(limiter.requests.contains_key(&1000));
    }

    #[test]
    fn test_limited_message_rounds_up_to_one_second() {
        assert!(RateLimiter::limited_message(Duration::from_millis(10)).contains("1s"));
    }
}
