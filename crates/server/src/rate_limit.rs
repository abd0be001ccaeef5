//! Sliding-window rate limiter
//!
//! An explicit collaborator at the server boundary: a bounded queue of
//! recent request timestamps behind a lock, with the clock injected so
//! tests control time. The scoring engine itself never rate limits.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use lead_scorer_config::RateLimitConfig;

/// Injected time source
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock time source used in production
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Sliding-window limiter over recent request timestamps
pub struct SlidingWindowLimiter {
    max_requests: usize,
    window: Duration,
    clock: Arc<dyn Clock>,
    recent: Mutex<VecDeque<Instant>>,
}

impl SlidingWindowLimiter {
    pub fn new(config: &RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        let max_requests = config.max_requests as usize;
        Self {
            max_requests,
            window: Duration::from_secs(config.window_seconds),
            clock,
            recent: Mutex::new(VecDeque::with_capacity(max_requests)),
        }
    }

    /// Try to admit one request. Expired timestamps are evicted first, so
    /// the queue never grows past `max_requests`.
    pub fn try_acquire(&self) -> bool {
        let now = self.clock.now();
        let mut recent = self.recent.lock();

        while let Some(&oldest) = recent.front() {
            if now.duration_since(oldest) >= self.window {
                recent.pop_front();
            } else {
                break;
            }
        }

        if recent.len() < self.max_requests {
            recent.push_back(now);
            true
        } else {
            false
        }
    }
}
