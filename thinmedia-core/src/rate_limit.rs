//! Outbound call budget for the metadata provider.
//!
//! The limiter hands out a fixed number of tokens per window. A background
//! thread resets the count to full capacity at every window boundary; there is
//! no gradual refill, so a caller that drains the budget waits for the next
//! boundary.

use std::fmt;
use std::sync::{Arc, Weak};
use std::thread;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};
use tracing::{debug, trace};

use crate::error::Result;

pub const DEFAULT_CAPACITY: u32 = 30;
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);
/// Shortest reset window; shorter settings are raised to this.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Budget and window length for a [`RateLimiter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSettings {
    pub capacity: u32,
    pub interval: Duration,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            interval: DEFAULT_INTERVAL,
        }
    }
}

struct Bucket {
    tokens: Mutex<u32>,
    refilled: Condvar,
    capacity: u32,
    interval: Duration,
}

impl Bucket {
    fn refill(&self) {
        let mut tokens = self.tokens.lock();
        *tokens = self.capacity;
        self.refilled.notify_all();
    }
}

/// Periodic-reset token bucket shared by every outbound caller.
///
/// Cloning is cheap; clones share the same budget. The reset thread exits once
/// the last clone is dropped.
#[derive(Clone)]
pub struct RateLimiter {
    bucket: Arc<Bucket>,
}

impl fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimiter")
            .field("capacity", &self.bucket.capacity)
            .field("interval", &self.bucket.interval)
            .field("available", &self.available())
            .finish()
    }
}

impl RateLimiter {
    /// Start a limiter and its reset thread. A zero capacity is raised to one
    /// and the interval to at least [`MIN_INTERVAL`].
    pub fn new(settings: RateLimitSettings) -> Result<Self> {
        let capacity = settings.capacity.max(1);
        let interval = settings.interval.max(MIN_INTERVAL);
        let bucket = Arc::new(Bucket {
            tokens: Mutex::new(capacity),
            refilled: Condvar::new(),
            capacity,
            interval,
        });

        let weak = Arc::downgrade(&bucket);
        thread::Builder::new()
            .name("thinmedia-rate-limit".to_string())
            .spawn(move || reset_loop(weak, interval))?;

        debug!(
            capacity,
            interval_ms = interval.as_millis() as u64,
            "rate limiter started"
        );
        Ok(Self { bucket })
    }

    /// Block until `n` tokens are available, then take them.
    ///
    /// Requests larger than the capacity are clamped to the capacity.
    pub fn consume(&self, n: u32) {
        let n = n.min(self.bucket.capacity);
        let mut tokens = self.bucket.tokens.lock();
        while *tokens < n {
            trace!(requested = n, available = *tokens, "waiting for token reset");
            self.bucket.refilled.wait(&mut tokens);
        }
        *tokens -= n;
    }

    /// Take `n` tokens only if they are available right now.
    pub fn try_consume(&self, n: u32) -> bool {
        let mut tokens = self.bucket.tokens.lock();
        if *tokens < n {
            return false;
        }
        *tokens -= n;
        true
    }

    pub fn available(&self) -> u32 {
        *self.bucket.tokens.lock()
    }

    pub fn capacity(&self) -> u32 {
        self.bucket.capacity
    }

    pub fn interval(&self) -> Duration {
        self.bucket.interval
    }

    pub(crate) fn reset_now(&self) {
        self.bucket.refill();
    }
}

fn reset_loop(bucket: Weak<Bucket>, interval: Duration) {
    loop {
        thread::sleep(interval);
        match bucket.upgrade() {
            Some(bucket) => bucket.refill(),
            None => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn limiter(capacity: u32, interval: Duration) -> RateLimiter {
        RateLimiter::new(RateLimitSettings { capacity, interval }).unwrap()
    }

    #[test]
    fn reset_restores_full_capacity_from_any_level() {
        let limiter = limiter(30, Duration::from_secs(3600));
        for drained in [0, 1, 29, 30] {
            limiter.reset_now();
            assert!(limiter.try_consume(drained));
            assert_eq!(limiter.available(), 30 - drained);
            limiter.reset_now();
            assert_eq!(limiter.available(), 30);
        }
    }

    #[test]
    fn try_consume_never_goes_negative() {
        let limiter = limiter(3, Duration::from_secs(3600));
        assert!(limiter.try_consume(2));
        assert!(!limiter.try_consume(2));
        assert_eq!(limiter.available(), 1);
        assert!(limiter.try_consume(1));
        assert!(!limiter.try_consume(1));
        assert_eq!(limiter.available(), 0);
    }

    #[test]
    fn drained_budget_does_not_trickle_back() {
        let limiter = limiter(2, Duration::from_secs(3600));
        limiter.consume(2);
        thread::sleep(Duration::from_millis(50));
        assert_eq!(limiter.available(), 0);
    }

    #[test]
    fn consume_waits_for_the_next_boundary() {
        let limiter = limiter(2, Duration::from_millis(20));
        let started = Instant::now();
        for _ in 0..6 {
            limiter.consume(1);
        }
        // Six tokens from a budget of two needs at least two resets.
        assert!(started.elapsed() >= Duration::from_millis(20));
        assert!(limiter.available() <= 2);
    }

    #[test]
    fn oversized_requests_are_clamped_to_capacity() {
        let limiter = limiter(4, Duration::from_millis(10));
        limiter.consume(100);
        assert!(limiter.available() <= 4);
    }

    #[test]
    fn degenerate_settings_are_clamped() {
        let limiter = limiter(0, Duration::ZERO);
        assert_eq!(limiter.capacity(), 1);
        assert_eq!(limiter.interval(), MIN_INTERVAL);
        limiter.consume(1);
        limiter.consume(1);
    }

    #[test]
    fn concurrent_consumers_all_complete() {
        let limiter = limiter(5, Duration::from_millis(10));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let limiter = limiter.clone();
                thread::spawn(move || {
                    for _ in 0..10 {
                        limiter.consume(1);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(limiter.available() <= 5);
    }
}
