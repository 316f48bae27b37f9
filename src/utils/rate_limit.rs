//! Minimum-interval rate limiting shared between concurrent callers.
//!
//! EDHREC and Scryfall both ask clients to space requests out. Every
//! request for a service goes through one `RateLimiter`; callers reserve
//! the next free slot under a lock and then sleep outside of it, so N
//! concurrent workers still produce at most one request per interval.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

#[derive(Debug)]
pub struct RateLimiter {
    name: &'static str,
    min_interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(name: &'static str, min_interval: Duration) -> Self {
        Self {
            name,
            min_interval,
            next_slot: Mutex::new(None),
        }
    }

    /// Wait until this caller may send its request.
    pub async fn acquire(&self) {
        if self.min_interval.is_zero() {
            return;
        }

        let slot = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = match *next {
                Some(reserved) if reserved > now => reserved,
                _ => now,
            };
            *next = Some(slot + self.min_interval);
            slot
        };

        if slot > Instant::now() {
            tracing::trace!(limiter = self.name, "waiting for rate limit slot");
            sleep_until(slot).await;
        }
    }
}
