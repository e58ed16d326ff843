// SPDX-License-Identifier: MIT

//! Per-adapter leaky-minute rate limiter with burst and cooldown (§3, §4.6 step 5).

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

struct Window {
    start: DateTime<Utc>,
    count: u32,
    cooldown_until: Option<DateTime<Utc>>,
}

pub struct RateLimiter {
    max_per_minute: u32,
    cooldown: Duration,
    window: Mutex<Window>,
}

impl RateLimiter {
    pub fn new(max_per_minute: u32, cooldown: Duration) -> Self {
        Self {
            max_per_minute,
            cooldown,
            window: Mutex::new(Window { start: DateTime::UNIX_EPOCH, count: 0, cooldown_until: None }),
        }
    }

    /// Returns `true` if a send is allowed right now, incrementing the count
    /// as a side effect. Returns `false` and enters (or extends) cooldown
    /// once the per-minute burst is exceeded.
    pub fn try_acquire(&self, now: DateTime<Utc>) -> bool {
        let mut window = self.window.lock();

        if let Some(until) = window.cooldown_until {
            if now < until {
                return false;
            }
            window.cooldown_until = None;
        }

        if now.signed_duration_since(window.start) >= Duration::minutes(1) {
            window.start = now;
            window.count = 0;
        }

        if window.count >= self.max_per_minute {
            window.cooldown_until = Some(now + self.cooldown);
            return false;
        }

        window.count += 1;
        true
    }
}

#[cfg(test)]
#[path = "rate_limit_tests.rs"]
mod tests;
