// SPDX-License-Identifier: MIT

use super::*;

fn at(secs: i64) -> DateTime<Utc> {
    DateTime::UNIX_EPOCH + Duration::seconds(secs)
}

#[test]
fn allows_sends_under_the_burst_limit() {
    let limiter = RateLimiter::new(3, Duration::seconds(30));
    assert!(limiter.try_acquire(at(0)));
    assert!(limiter.try_acquire(at(1)));
    assert!(limiter.try_acquire(at(2)));
}

#[test]
fn exceeding_the_burst_enters_cooldown() {
    let limiter = RateLimiter::new(2, Duration::seconds(30));
    assert!(limiter.try_acquire(at(0)));
    assert!(limiter.try_acquire(at(1)));
    assert!(!limiter.try_acquire(at(2)));
    // Still within cooldown.
    assert!(!limiter.try_acquire(at(10)));
}

#[test]
fn cooldown_expires_after_the_configured_duration() {
    let limiter = RateLimiter::new(1, Duration::seconds(10));
    assert!(limiter.try_acquire(at(0)));
    assert!(!limiter.try_acquire(at(1)));
    assert!(limiter.try_acquire(at(12)));
}

#[test]
fn window_resets_after_a_minute_elapses() {
    let limiter = RateLimiter::new(1, Duration::seconds(5));
    assert!(limiter.try_acquire(at(0)));
    assert!(limiter.try_acquire(at(61)));
}
