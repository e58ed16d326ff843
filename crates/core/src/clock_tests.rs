// SPDX-License-Identifier: MIT

use super::*;
use std::time::Duration;

#[test]
fn fake_clock_starts_at_unix_epoch() {
    let clock = FakeClock::new();
    assert_eq!(clock.now(), DateTime::<Utc>::UNIX_EPOCH);
}

#[test]
fn advance_moves_time_forward() {
    let clock = FakeClock::new();
    let before = clock.now();
    clock.advance(Duration::from_secs(90));
    assert_eq!(clock.now() - before, chrono::Duration::seconds(90));
}

#[test]
fn set_pins_an_absolute_time() {
    let clock = FakeClock::new();
    let at = DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z").unwrap().with_timezone(&Utc);
    clock.set(at);
    assert_eq!(clock.now(), at);
}

#[test]
fn system_clock_advances_with_real_time() {
    let clock = SystemClock;
    let a = clock.now();
    std::thread::sleep(Duration::from_millis(5));
    let b = clock.now();
    assert!(b >= a);
}
