// SPDX-License-Identifier: MIT

//! Fingerprint → last-seen timestamp table (§3, §4.6 step 3).

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;

pub struct DedupTable {
    window: Duration,
    seen: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl DedupTable {
    pub fn new(window: Duration) -> Self {
        Self { window, seen: Mutex::new(HashMap::new()) }
    }

    /// Returns `true` (and records `now`) when the fingerprint should be
    /// suppressed as a duplicate; records the timestamp either way so the
    /// window always measures from the most recent occurrence.
    pub fn check_and_record(&self, fingerprint: &str, now: DateTime<Utc>) -> bool {
        let mut seen = self.seen.lock();
        let is_dup = match seen.get(fingerprint) {
            Some(last) => now.signed_duration_since(*last) < self.window,
            None => false,
        };
        seen.insert(fingerprint.to_string(), now);
        is_dup
    }

    /// Drops entries older than the dedup window relative to `now`.
    pub fn sweep(&self, now: DateTime<Utc>) {
        self.seen.lock().retain(|_, last| now.signed_duration_since(*last) < self.window);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.seen.lock().len()
    }
}

#[cfg(test)]
#[path = "dedup_tests.rs"]
mod tests;
