// SPDX-License-Identifier: MIT

//! Reply-id → event table for events awaiting a user response (§3, §4.6).
//! Entries are evicted only by the time-based sweep after 24 hours; looking
//! up (resolving) a response does not by itself remove the entry.

use chrono::{DateTime, Duration, Utc};
use mc_core::{Event, ReplyId};
use parking_lot::Mutex;
use std::collections::HashMap;

const EXPIRY: Duration = Duration::hours(24);

struct Entry {
    event: Event,
    recorded_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct PendingTable {
    entries: Mutex<HashMap<ReplyId, Entry>>,
}

impl PendingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, reply_id: ReplyId, event: Event, now: DateTime<Utc>) {
        self.entries.lock().insert(reply_id, Entry { event, recorded_at: now });
    }

    /// Looks up a pending event by reply-id. Resolving a response does not
    /// by itself remove the entry — only the time-based sweep does (§4.6).
    pub fn get(&self, reply_id: &ReplyId) -> Option<Event> {
        self.entries.lock().get(reply_id).map(|e| e.event.clone())
    }

    pub fn sweep(&self, now: DateTime<Utc>) {
        self.entries.lock().retain(|_, entry| now.signed_duration_since(entry.recorded_at) < EXPIRY);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

#[cfg(test)]
#[path = "pending_tests.rs"]
mod tests;
