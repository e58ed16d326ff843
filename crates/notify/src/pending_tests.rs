// SPDX-License-Identifier: MIT

use super::*;
use mc_core::EventType;

fn at(hours: i64) -> DateTime<Utc> {
    DateTime::UNIX_EPOCH + Duration::hours(hours)
}

fn event() -> Event {
    Event::new("demo", EventType::AgentQuestion, "t", "m")
}

#[test]
fn insert_then_get_round_trips() {
    let table = PendingTable::new();
    let reply_id = ReplyId::new();
    table.insert(reply_id.clone(), event(), at(0));
    assert!(table.get(&reply_id).is_some());
}

#[test]
fn resolving_via_get_does_not_remove_the_entry() {
    let table = PendingTable::new();
    let reply_id = ReplyId::new();
    table.insert(reply_id.clone(), event(), at(0));
    table.get(&reply_id);
    assert!(table.get(&reply_id).is_some());
}

#[test]
fn sweep_evicts_entries_older_than_24_hours() {
    let table = PendingTable::new();
    let reply_id = ReplyId::new();
    table.insert(reply_id.clone(), event(), at(0));
    table.sweep(at(25));
    assert!(table.get(&reply_id).is_none());
}

#[test]
fn sweep_keeps_entries_within_the_expiry_window() {
    let table = PendingTable::new();
    let reply_id = ReplyId::new();
    table.insert(reply_id.clone(), event(), at(0));
    table.sweep(at(23));
    assert!(table.get(&reply_id).is_some());
}
