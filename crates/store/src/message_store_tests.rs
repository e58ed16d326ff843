// SPDX-License-Identifier: MIT

use crate::test_support::test_stores;
use std::collections::HashSet;
use std::time::Duration;

#[test]
fn send_then_list_returns_pending_message_in_order() {
    let stores = test_stores();
    stores.messages.send("demo", "supervisor", "worker-a", "hello").unwrap();
    stores.clock.advance(Duration::from_secs(1));
    stores.messages.send("demo", "supervisor", "worker-a", "second").unwrap();

    let listed = stores.messages.list("demo", "worker-a").unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].body, "hello");
    assert_eq!(listed[1].body, "second");
    assert_eq!(listed[0].status, mc_core::MessageStatus::Pending);
}

#[test]
fn list_on_missing_inbox_is_empty_not_an_error() {
    let stores = test_stores();
    assert!(stores.messages.list("demo", "ghost").unwrap().is_empty());
}

#[test]
fn full_lifecycle_round_trips_through_the_store() {
    let stores = test_stores();
    let sent = stores.messages.send("demo", "supervisor", "worker-a", "hello").unwrap();

    let delivered = stores.messages.mark_delivered("demo", "worker-a", sent.id.as_str()).unwrap();
    assert_eq!(delivered.status, mc_core::MessageStatus::Delivered);

    let read = stores.messages.read("demo", "worker-a", sent.id.as_str()).unwrap();
    assert_eq!(read.status, mc_core::MessageStatus::Read);

    let acked = stores.messages.ack("demo", "worker-a", sent.id.as_str()).unwrap();
    assert_eq!(acked.status, mc_core::MessageStatus::Acknowledged);
}

#[test]
fn ack_before_read_is_a_no_op() {
    let stores = test_stores();
    let sent = stores.messages.send("demo", "supervisor", "worker-a", "hello").unwrap();
    let acked = stores.messages.ack("demo", "worker-a", sent.id.as_str()).unwrap();
    assert_eq!(acked.status, mc_core::MessageStatus::Pending);
}

#[test]
fn read_on_unknown_id_is_not_found() {
    let stores = test_stores();
    let err = stores.messages.read("demo", "worker-a", "msg_ghost").unwrap_err();
    assert!(matches!(err, crate::StoreError::MessageNotFound(_)));
}

#[test]
fn cleanup_orphaned_removes_inboxes_for_agents_no_longer_tracked() {
    let stores = test_stores();
    stores.messages.send("demo", "supervisor", "worker-a", "hello").unwrap();
    stores.messages.send("demo", "supervisor", "worker-b", "hello").unwrap();

    let valid: HashSet<String> = ["worker-a".to_string()].into_iter().collect();
    stores.messages.cleanup_orphaned("demo", &valid).unwrap();

    assert_eq!(stores.messages.list("demo", "worker-a").unwrap().len(), 1);
    assert!(stores.messages.list("demo", "worker-b").unwrap().is_empty());
}

#[test]
fn remove_repo_deletes_the_entire_message_subtree() {
    let stores = test_stores();
    stores.messages.send("demo", "supervisor", "worker-a", "hello").unwrap();
    stores.messages.remove_repo("demo").unwrap();
    assert!(stores.messages.list("demo", "worker-a").unwrap().is_empty());
}
