// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn require_str_rejects_missing_key() {
    let req = Request::new("add_repo");
    let err = req.require_str("name").unwrap_err();
    assert!(matches!(err, WireError::MissingArg(_)));
}

#[test]
fn require_str_rejects_empty_string() {
    let req = Request::new("add_repo").with_arg("name", "");
    let err = req.require_str("name").unwrap_err();
    assert!(matches!(err, WireError::InvalidArg(_)));
}

#[test]
fn require_str_rejects_wrong_type() {
    let req = Request::new("add_repo").with_arg("name", 5);
    let err = req.require_str("name").unwrap_err();
    assert!(matches!(err, WireError::InvalidArg(_)));
}

#[test]
fn require_str_accepts_non_empty_string() {
    let req = Request::new("add_repo").with_arg("name", "demo");
    assert_eq!(req.require_str("name").unwrap(), "demo");
}

#[test]
fn optional_str_is_none_when_absent() {
    let req = Request::new("add_repo");
    assert_eq!(req.optional_str("task").unwrap(), None);
}

#[test]
fn optional_bool_falls_back_to_default() {
    let req = Request::new("remove_agent");
    assert!(!req.optional_bool("force", false));
    let req = req.with_arg("force", true);
    assert!(req.optional_bool("force", false));
}

#[test]
fn response_err_carries_the_display_message() {
    let response = Response::err("boom");
    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some("boom"));
}

#[test]
fn request_round_trips_through_json() {
    let req = Request::new("send_message").with_arg("repo", "demo").with_arg("body", "hi");
    let json = serde_json::to_string(&req).unwrap();
    let parsed: Request = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.command, "send_message");
    assert_eq!(parsed.require_str("repo").unwrap(), "demo");
}
