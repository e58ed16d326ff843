// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn io_not_found_maps_to_not_found_kind() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    let err: Error = io.into();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn io_other_maps_to_transient() {
    let io = std::io::Error::other("boom");
    let err: Error = io.into();
    assert_eq!(err.kind(), ErrorKind::Transient);
    assert!(err.is_retryable());
}

#[test]
fn context_preserves_kind_and_prefixes_message() {
    let err = Error::not_found("agent w").context("remove_agent");
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.message(), "remove_agent: agent w");
}

#[test]
fn only_transient_is_retryable() {
    for kind in [
        ErrorKind::NotFound,
        ErrorKind::AlreadyExists,
        ErrorKind::InvalidArgument,
        ErrorKind::Unauthorized,
        ErrorKind::Conflict,
        ErrorKind::Cancelled,
        ErrorKind::Fatal,
    ] {
        assert!(!Error::new(kind, "x").is_retryable());
    }
    assert!(Error::transient("x").is_retryable());
}
