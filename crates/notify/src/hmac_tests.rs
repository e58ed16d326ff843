// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn matches_the_rfc_4868_test_vector() {
    let key = b"key";
    let message = b"The quick brown fox jumps over the lazy dog";
    let signature = sign_hex(key, message);
    assert_eq!(signature, "f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd");
}

#[test]
fn verify_hex_accepts_a_matching_signature() {
    let key = b"shared-secret";
    let message = b"{\"event\":\"agent.error\"}";
    let signature = sign_hex(key, message);
    assert!(verify_hex(key, message, &signature));
}

#[test]
fn verify_hex_rejects_a_tampered_message() {
    let key = b"shared-secret";
    let signature = sign_hex(key, b"original");
    assert!(!verify_hex(key, b"tampered", &signature));
}

#[test]
fn verify_hex_rejects_a_wrong_key() {
    let signature = sign_hex(b"key-a", b"message");
    assert!(!verify_hex(b"key-b", b"message", &signature));
}

#[test]
fn verify_hex_rejects_malformed_hex() {
    assert!(!verify_hex(b"key", b"message", "not-hex"));
}

#[test]
fn sign_is_deterministic() {
    assert_eq!(sign(b"key", b"message"), sign(b"key", b"message"));
}
