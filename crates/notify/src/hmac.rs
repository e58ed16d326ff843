// SPDX-License-Identifier: MIT

//! Hand-rolled HMAC-SHA256, signing outbound webhook bodies and verifying
//! inbound ones (§4.7). No `hmac` crate is in the dependency stack; this
//! builds the construction directly on `sha2::Sha256`.

use sha2::{Digest, Sha256};

const BLOCK_SIZE: usize = 64;

/// Computes `HMAC-SHA256(key, message)`, returning the raw 32-byte digest.
pub fn sign(key: &[u8], message: &[u8]) -> [u8; 32] {
    let key = normalize_key(key);

    let mut inner_pad = [0x36u8; BLOCK_SIZE];
    let mut outer_pad = [0x5cu8; BLOCK_SIZE];
    for i in 0..BLOCK_SIZE {
        inner_pad[i] ^= key[i];
        outer_pad[i] ^= key[i];
    }

    let mut inner = Sha256::new();
    inner.update(inner_pad);
    inner.update(message);
    let inner_digest = inner.finalize();

    let mut outer = Sha256::new();
    outer.update(outer_pad);
    outer.update(inner_digest);
    outer.finalize().into()
}

/// Signs and hex-encodes, the form used in an outbound signature header.
pub fn sign_hex(key: &[u8], message: &[u8]) -> String {
    hex_encode(&sign(key, message))
}

/// Verifies a hex-encoded signature in constant time with respect to the
/// expected digest's contents.
pub fn verify_hex(key: &[u8], message: &[u8], signature: &str) -> bool {
    let Some(given) = hex_decode(signature) else {
        return false;
    };
    let expected = sign(key, message);
    constant_time_eq(&expected, &given)
}

fn normalize_key(key: &[u8]) -> [u8; BLOCK_SIZE] {
    let mut block = [0u8; BLOCK_SIZE];
    if key.len() > BLOCK_SIZE {
        let digest = Sha256::digest(key);
        block[..digest.len()].copy_from_slice(&digest);
    } else {
        block[..key.len()].copy_from_slice(key);
    }
    block
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        write!(&mut out, "{byte:02x}").expect("writing to a String never fails");
    }
    out
}

fn hex_decode(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
        .collect()
}

#[cfg(test)]
#[path = "hmac_tests.rs"]
mod tests;
