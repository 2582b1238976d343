//! Content digest for file identity display and history matching

use sha2::{Digest, Sha256};
use std::fmt::Write;

/// Lowercase hex SHA-256 digest of `data`
pub fn sha256_hex(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        // Infallible for String
        let _ = write!(hex, "{:02x}", byte);
    }
    hex
}
