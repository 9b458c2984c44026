//! # Utility Functions
//!
//! Key derivation and timestamp helpers shared across the oracle.

use crate::{error::Result, OracleError};
use sha2::{Digest, Sha256};

/// Hash arbitrary bytes with SHA256, returning a lowercase hex digest
pub fn sha256_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let hash = hasher.finalize();
    hex::encode(hash)
}

/// Derive the question key from the asker-supplied initial-state seed
pub fn question_key(seed: &[u8]) -> String {
    sha256_hash(seed)
}

/// Derive the answer key from a claimed final-state image
pub fn answer_key(image: &[u8]) -> String {
    sha256_hash(image)
}

/// Check that a key is a well-formed SHA256 hex digest
pub fn validate_key(key: &str) -> bool {
    key.len() == 64 && key.chars().all(|c| c.is_ascii_hexdigit())
}

/// Current wall-clock time in Unix seconds
pub fn unix_timestamp_now() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Format timestamp as human-readable string
pub fn format_timestamp(timestamp: u64) -> String {
    use chrono::DateTime;
    let dt = DateTime::from_timestamp(timestamp as i64, 0).unwrap_or_default();
    dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Parse timestamp from string
pub fn parse_timestamp(timestamp_str: &str) -> Result<u64> {
    timestamp_str
        .parse::<u64>()
        .map_err(|_| OracleError::Handler(format!("Invalid timestamp: {timestamp_str}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hash() {
        let hash = sha256_hash(b"Hello, World!");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        // Deterministic
        assert_eq!(hash, sha256_hash(b"Hello, World!"));
    }

    #[test]
    fn test_question_and_answer_keys_differ() {
        let seed = b"initial state";
        let image = b"final state";
        assert_ne!(question_key(seed), answer_key(image));
        assert_eq!(question_key(seed), sha256_hash(seed));
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key(&sha256_hash(b"x")));
        assert!(!validate_key("not a key"));
        assert!(!validate_key("abcd"));
    }

    #[test]
    fn test_format_timestamp() {
        let formatted = format_timestamp(1735689600);
        assert_eq!(formatted, "2025-01-01 00:00:00 UTC");
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("100").unwrap(), 100);
        assert!(parse_timestamp("nope").is_err());
    }
}
