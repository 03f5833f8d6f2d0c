//! Content addressing for published rollup files.

use sha2::{Digest, Sha256};

/// Returns the first 8 lowercase hex characters of the SHA-256 of `body`.
pub fn short_hash(body: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body);
    let digest = hasher.finalize();
    let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
    hex[..8].to_string()
}

/// Inserts `-<hash>` before the final dot of `key`, or appends it when the
/// key has no dot.
///
/// `hourly/2025/12/27/20.ndjson` + `abc12345` →
/// `hourly/2025/12/27/20-abc12345.ndjson`.
pub fn add_hash_to_filename(key: &str, hash: &str) -> String {
    match key.rfind('.') {
        Some(dot) => format!("{}-{}{}", &key[..dot], hash, &key[dot..]),
        None => format!("{}-{}", key, hash),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_hash_length_and_hex() {
        let h = short_hash(b"hello");
        assert_eq!(h.len(), 8);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_short_hash_known_value() {
        // SHA-256("") = e3b0c44298fc1c14...
        assert_eq!(short_hash(b""), "e3b0c442");
    }

    #[test]
    fn test_short_hash_differs_for_different_content() {
        assert_ne!(short_hash(b"a"), short_hash(b"b"));
    }

    #[test]
    fn test_short_hash_stable_for_same_content() {
        assert_eq!(short_hash(b"same"), short_hash(b"same"));
    }

    #[test]
    fn test_add_hash_before_final_dot() {
        assert_eq!(
            add_hash_to_filename("hourly/2025/12/27/20.ndjson", "abc12345"),
            "hourly/2025/12/27/20-abc12345.ndjson"
        );
    }

    #[test]
    fn test_add_hash_no_dot_appends() {
        assert_eq!(add_hash_to_filename("somefile", "abc12345"), "somefile-abc12345");
    }

    #[test]
    fn test_add_hash_uses_last_dot() {
        assert_eq!(
            add_hash_to_filename("daily/2025/12/27.meta.json", "deadbeef"),
            "daily/2025/12/27.meta-deadbeef.json"
        );
    }
}
