//! Payload hashing for audit records

use sha2::{Digest, Sha256};

/// Length of a hex-encoded SHA-256 digest
pub const PAYLOAD_HASH_LEN: usize = 64;

/// SHA-256 of the payload's UTF-8 bytes, lowercase hex
pub fn payload_hash(payload: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    hex::encode(hasher.finalize())
}

/// Check a stored hash against its payload
pub fn verify_payload_hash(payload: &str, expected: &str) -> bool {
    payload_hash(payload) == expected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_deterministic() {
        let payload = r#"{"queryName":"findCustomerByDocument"}"#;
        assert_eq!(payload_hash(payload), payload_hash(payload));
    }

    #[test]
    fn test_hash_differs_for_different_payloads() {
        assert_ne!(payload_hash(r#"{"cost":500}"#), payload_hash(r#"{"cost":501}"#));
    }

    #[test]
    fn test_hash_fixed_length_hex() {
        for payload in ["", "{}", "señal ñandú 🚀", "a\"b\\c\n"] {
            let hash = payload_hash(payload);
            assert_eq!(hash.len(), PAYLOAD_HASH_LEN);
            assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn test_known_digest() {
        assert_eq!(
            payload_hash("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_verify() {
        let hash = payload_hash("{}");
        assert!(verify_payload_hash("{}", &hash));
        assert!(!verify_payload_hash("{ }", &hash));
    }
}
