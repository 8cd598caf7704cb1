//! SHA-256 fingerprints of signing payloads.
//!
//! Logs carry the fingerprint, never the payload itself.

use base64::{engine::general_purpose::STANDARD, Engine};
use sha2::{Digest, Sha256};

/// Compute SHA-256 digest of a payload and return base64-encoded result.
pub fn sha256_b64(payload: &[u8]) -> String {
    let hash = Sha256::digest(payload);
    STANDARD.encode(hash)
}

/// Format a payload fingerprint: `sha-256=<base64>`.
pub fn fingerprint(payload: &[u8]) -> String {
    format!("sha-256={}", sha256_b64(payload))
}
