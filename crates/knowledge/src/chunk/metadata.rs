//! Chunk metadata helpers.

use sha2::{Digest, Sha256};

/// Calculate the SHA-256 hash of text as lowercase hex.
pub fn calculate_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}
