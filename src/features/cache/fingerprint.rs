//! Cache key fingerprinting (§3 CacheEntry, §E5)

use sha2::{Digest, Sha256};

/// SHA-256 of the file's raw bytes — the `content_hash` key component.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex_digest(&hasher.finalize())
}

/// Stable hash over a canonicalized AST shape: the pre-order sequence of
/// tree-sitter node kinds, ignoring token text and whitespace. Two files
/// whose text differs only in formatting or identifier names but share
/// grammar structure produce the same `struct_hash`.
pub fn struct_hash(kind_sequence: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for kind in kind_sequence {
        hasher.update(kind.as_bytes());
        hasher.update(b"\0");
    }
    hex_digest(&hasher.finalize())
}

fn hex_digest(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
