//! Semantic cache entry (§3, C2 Semantic Cache)
//!
//! Cache keys are content-addressed and rename-tolerant: `file_path` is
//! deliberately excluded, so moving or renaming a file without touching its
//! content or structure is a cache hit.

use serde::{Deserialize, Serialize};

/// The three-part cache key. `struct_hash` covers the canonicalized AST
/// shape (so formatting-only edits still hit); `config_hash` covers the
/// pipeline config that produced the entry, so switching taint rule sets or
/// layer toggles can't serve a stale result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub content_hash: String,
    pub struct_hash: String,
    pub config_hash: String,
}

impl CacheKey {
    pub fn new(
        content_hash: impl Into<String>,
        struct_hash: impl Into<String>,
        config_hash: impl Into<String>,
    ) -> Self {
        Self {
            content_hash: content_hash.into(),
            struct_hash: struct_hash.into(),
            config_hash: config_hash.into(),
        }
    }
}

/// A cached IR document plus the key it was stored under and bookkeeping for
/// eviction/staleness decisions. `schema_version` is stamped at construction
/// time from whatever produced the payload; a reader whose own schema
/// version disagrees must treat the entry as a miss (§4.2) rather than
/// deserialize a payload shaped by an incompatible schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: CacheKey,
    pub payload: Vec<u8>,
    pub schema_version: u32,
    pub created_at_epoch_ms: u64,
    pub last_accessed_epoch_ms: u64,
    pub hit_count: u64,
}

impl CacheEntry {
    pub fn new(key: CacheKey, payload: Vec<u8>, schema_version: u32, now_epoch_ms: u64) -> Self {
        Self {
            key,
            payload,
            schema_version,
            created_at_epoch_ms: now_epoch_ms,
            last_accessed_epoch_ms: now_epoch_ms,
            hit_count: 0,
        }
    }

    pub fn touch(&mut self, now_epoch_ms: u64) {
        self.last_accessed_epoch_ms = now_epoch_ms;
        self.hit_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_ignores_file_path_by_construction() {
        // CacheKey has no file_path field at all; a rename that leaves
        // content and structure untouched necessarily produces the same key.
        let a = CacheKey::new("c1", "s1", "cfg1");
        let b = CacheKey::new("c1", "s1", "cfg1");
        assert_eq!(a, b);
    }

    #[test]
    fn touch_increments_hit_count() {
        let mut entry = CacheEntry::new(CacheKey::new("c", "s", "cfg"), vec![1, 2, 3], 1, 1000);
        entry.touch(2000);
        entry.touch(3000);
        assert_eq!(entry.hit_count, 2);
        assert_eq!(entry.last_accessed_epoch_ms, 3000);
    }
}
