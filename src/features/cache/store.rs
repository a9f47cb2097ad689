//! SemanticCache (C2, §4.2)
//!
//! Two tiers: a bounded in-memory LRU for hot entries, backed by a
//! `Storage` port implementation for durable, cross-run persistence. A
//! lookup consults memory first, then storage; a storage hit is promoted
//! back into memory. Stale schema versions are treated as misses rather
//! than attempted deserializes of an incompatible payload.

use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use parking_lot::Mutex;
use tracing::trace;

use crate::config::cache_config::CacheConfig;
use crate::shared::models::{CacheEntry, CacheKey};
use crate::shared::ports::storage::Storage;

fn storage_key(key: &CacheKey) -> String {
    format!("{}:{}:{}", key.content_hash, key.struct_hash, key.config_hash)
}

/// Read-only snapshot of cumulative cache activity. Hit/miss counters
/// exclude entries rejected for a stale schema version — those count as
/// ordinary misses from the caller's perspective but are tracked
/// separately so operators can tell "cold cache" from "incompatible cache".
#[derive(Debug, Default, Clone, Copy)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub stale_schema_rejections: u64,
    pub entries_in_memory: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

pub struct SemanticCache {
    memory: Mutex<LruCache<CacheKey, CacheEntry>>,
    storage: Box<dyn Storage>,
    schema_version: u32,
    hits: AtomicU64,
    misses: AtomicU64,
    stale_schema_rejections: AtomicU64,
}

impl SemanticCache {
    pub fn new(config: &CacheConfig, storage: Box<dyn Storage>) -> Self {
        let capacity = std::num::NonZeroUsize::new(config.capacity.max(1)).unwrap();
        Self {
            memory: Mutex::new(LruCache::new(capacity)),
            storage,
            schema_version: config.schema_version,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            stale_schema_rejections: AtomicU64::new(0),
        }
    }

    pub fn generate_key(
        content_hash: impl Into<String>,
        struct_hash: impl Into<String>,
        config_hash: impl Into<String>,
    ) -> CacheKey {
        CacheKey::new(content_hash, struct_hash, config_hash)
    }

    /// Looks up `key`, checking the memory tier first then falling back to
    /// durable storage. A storage hit is deserialized and promoted into
    /// memory before being returned. `now_epoch_ms` is used to `touch()` the
    /// entry's access bookkeeping on a hit.
    pub fn get(&self, key: &CacheKey, now_epoch_ms: u64) -> Option<CacheEntry> {
        if let Some(entry) = self.memory.lock().get_mut(key) {
            if !self.accepts_schema(entry.schema_version) {
                trace!(content_hash = %key.content_hash, tier = "memory", schema_version = entry.schema_version, "stale schema, treating as miss");
                return None;
            }
            entry.touch(now_epoch_ms);
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(content_hash = %key.content_hash, tier = "memory", "cache hit");
            return Some(entry.clone());
        }

        let Some(raw) = self.storage.get(&storage_key(key)) else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            trace!(content_hash = %key.content_hash, "cache miss");
            return None;
        };
        let mut entry: CacheEntry = match serde_json::from_slice(&raw) {
            Ok(e) => e,
            Err(_) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
        };

        if entry.key != *key {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        if !self.accepts_schema(entry.schema_version) {
            trace!(content_hash = %key.content_hash, tier = "storage", schema_version = entry.schema_version, "stale schema, treating as miss");
            return None;
        }

        entry.touch(now_epoch_ms);
        self.hits.fetch_add(1, Ordering::Relaxed);
        trace!(content_hash = %key.content_hash, tier = "storage", "cache hit");
        self.memory.lock().put(key.clone(), entry.clone());
        Some(entry)
    }

    /// Inserts or overwrites `entry` under `key` in both tiers. Stores
    /// whatever schema version the caller stamped onto `entry`; `get()` is
    /// what enforces that only a matching version is ever handed back out.
    pub fn set(&self, key: CacheKey, entry: CacheEntry) {
        self.storage.put(
            &storage_key(&key),
            serde_json::to_vec(&entry).unwrap_or_default(),
        );
        self.memory.lock().put(key, entry);
    }

    pub fn invalidate(&self, key: &CacheKey) {
        self.memory.lock().pop(key);
        self.storage.delete(&storage_key(key));
    }

    /// Schema-mismatch gate, applied by `get()` itself to every entry it
    /// finds before returning it. Exposed so callers validating a payload
    /// outside the normal `get()` path (e.g. a pre-flight check) can reuse
    /// the same rule.
    pub fn accepts_schema(&self, candidate_version: u32) -> bool {
        if candidate_version != self.schema_version {
            self.stale_schema_rejections.fetch_add(1, Ordering::Relaxed);
            false
        } else {
            true
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            stale_schema_rejections: self.stale_schema_rejections.load(Ordering::Relaxed),
            entries_in_memory: self.memory.lock().len(),
        }
    }
}

impl std::fmt::Debug for SemanticCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticCache")
            .field("schema_version", &self.schema_version)
            .field("stats", &self.stats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::cache_config::CACHE_SCHEMA_VERSION;
    use crate::shared::ports::storage::InMemoryStorage;

    fn cache(capacity: usize) -> SemanticCache {
        let config = CacheConfig {
            capacity,
            ..CacheConfig::default()
        };
        SemanticCache::new(&config, Box::new(InMemoryStorage::default()))
    }

    #[test]
    fn miss_on_empty_cache() {
        let cache = cache(10);
        let key = SemanticCache::generate_key("c", "s", "cfg");
        assert!(cache.get(&key, 0).is_none());
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn set_then_get_hits_memory_tier() {
        let cache = cache(10);
        let key = SemanticCache::generate_key("c", "s", "cfg");
        cache.set(key.clone(), CacheEntry::new(key.clone(), vec![1, 2, 3], CACHE_SCHEMA_VERSION, 0));
        let found = cache.get(&key, 100).unwrap();
        assert_eq!(found.payload, vec![1, 2, 3]);
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn rename_tolerant_same_content_struct_config_is_same_key() {
        // file_path never enters CacheKey, so two different file paths with
        // identical content/structure/config necessarily collide on one key.
        let key_for_old_path = SemanticCache::generate_key("c", "s", "cfg");
        let key_for_new_path = SemanticCache::generate_key("c", "s", "cfg");
        assert_eq!(key_for_old_path, key_for_new_path);
    }

    #[test]
    fn different_config_hash_is_a_miss() {
        let cache = cache(10);
        let key_a = SemanticCache::generate_key("c", "s", "cfg-a");
        cache.set(key_a.clone(), CacheEntry::new(key_a.clone(), vec![9], CACHE_SCHEMA_VERSION, 0));

        let key_b = SemanticCache::generate_key("c", "s", "cfg-b");
        assert!(cache.get(&key_b, 0).is_none());
    }

    #[test]
    fn lru_eviction_drops_oldest_when_over_capacity() {
        let cache = cache(1);
        let key_a = SemanticCache::generate_key("a", "s", "cfg");
        let key_b = SemanticCache::generate_key("b", "s", "cfg");
        cache.set(key_a.clone(), CacheEntry::new(key_a.clone(), vec![1], CACHE_SCHEMA_VERSION, 0));
        cache.set(key_b.clone(), CacheEntry::new(key_b.clone(), vec![2], CACHE_SCHEMA_VERSION, 0));
        assert_eq!(cache.stats().entries_in_memory, 1);
        // storage tier still has key_a, so eviction from memory is not data loss.
        assert!(cache.get(&key_a, 0).is_some());
    }

    #[test]
    fn evicted_entry_survives_in_storage_tier() {
        let cache = cache(1);
        let key_a = SemanticCache::generate_key("a", "s", "cfg");
        let key_b = SemanticCache::generate_key("b", "s", "cfg");
        cache.set(key_a.clone(), CacheEntry::new(key_a.clone(), vec![1], CACHE_SCHEMA_VERSION, 0));
        cache.set(key_b.clone(), CacheEntry::new(key_b.clone(), vec![2], CACHE_SCHEMA_VERSION, 0));
        let recovered = cache.get(&key_a, 0).unwrap();
        assert_eq!(recovered.payload, vec![1]);
    }

    #[test]
    fn invalidate_removes_from_both_tiers() {
        let cache = cache(10);
        let key = SemanticCache::generate_key("c", "s", "cfg");
        cache.set(key.clone(), CacheEntry::new(key.clone(), vec![1], CACHE_SCHEMA_VERSION, 0));
        cache.invalidate(&key);
        assert!(cache.get(&key, 0).is_none());
    }

    #[test]
    fn accepts_schema_rejects_mismatched_version() {
        let cache = cache(10);
        assert!(cache.accepts_schema(CacheConfig::default().schema_version));
        assert!(!cache.accepts_schema(999));
        assert_eq!(cache.stats().stale_schema_rejections, 1);
    }

    #[test]
    fn get_treats_a_stale_schema_entry_in_storage_as_a_miss() {
        let cache = cache(10);
        let key = SemanticCache::generate_key("c", "s", "cfg");
        cache.set(key.clone(), CacheEntry::new(key.clone(), vec![1], 999, 0));
        assert!(cache.get(&key, 0).is_none());
        assert_eq!(cache.stats().stale_schema_rejections, 1);
        assert_eq!(cache.stats().hits, 0);
    }

    #[test]
    fn get_treats_a_stale_schema_entry_in_memory_as_a_miss() {
        let cache = cache(10);
        let key = SemanticCache::generate_key("c", "s", "cfg");
        cache.memory.lock().put(key.clone(), CacheEntry::new(key.clone(), vec![1], 999, 0));
        assert!(cache.get(&key, 0).is_none());
    }

    #[test]
    fn hit_rate_reflects_hits_over_total_lookups() {
        let cache = cache(10);
        let key = SemanticCache::generate_key("c", "s", "cfg");
        cache.set(key.clone(), CacheEntry::new(key.clone(), vec![1], CACHE_SCHEMA_VERSION, 0));
        cache.get(&key, 0);
        let missing_key = SemanticCache::generate_key("x", "y", "z");
        cache.get(&missing_key, 0);
        assert!((cache.stats().hit_rate() - 0.5).abs() < f64::EPSILON);
    }
}
