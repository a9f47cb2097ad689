//! Semantic cache configuration (§3 C2, §E3)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Current on-disk schema version. Bumped whenever `CacheEntry`'s payload
/// format changes incompatibly; a mismatched version is treated as a full
/// cache miss rather than an attempted (and likely corrupt) deserialize.
pub const CACHE_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub directory: PathBuf,
    pub capacity: usize,
    pub schema_version: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(".codegraph-cache"),
            capacity: 100_000,
            schema_version: CACHE_SCHEMA_VERSION,
        }
    }
}

impl CacheConfig {
    pub fn is_current_schema(&self) -> bool {
        self.schema_version == CACHE_SCHEMA_VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_current_schema() {
        assert!(CacheConfig::default().is_current_schema());
    }

    #[test]
    fn stale_schema_is_detected() {
        let mut cfg = CacheConfig::default();
        cfg.schema_version = 0;
        assert!(!cfg.is_current_schema());
    }
}
