//! Top-level pipeline configuration (§4.9 C9, §E3)

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use super::{CacheConfig, LayerToggles, TaintConfig};

/// Which orchestration strategy C9 uses to drive L1-L9 over a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// Full re-analysis of every file, single-threaded driver.
    Default,
    /// Re-analyze only files in the ChangeSet plus their dependents.
    Incremental,
    /// Full re-analysis, file-level work distributed across a thread pool.
    Parallel,
    /// Analyze an in-memory overlay of edits without touching the on-disk
    /// cache or the committed tree.
    Overlay,
    /// L1 only, bounded to ~10-50ms per file; for hover/autocomplete callers.
    Quick,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub strategy: Strategy,
    pub layers: LayerToggles,
    pub worker_count: usize,
    pub cache: CacheConfig,
    pub taint: TaintConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Default,
            layers: LayerToggles::default(),
            worker_count: num_cpus::get().max(1),
            cache: CacheConfig::default(),
            taint: TaintConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Quick strategy runs L1 only regardless of what `layers` was
    /// constructed with, matching the strategy's definition above.
    pub fn effective_layers(&self) -> LayerToggles {
        if matches!(self.strategy, Strategy::Quick) {
            LayerToggles::l1_only()
        } else {
            self.layers
        }
    }

    /// Stable hash over strategy + effective layer toggles, feeding C2's
    /// `config_hash` key component so switching strategy or toggles can't
    /// serve a stale cache entry.
    pub fn config_hash(&self) -> String {
        let mut hasher = ahash::AHasher::default();
        self.strategy.hash(&mut hasher);
        self.effective_layers().hash(&mut hasher);
        format!("{:016x}", hasher.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quick_strategy_runs_l1_only() {
        let cfg = PipelineConfig {
            strategy: Strategy::Quick,
            ..PipelineConfig::default()
        };
        let layers = cfg.effective_layers();
        assert!(layers.l1_lexical);
        assert!(!layers.l2_occurrence);
        assert!(!layers.l9_cross_file_stub);
    }

    #[test]
    fn config_hash_changes_with_strategy() {
        let default_cfg = PipelineConfig::default();
        let quick_cfg = PipelineConfig {
            strategy: Strategy::Quick,
            ..PipelineConfig::default()
        };
        assert_ne!(default_cfg.config_hash(), quick_cfg.config_hash());
    }
}
