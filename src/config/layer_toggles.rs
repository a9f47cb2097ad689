//! Per-layer enable/disable toggles (§4.4 C4, L1-L9)

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Independently toggles each IR layer. Turning a later layer off must
/// never change an earlier layer's output — each layer only ever reads
/// what earlier layers produced, never the other way around (§4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerToggles {
    pub l1_lexical: bool,
    pub l2_occurrence: bool,
    pub l3_lsp_enrichment: bool,
    pub l4_expression_trees: bool,
    pub l5_cfg: bool,
    pub l6_dfg_ssa: bool,
    pub l7_constant_propagation: bool,
    pub l8_semantic_summaries: bool,
    pub l9_cross_file_stub: bool,
}

impl Default for LayerToggles {
    fn default() -> Self {
        Self {
            l1_lexical: true,
            l2_occurrence: true,
            l3_lsp_enrichment: true,
            l4_expression_trees: true,
            l5_cfg: true,
            l6_dfg_ssa: true,
            l7_constant_propagation: true,
            l8_semantic_summaries: true,
            l9_cross_file_stub: true,
        }
    }
}

impl LayerToggles {
    pub fn all_disabled() -> Self {
        Self {
            l1_lexical: false,
            l2_occurrence: false,
            l3_lsp_enrichment: false,
            l4_expression_trees: false,
            l5_cfg: false,
            l6_dfg_ssa: false,
            l7_constant_propagation: false,
            l8_semantic_summaries: false,
            l9_cross_file_stub: false,
        }
    }

    /// Only L1 on — the shape the Quick strategy (§4.9) runs with.
    pub fn l1_only() -> Self {
        Self {
            l1_lexical: true,
            ..Self::all_disabled()
        }
    }

    /// A layer can only run if every layer it depends on is also enabled.
    /// L_n depends on L_1..L_(n-1) in this pipeline's linear layering,
    /// except L8 (Semantic Summaries) which depends only on L5, and L9
    /// (Cross-File Stub) which depends only on L1 (§4.4 table) — both are
    /// still required to sit in non-increasing-enablement position here
    /// because the builder runs layers strictly in order and skips any
    /// layer whose toggle is off.
    pub fn is_consistent(&self) -> bool {
        let flags = [
            self.l1_lexical,
            self.l2_occurrence,
            self.l3_lsp_enrichment,
            self.l4_expression_trees,
            self.l5_cfg,
            self.l6_dfg_ssa,
            self.l7_constant_propagation,
            self.l8_semantic_summaries,
            self.l9_cross_file_stub,
        ];
        let mut seen_disabled = false;
        for enabled in flags {
            if !enabled {
                seen_disabled = true;
            } else if seen_disabled {
                return false;
            }
        }
        true
    }

    fn stable_hash_input(&self) -> u64 {
        let mut hasher = ahash::AHasher::default();
        [
            self.l1_lexical,
            self.l2_occurrence,
            self.l3_lsp_enrichment,
            self.l4_expression_trees,
            self.l5_cfg,
            self.l6_dfg_ssa,
            self.l7_constant_propagation,
            self.l8_semantic_summaries,
            self.l9_cross_file_stub,
        ]
        .hash(&mut hasher);
        hasher.finish()
    }

    pub fn config_hash(&self) -> String {
        format!("{:016x}", self.stable_hash_input())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_all_enabled_and_consistent() {
        let t = LayerToggles::default();
        assert!(t.is_consistent());
    }

    #[test]
    fn disabling_a_middle_layer_while_keeping_a_later_one_is_inconsistent() {
        let mut t = LayerToggles::default();
        t.l5_cfg = false;
        assert!(!t.is_consistent());
    }

    #[test]
    fn disabling_a_suffix_of_layers_stays_consistent() {
        let mut t = LayerToggles::default();
        t.l8_semantic_summaries = false;
        t.l9_cross_file_stub = false;
        assert!(t.is_consistent());
    }

    #[test]
    fn l1_only_matches_quick_strategy_shape() {
        let t = LayerToggles::l1_only();
        assert!(t.is_consistent());
        assert!(t.l1_lexical);
        assert!(!t.l2_occurrence);
    }

    #[test]
    fn same_toggles_hash_identically() {
        let a = LayerToggles::default();
        let b = LayerToggles::default();
        assert_eq!(a.config_hash(), b.config_hash());
    }

    #[test]
    fn different_toggles_hash_differently() {
        let a = LayerToggles::default();
        let mut b = LayerToggles::default();
        b.l9_cross_file_stub = false;
        assert_ne!(a.config_hash(), b.config_hash());
    }
}
