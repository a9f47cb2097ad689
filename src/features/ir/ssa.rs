//! L6 DFG + SSA (§4.4)
//!
//! For each function with both a CFG and an expression tree, delegates phi
//! placement and def-use wiring to the C6 engine's `build_ssa` (§4.6) and
//! copies the resulting edges into the document. This adapter owns only
//! the per-function bookkeeping of which CFG goes with which tree.

use crate::features::flow::ssa::build_ssa;
use crate::shared::models::IRDocument;

pub struct SsaBuilder;

impl SsaBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn run(&self, doc: &mut IRDocument) {
        let function_ids: Vec<String> = doc.cfgs.keys().cloned().collect();
        for function_id in function_ids {
            let Some(cfg) = doc.cfgs.get(&function_id) else { continue };
            let Some(expr_tree) = doc.expression_trees.get(&function_id) else { continue };
            let result = build_ssa(&function_id, cfg, expr_tree);
            for edge in result.phi_edges {
                doc.add_edge(edge);
            }
            for edge in result.dfg_edges {
                doc.add_edge(edge);
            }
        }
    }
}

impl Default for SsaBuilder {
    fn default() -> Self {
        Self::new()
    }
}
