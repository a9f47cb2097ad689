//! `build_ssa` / `build_dfg` (§4.6): phi placement at the iterated
//! dominance frontier, plus reaching-definition renaming, over one
//! function's CFG and expression tree. C4's L6 adapter
//! (`features::ir::ssa`) owns per-file bookkeeping only.

use std::collections::{HashMap, HashSet};

use super::dominance::Dominance;
use crate::shared::models::{ControlFlowGraph, Edge, EdgeKind, ExprKind, ExpressionTree};

/// Phi placements and def-use edges for one function.
#[derive(Debug, Default)]
pub struct SsaResult {
    /// One `Phi` edge per (predecessor block, phi site) pair.
    pub phi_edges: Vec<Edge>,
    /// One `Dfg` edge per read that resolves to a reaching definition.
    pub dfg_edges: Vec<Edge>,
}

pub fn build_ssa(function_id: &str, cfg: &ControlFlowGraph, expr_tree: &ExpressionTree) -> SsaResult {
    let dominance = Dominance::compute(cfg);
    let defs_by_block = defined_variables_per_block(cfg, expr_tree);
    let reads_by_block = read_variables_per_block(cfg, expr_tree);

    let mut all_vars: HashSet<String> = HashSet::new();
    for vars in defs_by_block.values() {
        all_vars.extend(vars.iter().cloned());
    }

    let mut result = SsaResult::default();

    for var in &all_vars {
        let def_blocks: Vec<String> = defs_by_block
            .iter()
            .filter(|(_, vars)| vars.contains(var))
            .map(|(block, _)| block.clone())
            .collect();
        let phi_blocks = dominance.iterated_frontier(&def_blocks);

        for block in &phi_blocks {
            let phi_id = format!("{function_id}::phi::{var}::{block}");
            let Some(cfg_block) = cfg.block(block) else { continue };
            let mut preds = cfg_block.predecessors.clone();
            // ordered by predecessor block id for determinism (§4.4)
            preds.sort();
            for pred in preds {
                result.phi_edges.push(Edge::new(pred, phi_id.clone(), EdgeKind::Phi));
            }
        }
    }

    build_dfg(function_id, cfg, &dominance, &defs_by_block, &reads_by_block, &mut result.dfg_edges);
    result
}

enum Walk {
    Enter(String),
    Exit(String),
}

/// Rename pass: one pre-order walk of the dominance tree, with a per-variable
/// stack of reaching definitions (§4.6). A def pushes a new version for its
/// variable on entry to its block and pops it on leaving that block's
/// subtree, so a read always sees the nearest definition that *dominates*
/// it — never a definition from a sibling branch that merely happened to be
/// visited earlier in block order.
fn build_dfg(
    function_id: &str,
    cfg: &ControlFlowGraph,
    dominance: &Dominance,
    defs_by_block: &HashMap<String, HashSet<String>>,
    reads_by_block: &HashMap<String, HashSet<String>>,
    out: &mut Vec<Edge>,
) {
    if cfg.blocks.is_empty() {
        return;
    }

    let mut children: HashMap<String, Vec<String>> = HashMap::new();
    for block in &cfg.blocks {
        if let Some(parent) = dominance.idom.get(&block.id) {
            if parent != &block.id {
                children.entry(parent.clone()).or_default().push(block.id.clone());
            }
        }
    }
    for kids in children.values_mut() {
        kids.sort();
    }

    let mut version: HashMap<String, u32> = HashMap::new();
    let mut def_stack: HashMap<String, Vec<(String, u32)>> = HashMap::new();
    let mut pushed_at: HashMap<String, Vec<String>> = HashMap::new();

    let mut stack = vec![Walk::Enter(cfg.entry_block_id.clone())];
    while let Some(frame) = stack.pop() {
        match frame {
            Walk::Enter(block_id) => {
                if let Some(defs) = defs_by_block.get(&block_id) {
                    let mut defs: Vec<&String> = defs.iter().collect();
                    defs.sort();
                    for var in defs {
                        let next_version = version.entry(var.clone()).and_modify(|v| *v += 1).or_insert(0);
                        def_stack.entry(var.clone()).or_default().push((block_id.clone(), *next_version));
                        pushed_at.entry(block_id.clone()).or_default().push(var.clone());
                    }
                }
                if let Some(reads) = reads_by_block.get(&block_id) {
                    let mut reads: Vec<&String> = reads.iter().collect();
                    reads.sort();
                    for var in reads {
                        if let Some((def_block, def_version)) = def_stack.get(var).and_then(|s| s.last()) {
                            let def_id = format!("{function_id}::def::{var}::{def_block}@{def_version}");
                            let read_id = format!("{function_id}::read::{var}::{block_id}");
                            out.push(Edge::new(def_id, read_id, EdgeKind::Dfg));
                        }
                    }
                }

                stack.push(Walk::Exit(block_id.clone()));
                if let Some(kids) = children.get(&block_id) {
                    for child in kids.iter().rev() {
                        stack.push(Walk::Enter(child.clone()));
                    }
                }
            }
            Walk::Exit(block_id) => {
                if let Some(vars) = pushed_at.remove(&block_id) {
                    for var in vars {
                        if let Some(s) = def_stack.get_mut(&var) {
                            s.pop();
                        }
                    }
                }
            }
        }
    }
}

fn defined_variables_per_block(cfg: &ControlFlowGraph, expr_tree: &ExpressionTree) -> HashMap<String, HashSet<String>> {
    let mut out: HashMap<String, HashSet<String>> = HashMap::new();
    for expr in expr_tree.iter() {
        if let (ExprKind::Assign, Some(var)) = (&expr.kind, &expr.defines) {
            if let Some(block) = block_containing(cfg, expr.span) {
                out.entry(block).or_default().insert(var.clone());
            }
        }
    }
    out
}

fn read_variables_per_block(cfg: &ControlFlowGraph, expr_tree: &ExpressionTree) -> HashMap<String, HashSet<String>> {
    let mut out: HashMap<String, HashSet<String>> = HashMap::new();
    for expr in expr_tree.iter() {
        if let (ExprKind::NameLoad, Some(symbol)) = (&expr.kind, &expr.symbol_id) {
            if let Some(block) = block_containing(cfg, expr.span) {
                out.entry(block).or_default().insert(symbol.clone());
            }
        }
    }
    out
}

fn block_containing(cfg: &ControlFlowGraph, span: crate::shared::models::Span) -> Option<String> {
    cfg.blocks
        .iter()
        .find(|b| b.span.contains(&span))
        .map(|b| b.id.clone())
        .or_else(|| cfg.blocks.first().map(|b| b.id.clone()))
}
