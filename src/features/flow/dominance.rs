//! CHK dominance (Cooper, Harvey, Kennedy, "A Simple, Fast Dominance
//! Algorithm") and iterated dominance frontiers, feeding L6 phi placement.
//!
//! This replaces on-demand phi insertion (Braun et al.) with the classic
//! two-pass construction: compute immediate dominators over a reverse
//! postorder numbering, then compute each block's dominance frontier from
//! the resulting tree.

use std::collections::{HashMap, HashSet};

use crate::shared::models::ControlFlowGraph;

#[derive(Debug, Clone, Default)]
pub struct Dominance {
    /// Immediate dominator of each block, keyed by block id. The entry
    /// block is its own idom.
    pub idom: HashMap<String, String>,
    /// Dominance frontier of each block.
    pub frontier: HashMap<String, HashSet<String>>,
}

impl Dominance {
    pub fn compute(cfg: &ControlFlowGraph) -> Self {
        if cfg.blocks.is_empty() {
            return Self::default();
        }

        let order = reverse_postorder(cfg);
        let index_of: HashMap<&str, usize> = order.iter().enumerate().map(|(i, id)| (id.as_str(), i)).collect();

        let mut idom: HashMap<String, String> = HashMap::new();
        idom.insert(cfg.entry_block_id.clone(), cfg.entry_block_id.clone());

        let mut changed = true;
        while changed {
            changed = false;
            for block_id in order.iter().skip(1) {
                let Some(block) = cfg.block(block_id) else { continue };
                let mut new_idom: Option<String> = None;
                for pred in &block.predecessors {
                    if !idom.contains_key(pred) {
                        continue;
                    }
                    new_idom = Some(match new_idom {
                        None => pred.clone(),
                        Some(current) => intersect(&current, pred, &idom, &index_of),
                    });
                }
                if let Some(new_idom) = new_idom {
                    if idom.get(block_id) != Some(&new_idom) {
                        idom.insert(block_id.clone(), new_idom);
                        changed = true;
                    }
                }
            }
        }

        let frontier = compute_frontier(cfg, &idom);
        Self { idom, frontier }
    }

    /// The iterated dominance frontier of a set of definition blocks — the
    /// minimal set of join points where a phi for a variable defined in
    /// `def_blocks` must be placed.
    pub fn iterated_frontier(&self, def_blocks: &[String]) -> HashSet<String> {
        let mut result: HashSet<String> = HashSet::new();
        let mut worklist: Vec<String> = def_blocks.to_vec();
        let mut seen_as_def: HashSet<String> = def_blocks.iter().cloned().collect();

        while let Some(block) = worklist.pop() {
            let Some(df) = self.frontier.get(&block) else { continue };
            for node in df {
                if result.insert(node.clone()) && seen_as_def.insert(node.clone()) {
                    worklist.push(node.clone());
                }
            }
        }
        result
    }
}

fn intersect(a: &str, b: &str, idom: &HashMap<String, String>, index_of: &HashMap<&str, usize>) -> String {
    let mut finger1 = a.to_string();
    let mut finger2 = b.to_string();
    while finger1 != finger2 {
        while index_of[finger1.as_str()] > index_of[finger2.as_str()] {
            finger1 = idom[&finger1].clone();
        }
        while index_of[finger2.as_str()] > index_of[finger1.as_str()] {
            finger2 = idom[&finger2].clone();
        }
    }
    finger1
}

fn compute_frontier(cfg: &ControlFlowGraph, idom: &HashMap<String, String>) -> HashMap<String, HashSet<String>> {
    let mut frontier: HashMap<String, HashSet<String>> = HashMap::new();
    for block in &cfg.blocks {
        if block.predecessors.len() < 2 {
            continue;
        }
        let Some(block_idom) = idom.get(&block.id).cloned() else { continue };
        for pred in &block.predecessors {
            if !idom.contains_key(pred) {
                continue;
            }
            let mut runner = pred.clone();
            while runner != block_idom {
                frontier.entry(runner.clone()).or_default().insert(block.id.clone());
                let Some(next) = idom.get(&runner).cloned() else { break };
                if next == runner {
                    break;
                }
                runner = next;
            }
        }
    }
    frontier
}

fn reverse_postorder(cfg: &ControlFlowGraph) -> Vec<String> {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut postorder: Vec<String> = Vec::new();
    let mut stack: Vec<(&str, usize)> = vec![(cfg.entry_block_id.as_str(), 0)];
    visited.insert(cfg.entry_block_id.as_str());

    while let Some((block_id, child_idx)) = stack.pop() {
        let successors = cfg.block(block_id).map(|b| b.successors.as_slice()).unwrap_or(&[]);
        if let Some(next) = successors.get(child_idx) {
            stack.push((block_id, child_idx + 1));
            if visited.insert(next.as_str()) {
                stack.push((next.as_str(), 0));
            }
        } else {
            postorder.push(block_id.to_string());
        }
    }
    postorder.reverse();
    postorder
}
