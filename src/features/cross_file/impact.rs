//! Impact analysis (§E5)
//!
//! A read-only projection over data C5/C7 already produce: given a changed
//! symbol, how far does the change reach and how risky does that reach
//! look. No new analysis engine — `blast_radius` is `DependencyGraph::widen`
//! plus the symbol's own call/reference counts.

use std::collections::{HashMap, HashSet};

use crate::features::graph_builder::SymbolGraph;

use super::dep_graph::DependencyGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone)]
pub struct ImpactAnalysis {
    pub affected_files: Vec<String>,
    pub risk_level: RiskLevel,
}

/// Every file reachable from `file_path` by walking `file_dependencies`
/// backward (§E5 `DependencyGraph::widen`), sized against how heavily
/// `node_id` is called/referenced within the symbol graph.
pub fn blast_radius(
    file_path: &str,
    node_id: &str,
    file_dependencies: &HashMap<String, Vec<String>>,
    symbol_graph: &SymbolGraph,
) -> ImpactAnalysis {
    let dep_graph = DependencyGraph::build(file_dependencies);
    let mut changed = HashSet::new();
    changed.insert(file_path.to_string());

    let mut affected_files: Vec<String> = dep_graph.widen(&changed).into_iter().collect();
    affected_files.sort();

    let usage = symbol_graph
        .symbols
        .iter()
        .find(|s| s.id == node_id)
        .map(|s| s.call_count + s.reference_count)
        .unwrap_or(0);

    let risk_level = if affected_files.len() > 10 || usage > 20 {
        RiskLevel::High
    } else if affected_files.len() > 3 || usage > 5 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    ImpactAnalysis { affected_files, risk_level }
}
