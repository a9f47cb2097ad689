//! Dependency graph with cycle detection (§E5)
//!
//! `GlobalContext::file_dependencies` (C5) is one hop: file → the files it
//! directly imports. Widening an incremental rebuild correctly needs the
//! transitive closure, and a cyclic import group must rebuild as one unit —
//! a one-hop check on its own misses both. Built on `petgraph` the way the
//! teacher's own `dep_graph.rs`/`dependency_graph.rs` are.

use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::algo::tarjan_scc;
use petgraph::Direction;

pub struct DependencyGraph {
    graph: DiGraph<String, ()>,
    index_of: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// `file_dependencies[a] = [b, c]` becomes edges `a → b`, `a → c`
    /// ("a depends on b and c").
    pub fn build(file_dependencies: &HashMap<String, Vec<String>>) -> Self {
        let mut graph = DiGraph::new();
        let mut index_of: HashMap<String, NodeIndex> = HashMap::new();

        for (file, deps) in file_dependencies {
            index_of.entry(file.clone()).or_insert_with(|| graph.add_node(file.clone()));
            for dep in deps {
                index_of.entry(dep.clone()).or_insert_with(|| graph.add_node(dep.clone()));
            }
        }
        for (file, deps) in file_dependencies {
            let from = index_of[file];
            for dep in deps {
                let to = index_of[dep];
                graph.add_edge(from, to, ());
            }
        }

        Self { graph, index_of }
    }

    /// Every strongly-connected component with more than one member — files
    /// that import each other, directly or indirectly, and so must always
    /// rebuild together.
    pub fn cycles(&self) -> Vec<Vec<String>> {
        tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1)
            .map(|scc| scc.into_iter().map(|idx| self.graph[idx].clone()).collect())
            .collect()
    }

    /// `changed` plus every file that depends on a changed file, directly or
    /// transitively — walking dependency edges backward from each changed
    /// node closes over both ordinary chains and import cycles.
    pub fn widen(&self, changed: &HashSet<String>) -> HashSet<String> {
        let mut result: HashSet<String> = changed.clone();
        let mut stack: Vec<NodeIndex> = changed.iter().filter_map(|f| self.index_of.get(f)).copied().collect();
        let mut seen: HashSet<NodeIndex> = stack.iter().copied().collect();

        while let Some(node) = stack.pop() {
            for dependent in self.graph.neighbors_directed(node, Direction::Incoming) {
                if seen.insert(dependent) {
                    result.insert(self.graph[dependent].clone());
                    stack.push(dependent);
                }
            }
        }

        result
    }
}
