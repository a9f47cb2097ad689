//! IRDocument: the per-file arena (§3, §9)
//!
//! Owns every [`Node`], [`Edge`], and [`ExpressionTree`] produced for one
//! file. Children/parents/phi-operands are stored as ids and resolved back
//! through this arena rather than carried as direct references, so the IR
//! can express cycles (e.g. recursive calls, mutually referential classes)
//! without `Rc<RefCell<_>>` bookkeeping.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::cfg::ControlFlowGraph;
use super::edge::{Edge, EdgeKind};
use super::expression::ExpressionTree;
use super::node::Node;
use super::occurrence::OccurrenceIndex;
use crate::shared::ports::language::Language;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IRDocument {
    pub file_path: String,
    pub language: Language,
    pub content_hash: String,

    nodes: Vec<Node>,
    node_index: HashMap<String, usize>,
    edges: Vec<Edge>,
    edge_index: HashMap<(String, String, EdgeKind), usize>,

    pub occurrence_index: OccurrenceIndex,
    /// Per-function expression trees, keyed by the function's node id.
    pub expression_trees: HashMap<String, ExpressionTree>,
    /// Per-function control flow graphs, keyed by the function's node id.
    pub cfgs: HashMap<String, ControlFlowGraph>,
}

impl IRDocument {
    pub fn new(file_path: impl Into<String>, language: Language, content_hash: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            language,
            content_hash: content_hash.into(),
            nodes: Vec::new(),
            node_index: HashMap::new(),
            edges: Vec::new(),
            edge_index: HashMap::new(),
            occurrence_index: OccurrenceIndex::new(),
            expression_trees: HashMap::new(),
            cfgs: HashMap::new(),
        }
    }

    /// Inserts a node, indexed by its stable id. Re-inserting the same id
    /// overwrites in place rather than appending, so incremental re-analysis
    /// of a single function can't duplicate the file's own node.
    pub fn add_node(&mut self, node: Node) -> String {
        let id = node.id.clone();
        if let Some(&idx) = self.node_index.get(&id) {
            self.nodes[idx] = node;
        } else {
            let idx = self.nodes.len();
            self.node_index.insert(id.clone(), idx);
            self.nodes.push(node);
        }
        id
    }

    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.node_index.get(id).map(|&idx| &self.nodes[idx])
    }

    pub fn get_node_mut(&mut self, id: &str) -> Option<&mut Node> {
        let idx = *self.node_index.get(id)?;
        Some(&mut self.nodes[idx])
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn children_of<'a>(&'a self, parent_id: &'a str) -> impl Iterator<Item = &'a Node> {
        self.nodes
            .iter()
            .filter(move |n| n.parent_id.as_deref() == Some(parent_id))
    }

    /// Adds an edge, merging into an existing `(source, target, kind)` triple
    /// by bumping its frequency counter instead of pushing a duplicate (§3).
    pub fn add_edge(&mut self, edge: Edge) {
        let key = (edge.source_id.clone(), edge.target_id.clone(), edge.kind);
        if let Some(&idx) = self.edge_index.get(&key) {
            self.edges[idx].bump_frequency();
        } else {
            let idx = self.edges.len();
            self.edge_index.insert(key, idx);
            self.edges.push(edge);
        }
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Repoints an existing `(source, target, kind)` edge at a new target,
    /// keeping the index consistent. Used by the cross-file resolver to
    /// rewrite an unresolved `Imports` edge onto the module it resolved to.
    /// A no-op if no such edge exists.
    pub fn rewrite_edge_target(
        &mut self,
        source_id: &str,
        old_target_id: &str,
        kind: EdgeKind,
        new_target_id: impl Into<String>,
    ) {
        let key = (source_id.to_string(), old_target_id.to_string(), kind);
        if let Some(idx) = self.edge_index.remove(&key) {
            let new_target_id = new_target_id.into();
            self.edges[idx].target_id = new_target_id.clone();
            self.edge_index.insert((source_id.to_string(), new_target_id, kind), idx);
        }
    }

    pub fn edges_from<'a>(&'a self, source_id: &'a str) -> impl Iterator<Item = &'a Edge> {
        self.edges.iter().filter(move |e| e.source_id == source_id)
    }

    pub fn edges_to<'a>(&'a self, target_id: &'a str) -> impl Iterator<Item = &'a Edge> {
        self.edges.iter().filter(move |e| e.target_id == target_id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Tags every node in this document `overlay=true` — used by the
    /// Overlay pipeline strategy (§4.9) to mark IR built from an uncommitted
    /// working-tree file rather than the baseline snapshot.
    pub fn mark_overlay(&mut self) {
        for node in &mut self.nodes {
            node.attrs.insert("overlay".to_string(), super::node::AttrValue::Bool(true));
        }
    }
}
