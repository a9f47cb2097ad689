//! Occurrence index (§3, L2 Occurrence Index)
//!
//! An occurrence is one textual mention of an identifier: a definition, a
//! read, or a write. `IRDocument.occurrence_index` maps identifier text to
//! its occurrences so downstream symbol search doesn't need to re-walk the
//! AST.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::node::{Node, NodeKind};
use super::Span;

/// Why an identifier was mentioned at this position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceKind {
    Definition,
    Read,
    Write,
}

/// One mention of `identifier` at `span`. `symbol_id` is populated once the
/// cross-file resolver (C5) has run; before that it is `None` for anything
/// that isn't resolvable purely from the local file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Occurrence {
    pub identifier: Arc<str>,
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol_id: Option<String>,
    pub reference_kind: ReferenceKind,
}

impl Occurrence {
    pub fn new(identifier: impl Into<Arc<str>>, span: Span, reference_kind: ReferenceKind) -> Self {
        Self {
            identifier: identifier.into(),
            span,
            symbol_id: None,
            reference_kind,
        }
    }

    pub fn with_symbol(mut self, symbol_id: impl Into<String>) -> Self {
        self.symbol_id = Some(symbol_id.into());
        self
    }

    fn symbol_kind_has_occurrence(kind: &NodeKind) -> bool {
        matches!(
            kind,
            NodeKind::Class
                | NodeKind::Function
                | NodeKind::Method
                | NodeKind::Variable
                | NodeKind::Parameter
                | NodeKind::Field
                | NodeKind::Lambda
        )
    }

    /// The definition occurrence implied by a node's own declaration site.
    pub fn definition_for(node: &Node) -> Option<Self> {
        if !Self::symbol_kind_has_occurrence(&node.kind) {
            return None;
        }
        Some(
            Self::new(node.name.clone(), node.span, ReferenceKind::Definition)
                .with_symbol(node.id.clone()),
        )
    }
}

/// Per-file index: identifier text → every occurrence of it, insertion order
/// preserved (source order) for deterministic serialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OccurrenceIndex {
    by_identifier: std::collections::BTreeMap<String, Vec<Occurrence>>,
}

impl OccurrenceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, occurrence: Occurrence) {
        self.by_identifier
            .entry(occurrence.identifier.to_string())
            .or_default()
            .push(occurrence);
    }

    pub fn get(&self, identifier: &str) -> &[Occurrence] {
        self.by_identifier
            .get(identifier)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Sets the resolved symbol id on one occurrence of `identifier`, found
    /// by its position in insertion order (as returned by `get`). Used by
    /// L3 enrichment once a type service resolves a read/write to its
    /// definition site.
    pub fn set_symbol_id(&mut self, identifier: &str, index: usize, symbol_id: String) {
        if let Some(occs) = self.by_identifier.get_mut(identifier) {
            if let Some(occ) = occs.get_mut(index) {
                occ.symbol_id = Some(symbol_id);
            }
        }
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.by_identifier.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_identifier.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_identifier.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definition_requires_symbol_kind() {
        let file_node = Node::new(
            NodeKind::File,
            "a.py".into(),
            "a.py".into(),
            "a.py".into(),
            Span::zero(),
        );
        assert!(Occurrence::definition_for(&file_node).is_none());

        let func_node = Node::new(
            NodeKind::Function,
            "a.f".into(),
            "f".into(),
            "a.py".into(),
            Span::new(1, 0, 2, 0),
        );
        let occ = Occurrence::definition_for(&func_node).unwrap();
        assert_eq!(occ.reference_kind, ReferenceKind::Definition);
        assert_eq!(occ.symbol_id.as_deref(), Some(func_node.id.as_str()));
    }

    #[test]
    fn index_preserves_insertion_order_per_identifier() {
        let mut idx = OccurrenceIndex::new();
        idx.insert(Occurrence::new("x", Span::new(1, 0, 1, 1), ReferenceKind::Definition));
        idx.insert(Occurrence::new("x", Span::new(2, 0, 2, 1), ReferenceKind::Read));
        let occs = idx.get("x");
        assert_eq!(occs.len(), 2);
        assert_eq!(occs[0].reference_kind, ReferenceKind::Definition);
        assert_eq!(occs[1].reference_kind, ReferenceKind::Read);
    }
}
