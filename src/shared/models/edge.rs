//! Edge model (§3 Data Model)

use serde::{Deserialize, Serialize};

use super::node::AttrMap;
use super::Span;

/// Closed set of edge kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    Contains,
    Defines,
    Calls,
    Reads,
    Writes,
    Imports,
    Inherits,
    References,
    Dfg,
    Cfg,
    Phi,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contains => "contains",
            Self::Defines => "defines",
            Self::Calls => "calls",
            Self::Reads => "reads",
            Self::Writes => "writes",
            Self::Imports => "imports",
            Self::Inherits => "inherits",
            Self::References => "references",
            Self::Dfg => "dfg",
            Self::Cfg => "cfg",
            Self::Phi => "phi",
        }
    }
}

/// An edge between two nodes, identified by `(source_id, target_id, kind)`.
/// A document must never contain two edges with the same triple unless a
/// `frequency` counter on `attrs` tracks the duplicate count explicitly —
/// see [`crate::shared::models::ir_document::IRDocument::add_edge`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub source_id: String,
    pub target_id: String,
    pub kind: EdgeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<AttrMap>,
}

impl Edge {
    pub fn new(source_id: impl Into<String>, target_id: impl Into<String>, kind: EdgeKind) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            kind,
            span: None,
            attrs: None,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Same (source, target, kind) triple as `other` — the identity used to
    /// detect and merge parallel duplicate edges.
    pub fn same_identity(&self, other: &Edge) -> bool {
        self.source_id == other.source_id
            && self.target_id == other.target_id
            && self.kind == other.kind
    }

    pub fn frequency(&self) -> u32 {
        match self.attrs.as_ref().and_then(|a| a.get("frequency")) {
            Some(super::node::AttrValue::Int(n)) => (*n).max(1) as u32,
            _ => 1,
        }
    }

    pub fn bump_frequency(&mut self) {
        let attrs = self.attrs.get_or_insert_with(Default::default);
        let next = self.frequency() + 1;
        attrs.insert(
            "frequency".to_string(),
            super::node::AttrValue::Int(next as i64),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_edges_merge_via_frequency() {
        let mut e = Edge::new("a", "b", EdgeKind::Calls);
        assert_eq!(e.frequency(), 1);
        e.bump_frequency();
        e.bump_frequency();
        assert_eq!(e.frequency(), 3);
    }

    #[test]
    fn same_identity_ignores_span() {
        let a = Edge::new("a", "b", EdgeKind::Calls).with_span(Span::new(1, 0, 1, 5));
        let b = Edge::new("a", "b", EdgeKind::Calls).with_span(Span::new(9, 0, 9, 5));
        assert!(a.same_identity(&b));
    }
}
