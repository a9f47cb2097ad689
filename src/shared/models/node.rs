//! Node model (§3 Data Model)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::Span;

/// Closed set of node kinds. Adding one requires matching updates wherever
/// `NodeKind` is exhaustively matched (occurrence role mapping, symbol graph
/// `is_public`/`is_exported` heuristics).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    File,
    Module,
    Class,
    Function,
    Method,
    Field,
    Parameter,
    Variable,
    Lambda,
    Import,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Module => "module",
            Self::Class => "class",
            Self::Function => "function",
            Self::Method => "method",
            Self::Field => "field",
            Self::Parameter => "parameter",
            Self::Variable => "variable",
            Self::Lambda => "lambda",
            Self::Import => "import",
        }
    }

    /// Kinds that introduce a new lexical scope.
    pub fn is_scope(&self) -> bool {
        matches!(
            self,
            Self::File | Self::Module | Self::Class | Self::Function | Self::Method | Self::Lambda
        )
    }
}

/// Opaque attribute value. A closed sum over the attribute shapes this crate
/// actually produces, with `Other` as the extensibility escape hatch per
/// §9's guidance on dynamic attribute bags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum AttrValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    StrList(Vec<String>),
    Other(serde_json::Value),
}

pub type AttrMap = HashMap<String, AttrValue>;

/// Per-function complexity/size summary, produced by L8.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlFlowSummary {
    pub cyclomatic_complexity: u32,
    pub loc: u32,
    pub has_side_effects: bool,
}

/// A node in the layered IR. `id` is content-stable: `hash(kind, fqn,
/// file_path, span_start)` (see [`crate::shared::utils::id_generator`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub fqn: String,
    pub name: String,
    pub file_path: String,
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub attrs: AttrMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_flow_summary: Option<ControlFlowSummary>,
}

impl Node {
    pub fn new(kind: NodeKind, fqn: String, name: String, file_path: String, span: Span) -> Self {
        let id = crate::shared::utils::id_generator::stable_node_id(kind, &fqn, &file_path, &span);
        Self {
            id,
            kind,
            fqn,
            name,
            file_path,
            span,
            parent_id: None,
            attrs: HashMap::new(),
            control_flow_summary: None,
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: AttrValue) -> Self {
        self.attrs.insert(key.into(), value);
        self
    }

    /// Python convention: a leading underscore that is not a dunder marks a
    /// private symbol. Used by the symbol graph projector's `is_public`.
    pub fn is_public_by_convention(&self) -> bool {
        !self.name.starts_with('_') || self.name.starts_with("__")
    }
}

/// Builder mirroring [`Node::new`]'s required fields plus the optional ones,
/// useful where a node is assembled incrementally across an AST visit.
#[derive(Debug, Default)]
pub struct NodeBuilder {
    kind: Option<NodeKind>,
    fqn: Option<String>,
    name: Option<String>,
    file_path: Option<String>,
    span: Option<Span>,
    parent_id: Option<String>,
    attrs: AttrMap,
    control_flow_summary: Option<ControlFlowSummary>,
}

impl NodeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: NodeKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn fqn(mut self, fqn: impl Into<String>) -> Self {
        self.fqn = Some(fqn.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn file_path(mut self, file_path: impl Into<String>) -> Self {
        self.file_path = Some(file_path.into());
        self
    }

    pub fn span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn parent_id(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn attr(mut self, key: impl Into<String>, value: AttrValue) -> Self {
        self.attrs.insert(key.into(), value);
        self
    }

    pub fn control_flow_summary(mut self, summary: ControlFlowSummary) -> Self {
        self.control_flow_summary = Some(summary);
        self
    }

    /// Panics if a required field (`kind`, `fqn`, `name`, `file_path`,
    /// `span`) was never set — a programmer error in the caller, not a
    /// runtime condition.
    pub fn build(self) -> Node {
        let kind = self.kind.expect("NodeBuilder::kind not set");
        let fqn = self.fqn.expect("NodeBuilder::fqn not set");
        let name = self.name.expect("NodeBuilder::name not set");
        let file_path = self.file_path.expect("NodeBuilder::file_path not set");
        let span = self.span.expect("NodeBuilder::span not set");

        let mut node = Node::new(kind, fqn, name, file_path, span);
        node.parent_id = self.parent_id;
        node.attrs = self.attrs;
        node.control_flow_summary = self.control_flow_summary;
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_id_depends_on_kind_fqn_path_span() {
        let a = Node::new(
            NodeKind::Function,
            "pkg.mod.f".into(),
            "f".into(),
            "pkg/mod.py".into(),
            Span::new(1, 0, 3, 0),
        );
        let b = Node::new(
            NodeKind::Function,
            "pkg.mod.f".into(),
            "f".into(),
            "pkg/mod.py".into(),
            Span::new(1, 0, 3, 0),
        );
        assert_eq!(a.id, b.id);

        let c = Node::new(
            NodeKind::Function,
            "pkg.mod.g".into(),
            "g".into(),
            "pkg/mod.py".into(),
            Span::new(1, 0, 3, 0),
        );
        assert_ne!(a.id, c.id);
    }

    #[test]
    fn private_by_convention() {
        let n = Node::new(
            NodeKind::Function,
            "m._helper".into(),
            "_helper".into(),
            "m.py".into(),
            Span::zero(),
        );
        assert!(!n.is_public_by_convention());

        let dunder = Node::new(
            NodeKind::Method,
            "m.C.__init__".into(),
            "__init__".into(),
            "m.py".into(),
            Span::zero(),
        );
        assert!(dunder.is_public_by_convention());
    }
}
