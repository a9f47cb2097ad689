//! Language-neutral syntax tree (§4.3, consumed by C4 L1)

use crate::shared::models::Span;

/// Syntax node kind, normalized across the seven supported grammars.
/// Anything a specific grammar produces that doesn't map onto one of
/// these falls into `Other`, carrying the raw tree-sitter kind string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxKind {
    Module,
    FunctionDef,
    MethodDef,
    ClassDef,
    LambdaDef,

    VariableDecl,
    ParameterDecl,
    FieldDecl,
    ImportDecl,

    CallExpr,
    NameExpr,
    AttributeExpr,
    LiteralExpr,
    BinaryExpr,
    UnaryExpr,

    AssignmentStmt,
    ReturnStmt,
    IfStmt,
    ForStmt,
    WhileStmt,
    TryStmt,
    WithStmt,

    BreakStmt,
    ContinueStmt,
    RaiseStmt,
    YieldExpr,
    AwaitExpr,

    Block,
    Comment,
    Decorator,
    TypeAnnotation,

    Other(String),
}

impl SyntaxKind {
    pub fn is_definition(&self) -> bool {
        matches!(
            self,
            SyntaxKind::FunctionDef
                | SyntaxKind::MethodDef
                | SyntaxKind::ClassDef
                | SyntaxKind::LambdaDef
        )
    }

    pub fn is_control_flow(&self) -> bool {
        matches!(
            self,
            SyntaxKind::IfStmt
                | SyntaxKind::ForStmt
                | SyntaxKind::WhileStmt
                | SyntaxKind::TryStmt
                | SyntaxKind::WithStmt
                | SyntaxKind::BreakStmt
                | SyntaxKind::ContinueStmt
                | SyntaxKind::ReturnStmt
                | SyntaxKind::RaiseStmt
        )
    }
}

/// A node in the normalized AST. Owns its children (the tree is immutable
/// once built, so sharing would buy nothing and borrowing would fight the
/// facade's recursive construction).
#[derive(Debug, Clone)]
pub struct SyntaxNode {
    pub kind: SyntaxKind,
    pub span: Span,
    pub text: Option<String>,
    pub children: Vec<SyntaxNode>,
    pub raw_kind: &'static str,
}

impl SyntaxNode {
    pub fn new(kind: SyntaxKind, span: Span, raw_kind: &'static str) -> Self {
        Self {
            kind,
            span,
            text: None,
            children: Vec::new(),
            raw_kind,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_children(mut self, children: Vec<SyntaxNode>) -> Self {
        self.children = children;
        self
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    pub fn find_child(&self, kind: &SyntaxKind) -> Option<&SyntaxNode> {
        self.children.iter().find(|c| &c.kind == kind)
    }

    pub fn find_children(&self, kind: &SyntaxKind) -> Vec<&SyntaxNode> {
        self.children.iter().filter(|c| &c.kind == kind).collect()
    }

    /// Pre-order sequence of raw tree-sitter kinds — the input to
    /// `features::cache::struct_hash`.
    pub fn kind_sequence(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_kind_sequence(&mut out);
        out
    }

    fn collect_kind_sequence<'a>(&'a self, out: &mut Vec<&'a str>) {
        out.push(self.raw_kind);
        for child in &self.children {
            child.collect_kind_sequence(out);
        }
    }
}
