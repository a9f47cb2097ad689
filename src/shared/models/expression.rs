//! L4 Expression Trees (§4.4)
//!
//! Typed expression nodes per statement, linked by parent/child ids so the
//! tree is an arena rather than a pointer graph — the owning
//! [`crate::shared::models::ir_document::IRDocument`] is the arena, per §9's
//! guidance on cyclic node references.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::Span;

pub type ExprId = usize;
pub type VarId = String;
pub type SymbolId = String;

/// The five expression kinds L4 is required to distinguish (§4.4). Each
/// variant that is itself a family of operators (`BinOp`) carries its own
/// sub-enum instead of widening `ExprKind`, so adding an operator never
/// changes the set of *kinds* SCCP has to pattern-match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    Assign,
    Call,
    BinOp(BinOp),
    Literal(LiteralValue),
    NameLoad,
}

/// Binary operator. Division and modulo carry no special variant — the
/// zero-divisor case is detected by the SCCP evaluator at fold time, not by
/// the grammar of operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    LShift,
    RShift,
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    And,
    Or,
}

/// A literal's own value, carried inline so the constant lattice (§3) can
/// read it without re-parsing source text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LiteralValue {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    None,
}

/// One node of the per-statement expression tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expression {
    pub id: ExprId,
    pub kind: ExprKind,
    pub span: Span,
    pub function_id: Option<String>,
    pub block_id: Option<String>,

    /// Operand expression ids (CodeQL-style data-flow edges within the tree).
    pub reads: Vec<ExprId>,
    /// Variable this expression defines, for `Assign`.
    pub defines: Option<VarId>,

    pub symbol_id: Option<SymbolId>,

    pub parent: Option<ExprId>,
    pub children: Vec<ExprId>,

    #[serde(default)]
    pub attrs: HashMap<String, serde_json::Value>,
}

impl Expression {
    pub fn new(id: ExprId, kind: ExprKind, span: Span) -> Self {
        Self {
            id,
            kind,
            span,
            function_id: None,
            block_id: None,
            reads: Vec::new(),
            defines: None,
            symbol_id: None,
            parent: None,
            children: Vec::new(),
            attrs: HashMap::new(),
        }
    }
}

/// An arena of expressions for one function body, indexed by `ExprId`.
/// Children/parent are stored as ids and resolved through this arena, never
/// as direct references — see §9 on cyclic node references.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpressionTree {
    nodes: Vec<Expression>,
}

impl ExpressionTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mut expr: Expression) -> ExprId {
        let id = self.nodes.len();
        expr.id = id;
        self.nodes.push(expr);
        id
    }

    pub fn get(&self, id: ExprId) -> Option<&Expression> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: ExprId) -> Option<&mut Expression> {
        self.nodes.get_mut(id)
    }

    pub fn attach_child(&mut self, parent: ExprId, child: ExprId) {
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Expression> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_child_links_both_directions() {
        let mut tree = ExpressionTree::new();
        let lit = tree.push(Expression::new(0, ExprKind::Literal(LiteralValue::Int(1)), Span::zero()));
        let assign = tree.push(Expression::new(0, ExprKind::Assign, Span::zero()));
        tree.attach_child(assign, lit);

        assert_eq!(tree.get(assign).unwrap().children, vec![lit]);
        assert_eq!(tree.get(lit).unwrap().parent, Some(assign));
    }
}
