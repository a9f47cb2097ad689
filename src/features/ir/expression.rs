//! L4 Expression Trees (§4.4)
//!
//! Builds one `ExpressionTree` per function/method, typing each statement
//! into one of the five kinds the spec calls out (ASSIGN, CALL, BIN_OP,
//! LITERAL, NAME_LOAD). Anything else in the AST (control-flow statements,
//! blocks) is transparent here — it is walked through to find the
//! expressions it contains, but never becomes an `Expression` node itself;
//! L5 is the layer that gives those statements shape as basic blocks.

use crate::features::parsing::{ParsedTree, SyntaxKind, SyntaxNode};
use crate::shared::models::{
    BinOp, Expression, ExprId, ExprKind, IRDocument, LiteralValue, NodeKind,
};

pub struct ExpressionBuilder;

impl ExpressionBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn run(&self, tree: &ParsedTree, doc: &mut IRDocument) {
        self.walk(&tree.root, doc);
    }

    fn walk(&self, node: &SyntaxNode, doc: &mut IRDocument) {
        if matches!(node.kind, SyntaxKind::FunctionDef | SyntaxKind::MethodDef) {
            if let Some(function_id) = self.matching_function_id(node, doc) {
                let mut expr_tree = crate::shared::models::ExpressionTree::new();
                for stmt in &node.children {
                    self.build_statement(stmt, &mut expr_tree);
                }
                doc.expression_trees.insert(function_id, expr_tree);
            }
        }
        for child in &node.children {
            self.walk(child, doc);
        }
    }

    fn matching_function_id(&self, node: &SyntaxNode, doc: &IRDocument) -> Option<String> {
        doc.nodes()
            .find(|n| matches!(n.kind, NodeKind::Function | NodeKind::Method) && n.span == node.span)
            .map(|n| n.id.clone())
    }

    /// Recurses through non-expression statements looking for top-level
    /// expressions (assignments, bare calls). Nested function/class
    /// definitions are skipped — `walk` gives each its own tree.
    fn build_statement(&self, node: &SyntaxNode, expr_tree: &mut crate::shared::models::ExpressionTree) {
        match &node.kind {
            SyntaxKind::FunctionDef | SyntaxKind::MethodDef | SyntaxKind::ClassDef => {}
            SyntaxKind::AssignmentStmt
            | SyntaxKind::CallExpr
            | SyntaxKind::BinaryExpr
            | SyntaxKind::LiteralExpr
            | SyntaxKind::NameExpr => {
                self.build_expr(node, expr_tree);
            }
            _ => {
                for child in &node.children {
                    self.build_statement(child, expr_tree);
                }
            }
        }
    }

    fn build_expr(&self, node: &SyntaxNode, expr_tree: &mut crate::shared::models::ExpressionTree) -> Option<ExprId> {
        match &node.kind {
            SyntaxKind::NameExpr => {
                let mut expr = Expression::new(0, ExprKind::NameLoad, node.span);
                if !node.text().is_empty() {
                    expr.symbol_id = Some(node.text().to_string());
                }
                Some(expr_tree.push(expr))
            }
            SyntaxKind::LiteralExpr => {
                let lit = parse_literal(node.text());
                Some(expr_tree.push(Expression::new(0, ExprKind::Literal(lit), node.span)))
            }
            SyntaxKind::BinaryExpr => {
                let op = parse_binop(node.text());
                let id = expr_tree.push(Expression::new(0, ExprKind::BinOp(op), node.span));
                let mut reads = Vec::new();
                for child in &node.children {
                    if let Some(operand_id) = self.build_expr(child, expr_tree) {
                        expr_tree.attach_child(id, operand_id);
                        reads.push(operand_id);
                    }
                }
                if let Some(expr) = expr_tree.get_mut(id) {
                    expr.reads = reads;
                }
                Some(id)
            }
            SyntaxKind::CallExpr => {
                let id = expr_tree.push(Expression::new(0, ExprKind::Call, node.span));
                let mut reads = Vec::new();
                for child in &node.children {
                    if let Some(operand_id) = self.build_expr(child, expr_tree) {
                        expr_tree.attach_child(id, operand_id);
                        reads.push(operand_id);
                    }
                }
                if let Some(expr) = expr_tree.get_mut(id) {
                    expr.reads = reads;
                }
                Some(id)
            }
            SyntaxKind::AssignmentStmt => {
                let id = expr_tree.push(Expression::new(0, ExprKind::Assign, node.span));
                let mut children_iter = node.children.iter();
                let target = children_iter.next();
                if let Some(target) = target {
                    if let SyntaxKind::NameExpr = target.kind {
                        if let Some(expr) = expr_tree.get_mut(id) {
                            expr.defines = Some(target.text().to_string());
                        }
                    }
                }
                let mut reads = Vec::new();
                for value in children_iter {
                    if let Some(value_id) = self.build_expr(value, expr_tree) {
                        expr_tree.attach_child(id, value_id);
                        reads.push(value_id);
                    }
                }
                if let Some(expr) = expr_tree.get_mut(id) {
                    expr.reads = reads;
                }
                Some(id)
            }
            _ => {
                // Not itself an expression kind (e.g. an UnaryExpr operand) —
                // build through to its first child so call/assign operands
                // aren't silently dropped.
                node.children.first().and_then(|c| self.build_expr(c, expr_tree))
            }
        }
    }
}

fn parse_binop(text: &str) -> BinOp {
    match text.trim() {
        "+" => BinOp::Add,
        "-" => BinOp::Sub,
        "*" => BinOp::Mul,
        "/" => BinOp::Div,
        "%" => BinOp::Mod,
        "&" => BinOp::BitAnd,
        "|" => BinOp::BitOr,
        "^" => BinOp::BitXor,
        "<<" => BinOp::LShift,
        ">>" => BinOp::RShift,
        "==" => BinOp::Eq,
        "!=" | "<>" => BinOp::NotEq,
        "<" => BinOp::Lt,
        "<=" => BinOp::LtE,
        ">" => BinOp::Gt,
        ">=" => BinOp::GtE,
        "&&" | "and" => BinOp::And,
        "||" | "or" => BinOp::Or,
        _ => BinOp::Add,
    }
}

fn parse_literal(text: &str) -> LiteralValue {
    let trimmed = text.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return LiteralValue::Int(i);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        return LiteralValue::Float(f);
    }
    match trimmed {
        "true" | "True" => LiteralValue::Bool(true),
        "false" | "False" => LiteralValue::Bool(false),
        "None" | "null" | "nil" | "undefined" => LiteralValue::None,
        _ => LiteralValue::Str(trimmed.trim_matches(['"', '\'']).to_string()),
    }
}

impl Default for ExpressionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{IRDocument, Node, NodeKind, Span};

    fn name(text: &str) -> SyntaxNode {
        SyntaxNode::new(SyntaxKind::NameExpr, Span::zero(), "identifier").with_text(text)
    }

    fn literal(text: &str) -> SyntaxNode {
        SyntaxNode::new(SyntaxKind::LiteralExpr, Span::zero(), "literal").with_text(text)
    }

    #[test]
    fn assignment_records_defines_and_reads() {
        let assign =
            SyntaxNode::new(SyntaxKind::AssignmentStmt, Span::zero(), "assignment")
                .with_children(vec![name("x"), literal("1")]);
        let func_span = Span::new(1, 0, 2, 0);
        let func = SyntaxNode::new(SyntaxKind::FunctionDef, func_span, "function_definition")
            .with_children(vec![name("f"), assign]);
        let root = SyntaxNode::new(SyntaxKind::Module, Span::zero(), "module")
            .with_children(vec![func]);

        let tree = ParsedTree::new(
            root,
            "def f(): x = 1".to_string(),
            "t.py".to_string(),
            crate::shared::ports::language::Language::Python,
            Vec::new(),
        );
        let mut doc = IRDocument::new("t.py", tree.language, "hash");
        let func_node = Node::new(NodeKind::Function, "f".into(), "f".into(), "t.py".into(), func_span);
        let func_id = doc.add_node(func_node);

        ExpressionBuilder::new().run(&tree, &mut doc);

        let expr_tree = doc.expression_trees.get(&func_id).unwrap();
        let assign_expr = expr_tree.iter().find(|e| matches!(e.kind, ExprKind::Assign)).unwrap();
        assert_eq!(assign_expr.defines.as_deref(), Some("x"));
        assert_eq!(assign_expr.reads.len(), 1);
    }

    #[test]
    fn binary_expression_links_both_operands() {
        let bin = SyntaxNode::new(SyntaxKind::BinaryExpr, Span::zero(), "binary_operator")
            .with_text("+")
            .with_children(vec![name("a"), name("b")]);
        let func_span = Span::new(1, 0, 2, 0);
        let func = SyntaxNode::new(SyntaxKind::FunctionDef, func_span, "function_definition")
            .with_children(vec![name("f"), bin]);
        let root = SyntaxNode::new(SyntaxKind::Module, Span::zero(), "module")
            .with_children(vec![func]);

        let tree = ParsedTree::new(
            root,
            "def f(): a + b".to_string(),
            "t.py".to_string(),
            crate::shared::ports::language::Language::Python,
            Vec::new(),
        );
        let mut doc = IRDocument::new("t.py", tree.language, "hash");
        let func_node = Node::new(NodeKind::Function, "f".into(), "f".into(), "t.py".into(), func_span);
        let func_id = doc.add_node(func_node);

        ExpressionBuilder::new().run(&tree, &mut doc);

        let expr_tree = doc.expression_trees.get(&func_id).unwrap();
        let bin_expr = expr_tree
            .iter()
            .find(|e| matches!(e.kind, ExprKind::BinOp(BinOp::Add)))
            .unwrap();
        assert_eq!(bin_expr.children.len(), 2);
        assert_eq!(bin_expr.reads.len(), 2);
    }

    #[test]
    fn literal_parsing_distinguishes_int_float_and_string() {
        assert_eq!(parse_literal("42"), LiteralValue::Int(42));
        assert_eq!(parse_literal("3.5"), LiteralValue::Float(3.5));
        assert_eq!(parse_literal("\"hi\""), LiteralValue::Str("hi".to_string()));
    }
}
