//! L5 Control Flow Graph (§4.4)
//!
//! Walks the AST to find each function/method, matches it back to the
//! `Node` L1 already created, and delegates the actual block construction
//! to the C6 engine's `build_cfg` (§4.6) — this adapter owns only the
//! per-file bookkeeping (which function is which, where the result goes).

use crate::features::flow::cfg::build_cfg;
use crate::features::parsing::{ParsedTree, SyntaxKind, SyntaxNode};
use crate::shared::models::{IRDocument, NodeKind};

pub struct CfgBuilder;

impl CfgBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn run(&self, tree: &ParsedTree, doc: &mut IRDocument) {
        self.walk(&tree.root, doc);
    }

    fn walk(&self, node: &SyntaxNode, doc: &mut IRDocument) {
        if matches!(node.kind, SyntaxKind::FunctionDef | SyntaxKind::MethodDef) {
            if let Some(function_id) = self.matching_function_id(node, doc) {
                doc.cfgs.insert(function_id.clone(), build_cfg(&function_id, node));
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
}

impl Default for CfgBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{Node, NodeKind as SharedNodeKind, Span};

    #[test]
    fn builds_and_attaches_a_cfg_per_function() {
        let func_span = Span::new(1, 0, 3, 0);
        let func = SyntaxNode::new(SyntaxKind::FunctionDef, func_span, "function_definition")
            .with_children(vec![
                SyntaxNode::new(SyntaxKind::NameExpr, Span::zero(), "identifier").with_text("f"),
                SyntaxNode::new(SyntaxKind::AssignmentStmt, Span::zero(), "assignment"),
            ]);
        let root = SyntaxNode::new(SyntaxKind::Module, Span::zero(), "module").with_children(vec![func]);
        let tree = ParsedTree::new(
            root,
            "def f(): x = 1".to_string(),
            "t.py".to_string(),
            crate::shared::ports::language::Language::Python,
            Vec::new(),
        );
        let mut doc = IRDocument::new("t.py", tree.language, "hash");
        let func_node = Node::new(SharedNodeKind::Function, "f".into(), "f".into(), "t.py".into(), func_span);
        let func_id = doc.add_node(func_node);

        CfgBuilder::new().run(&tree, &mut doc);

        assert!(doc.cfgs.contains_key(&func_id));
    }
}
