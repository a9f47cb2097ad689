//! L7 Constant Propagation (§4.4)
//!
//! Delegates the actual fixpoint to the C6 engine's `propagate_constants`
//! (§4.6) for each function's expression tree. This adapter owns only the
//! per-file bookkeeping of which tree belongs to which function.

use crate::features::flow::sccp::propagate_constants;
use crate::shared::models::IRDocument;

pub struct SccpAnalyzer;

impl SccpAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn run(&self, doc: &mut IRDocument) {
        let function_ids: Vec<String> = doc.expression_trees.keys().cloned().collect();
        for function_id in function_ids {
            if let Some(expr_tree) = doc.expression_trees.get_mut(&function_id) {
                propagate_constants(expr_tree);
            }
        }
    }
}

impl Default for SccpAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::flow::sccp::constant_value_attr;
    use crate::shared::models::{BinOp, ConstLiteral, ConstantValue, Expression, ExprKind, LiteralValue, Span};

    #[test]
    fn runs_propagation_for_every_function_in_the_document() {
        let mut doc = IRDocument::new("t.py", crate::shared::ports::language::Language::Python, "hash");
        let mut tree = crate::shared::models::ExpressionTree::new();
        let lhs = tree.push(Expression::new(0, ExprKind::Literal(LiteralValue::Int(2)), Span::zero()));
        let rhs = tree.push(Expression::new(0, ExprKind::Literal(LiteralValue::Int(3)), Span::zero()));
        let mut bin = Expression::new(0, ExprKind::BinOp(BinOp::Add), Span::zero());
        bin.reads = vec![lhs, rhs];
        let bin_id = tree.push(bin);
        doc.expression_trees.insert("f".to_string(), tree);

        SccpAnalyzer::new().run(&mut doc);

        let tree = doc.expression_trees.get("f").unwrap();
        let value: ConstantValue = constant_value_attr(tree, bin_id).unwrap();
        assert_eq!(value, ConstantValue::constant(ConstLiteral::Int(5)));
    }
}
