//! `propagate_constants` (§4.6): sparse conditional constant propagation
//! over one function's expression tree, using the `ConstantValue` lattice
//! (§3). C4's L7 adapter (`features::ir::sccp`) calls this per function and
//! owns only the per-file bookkeeping of which tree is which.

use std::collections::HashMap;

use crate::shared::models::{BinOp, ConstLiteral, ConstantValue, ExprId, ExprKind, ExpressionTree};

/// Runs the fixpoint to convergence, stashing each expression's folded value
/// in its `attrs["constant_value"]`, and returns the final per-variable
/// lattice state.
pub fn propagate_constants(expr_tree: &mut ExpressionTree) -> HashMap<String, ConstantValue> {
    let mut var_values: HashMap<String, ConstantValue> = HashMap::new();
    let len = expr_tree.len();

    let mut changed = true;
    while changed {
        changed = false;
        for id in 0..len {
            if step(expr_tree, id, &mut var_values) {
                changed = true;
            }
        }
    }

    var_values
}

/// Evaluates one expression given the current lattice state. Returns
/// whether anything changed, so the fixpoint loop knows to keep iterating.
fn step(expr_tree: &mut ExpressionTree, id: ExprId, var_values: &mut HashMap<String, ConstantValue>) -> bool {
    let Some(expr) = expr_tree.get(id) else { return false };
    let kind = expr.kind.clone();
    let reads = expr.reads.clone();
    let defines = expr.defines.clone();
    let symbol_id = expr.symbol_id.clone();

    let new_value = match &kind {
        ExprKind::Literal(lit) => Some(ConstantValue::constant(ConstLiteral::from_literal(lit))),
        ExprKind::NameLoad => symbol_id.and_then(|s| var_values.get(&s).cloned()),
        ExprKind::BinOp(op) => {
            if reads.len() != 2 {
                Some(ConstantValue::Bottom)
            } else {
                let lhs = constant_value_of(expr_tree, reads[0]);
                let rhs = constant_value_of(expr_tree, reads[1]);
                Some(fold_binop(*op, &lhs, &rhs))
            }
        }
        ExprKind::Call => Some(ConstantValue::Bottom),
        ExprKind::Assign => reads.first().and_then(|&r| constant_value_attr(expr_tree, r)),
    };

    let mut changed = false;
    if let Some(value) = new_value.clone() {
        if let Some(expr) = expr_tree.get_mut(id) {
            let serialized = serde_json::to_value(&value).unwrap_or(serde_json::Value::Null);
            if expr.attrs.get("constant_value") != Some(&serialized) {
                expr.attrs.insert("constant_value".to_string(), serialized);
                changed = true;
            }
        }
    }

    if let (ExprKind::Assign, Some(var), Some(value)) = (&kind, &defines, &new_value) {
        let merged = match var_values.get(var) {
            Some(existing) => existing.meet(value),
            None => value.clone(),
        };
        if var_values.get(var) != Some(&merged) {
            var_values.insert(var.clone(), merged);
            changed = true;
        }
    }

    changed
}

pub fn constant_value_attr(expr_tree: &ExpressionTree, id: ExprId) -> Option<ConstantValue> {
    expr_tree
        .get(id)
        .and_then(|e| e.attrs.get("constant_value"))
        .and_then(|v| serde_json::from_value(v.clone()).ok())
}

fn constant_value_of(expr_tree: &ExpressionTree, id: ExprId) -> ConstantValue {
    constant_value_attr(expr_tree, id).unwrap_or(ConstantValue::Top)
}

fn fold_binop(op: BinOp, lhs: &ConstantValue, rhs: &ConstantValue) -> ConstantValue {
    let (ConstantValue::Const(a), ConstantValue::Const(b)) = (lhs, rhs) else {
        if matches!(lhs, ConstantValue::Bottom) || matches!(rhs, ConstantValue::Bottom) {
            return ConstantValue::Bottom;
        }
        return ConstantValue::Top;
    };

    match (a.as_i64(), b.as_i64()) {
        (Some(x), Some(y)) => match op {
            BinOp::Add => ConstantValue::constant(ConstLiteral::Int(x.wrapping_add(y))),
            BinOp::Sub => ConstantValue::constant(ConstLiteral::Int(x.wrapping_sub(y))),
            BinOp::Mul => ConstantValue::constant(ConstLiteral::Int(x.wrapping_mul(y))),
            BinOp::Div if y != 0 => ConstantValue::constant(ConstLiteral::Int(x / y)),
            BinOp::Mod if y != 0 => ConstantValue::constant(ConstLiteral::Int(x % y)),
            BinOp::Eq => ConstantValue::constant(ConstLiteral::Bool(x == y)),
            BinOp::NotEq => ConstantValue::constant(ConstLiteral::Bool(x != y)),
            BinOp::Lt => ConstantValue::constant(ConstLiteral::Bool(x < y)),
            BinOp::LtE => ConstantValue::constant(ConstLiteral::Bool(x <= y)),
            BinOp::Gt => ConstantValue::constant(ConstLiteral::Bool(x > y)),
            BinOp::GtE => ConstantValue::constant(ConstLiteral::Bool(x >= y)),
            // division/modulo by zero and any other combination falls to
            // Bottom rather than panicking the analysis
            _ => ConstantValue::Bottom,
        },
        _ => ConstantValue::Bottom,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{Expression, LiteralValue, Span};

    #[test]
    fn folds_a_constant_binary_addition() {
        let mut tree = ExpressionTree::new();
        let lhs = tree.push(Expression::new(0, ExprKind::Literal(LiteralValue::Int(2)), Span::zero()));
        let rhs = tree.push(Expression::new(0, ExprKind::Literal(LiteralValue::Int(3)), Span::zero()));
        let mut bin = Expression::new(0, ExprKind::BinOp(BinOp::Add), Span::zero());
        bin.reads = vec![lhs, rhs];
        let bin_id = tree.push(bin);

        propagate_constants(&mut tree);

        let value: ConstantValue = constant_value_attr(&tree, bin_id).unwrap();
        assert_eq!(value, ConstantValue::constant(ConstLiteral::Int(5)));
    }

    #[test]
    fn division_by_zero_folds_to_bottom() {
        let mut tree = ExpressionTree::new();
        let lhs = tree.push(Expression::new(0, ExprKind::Literal(LiteralValue::Int(1)), Span::zero()));
        let rhs = tree.push(Expression::new(0, ExprKind::Literal(LiteralValue::Int(0)), Span::zero()));
        let mut bin = Expression::new(0, ExprKind::BinOp(BinOp::Div), Span::zero());
        bin.reads = vec![lhs, rhs];
        let bin_id = tree.push(bin);

        propagate_constants(&mut tree);

        let value: ConstantValue = constant_value_attr(&tree, bin_id).unwrap();
        assert_eq!(value, ConstantValue::Bottom);
    }

    #[test]
    fn name_load_of_an_unknown_variable_has_no_folded_value() {
        let mut tree = ExpressionTree::new();
        let mut load = Expression::new(0, ExprKind::NameLoad, Span::zero());
        load.symbol_id = Some("unbound".to_string());
        let id = tree.push(load);

        propagate_constants(&mut tree);

        assert!(constant_value_attr(&tree, id).is_none());
    }

    #[test]
    fn assignment_propagates_its_constant_to_later_reads_of_the_same_variable() {
        let mut tree = ExpressionTree::new();
        let lit = tree.push(Expression::new(0, ExprKind::Literal(LiteralValue::Int(7)), Span::zero()));
        let mut assign = Expression::new(0, ExprKind::Assign, Span::zero());
        assign.defines = Some("x".to_string());
        assign.reads = vec![lit];
        tree.push(assign);

        let mut read = Expression::new(0, ExprKind::NameLoad, Span::zero());
        read.symbol_id = Some("x".to_string());
        let read_id = tree.push(read);

        let final_state = propagate_constants(&mut tree);

        let value: ConstantValue = constant_value_attr(&tree, read_id).unwrap();
        assert_eq!(value, ConstantValue::constant(ConstLiteral::Int(7)));
        assert_eq!(final_state.get("x"), Some(&ConstantValue::constant(ConstLiteral::Int(7))));
    }
}
