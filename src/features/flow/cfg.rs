//! `build_cfg` (§4.6): the pure basic-block construction algorithm C4's L5
//! adapter (`features::ir::cfg`) calls per function.

use crate::features::parsing::{SyntaxKind, SyntaxNode};
use crate::shared::models::{BasicBlock, CfgEdge, CfgEdgeKind, ControlFlowGraph};

pub fn build_cfg(function_id: &str, func_node: &SyntaxNode) -> ControlFlowGraph {
    let mut cfg = ControlFlowGraph::new(function_id.to_string());
    let mut counter = 0usize;
    let entry_id = fresh_block_id(function_id, &mut counter);
    let mut current = BasicBlock::new(entry_id, func_node.span);

    for stmt in &func_node.children {
        if matches!(stmt.kind, SyntaxKind::NameExpr) {
            // the definition's own name token, not a body statement
            continue;
        }
        emit_statement(stmt, &mut cfg, &mut current, function_id, &mut counter);
    }
    cfg.add_block(current);
    cfg
}

/// Appends `stmt` to `current`, splitting into new blocks at every
/// control-flow statement and wiring the branch/loop/fallthrough edges.
fn emit_statement(
    stmt: &SyntaxNode,
    cfg: &mut ControlFlowGraph,
    current: &mut BasicBlock,
    function_id: &str,
    counter: &mut usize,
) {
    if !stmt.kind.is_control_flow() {
        return;
    }

    let finished = std::mem::replace(current, BasicBlock::new(fresh_block_id(function_id, counter), stmt.span));
    let finished_id = finished.id.clone();
    cfg.add_block(finished);

    match &stmt.kind {
        SyntaxKind::IfStmt => {
            let then_id = fresh_block_id(function_id, counter);
            let else_id = fresh_block_id(function_id, counter);
            let join_id = fresh_block_id(function_id, counter);
            cfg.add_block(BasicBlock::new(then_id.clone(), stmt.span));
            cfg.add_block(BasicBlock::new(else_id.clone(), stmt.span));
            cfg.add_edge(CfgEdge::new(finished_id.clone(), then_id, CfgEdgeKind::TrueBranch));
            cfg.add_edge(CfgEdge::new(finished_id, else_id, CfgEdgeKind::FalseBranch));
            *current = BasicBlock::new(join_id, stmt.span);
        }
        SyntaxKind::ForStmt | SyntaxKind::WhileStmt => {
            let body_id = fresh_block_id(function_id, counter);
            let exit_id = fresh_block_id(function_id, counter);
            cfg.add_block(BasicBlock::new(body_id.clone(), stmt.span));
            cfg.add_edge(CfgEdge::new(finished_id.clone(), body_id.clone(), CfgEdgeKind::Sequential));
            cfg.add_edge(CfgEdge::new(body_id, finished_id.clone(), CfgEdgeKind::LoopBack));
            cfg.add_edge(CfgEdge::new(finished_id, exit_id.clone(), CfgEdgeKind::LoopExit));
            *current = BasicBlock::new(exit_id, stmt.span);
        }
        SyntaxKind::TryStmt => {
            let handler_id = fresh_block_id(function_id, counter);
            let after_id = fresh_block_id(function_id, counter);
            cfg.add_block(BasicBlock::new(handler_id.clone(), stmt.span));
            cfg.add_edge(CfgEdge::new(finished_id.clone(), handler_id, CfgEdgeKind::Exception));
            cfg.add_edge(CfgEdge::new(finished_id, after_id.clone(), CfgEdgeKind::Sequential));
            *current = BasicBlock::new(after_id, stmt.span);
        }
        _ => {
            let next_id = fresh_block_id(function_id, counter);
            cfg.add_block(BasicBlock::new(next_id.clone(), stmt.span));
            cfg.add_edge(CfgEdge::new(finished_id, next_id.clone(), CfgEdgeKind::Sequential));
            *current = BasicBlock::new(next_id, stmt.span);
        }
    }
}

fn fresh_block_id(function_id: &str, counter: &mut usize) -> String {
    let id = format!("{function_id}::b{counter}");
    *counter += 1;
    id
}
