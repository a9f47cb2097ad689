//! L8 Semantic Summaries (§4.4)
//!
//! Per-function complexity/size/side-effect summary, attached directly to
//! the function's `Node::control_flow_summary`. Depends only on L5 (the
//! CFG gives complexity and LOC; the expression tree, if present, sharpens
//! the side-effect flag, but a CFG alone is enough to produce a summary).

use crate::shared::models::{ControlFlowSummary, ExprKind, IRDocument, NodeKind};

pub struct SummaryBuilder;

impl SummaryBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn run(&self, doc: &mut IRDocument) {
        let function_ids: Vec<String> = doc
            .nodes()
            .filter(|n| matches!(n.kind, NodeKind::Function | NodeKind::Method))
            .map(|n| n.id.clone())
            .collect();

        for function_id in function_ids {
            let Some(cfg) = doc.cfgs.get(&function_id) else { continue };
            // 1 + one decision point per branch (the builder always emits a
            // TrueBranch/FalseBranch pair together, so counting TrueBranch
            // alone avoids double-counting) + one per loop back-edge — the
            // same simplified convention ("1 + decision nodes") this
            // codebase already uses elsewhere for CFGs without a full
            // basic-block graph.
            let branch_points = cfg
                .edges
                .iter()
                .filter(|e| matches!(e.kind, crate::shared::models::CfgEdgeKind::TrueBranch))
                .count();
            let loop_points = cfg
                .edges
                .iter()
                .filter(|e| matches!(e.kind, crate::shared::models::CfgEdgeKind::LoopBack))
                .count();
            let cyclomatic_complexity = 1 + (branch_points + loop_points) as u32;

            let Some(node) = doc.get_node(&function_id) else { continue };
            let loc = node.span.line_count();
            let has_side_effects = doc
                .expression_trees
                .get(&function_id)
                .map(|tree| tree.iter().any(|e| matches!(e.kind, ExprKind::Call)))
                .unwrap_or(false);

            let summary = ControlFlowSummary {
                cyclomatic_complexity,
                loc,
                has_side_effects,
            };

            if let Some(node) = doc.get_node_mut(&function_id) {
                node.control_flow_summary = Some(summary);
            }
        }
    }
}

impl Default for SummaryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{BasicBlock, CfgEdge, CfgEdgeKind, ControlFlowGraph, Node, Span};

    #[test]
    fn straight_line_function_has_complexity_one() {
        let mut doc = IRDocument::new("t.py", crate::shared::ports::language::Language::Python, "hash");
        let func = Node::new(NodeKind::Function, "f".into(), "f".into(), "t.py".into(), Span::new(1, 0, 3, 0));
        let func_id = doc.add_node(func);

        let mut cfg = ControlFlowGraph::new(func_id.clone());
        cfg.add_block(BasicBlock::new("b0", Span::zero()));
        doc.cfgs.insert(func_id.clone(), cfg);

        SummaryBuilder::new().run(&mut doc);

        let summary = doc.get_node(&func_id).unwrap().control_flow_summary.unwrap();
        assert_eq!(summary.cyclomatic_complexity, 1);
        assert_eq!(summary.loc, 3);
    }

    #[test]
    fn branching_function_has_higher_complexity() {
        let mut doc = IRDocument::new("t.py", crate::shared::ports::language::Language::Python, "hash");
        let func = Node::new(NodeKind::Function, "f".into(), "f".into(), "t.py".into(), Span::new(1, 0, 4, 0));
        let func_id = doc.add_node(func);

        let mut cfg = ControlFlowGraph::new(func_id.clone());
        cfg.add_block(BasicBlock::new("entry", Span::zero()));
        cfg.add_block(BasicBlock::new("then", Span::zero()));
        cfg.add_block(BasicBlock::new("else", Span::zero()));
        cfg.add_edge(CfgEdge::new("entry", "then", CfgEdgeKind::TrueBranch));
        cfg.add_edge(CfgEdge::new("entry", "else", CfgEdgeKind::FalseBranch));
        doc.cfgs.insert(func_id.clone(), cfg);

        SummaryBuilder::new().run(&mut doc);

        let summary = doc.get_node(&func_id).unwrap().control_flow_summary.unwrap();
        assert!(summary.cyclomatic_complexity > 1);
    }
}
