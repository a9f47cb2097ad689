//! Control flow graph (§3, L5 CFG)

use serde::{Deserialize, Serialize};

use super::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CfgEdgeKind {
    Sequential,
    TrueBranch,
    FalseBranch,
    LoopBack,
    LoopExit,
    Exception,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CfgEdge {
    pub source_block_id: String,
    pub target_block_id: String,
    pub kind: CfgEdgeKind,
}

impl CfgEdge {
    pub fn new(source_block_id: impl Into<String>, target_block_id: impl Into<String>, kind: CfgEdgeKind) -> Self {
        Self {
            source_block_id: source_block_id.into(),
            target_block_id: target_block_id.into(),
            kind,
        }
    }
}

/// One straight-line sequence of expression statements with no internal
/// branch. `statement_expr_ids` indexes into the function's `ExpressionTree`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BasicBlock {
    pub id: String,
    pub span: Span,
    pub statement_expr_ids: Vec<usize>,
    pub predecessors: Vec<String>,
    pub successors: Vec<String>,
}

impl BasicBlock {
    pub fn new(id: impl Into<String>, span: Span) -> Self {
        Self {
            id: id.into(),
            span,
            statement_expr_ids: Vec::new(),
            predecessors: Vec::new(),
            successors: Vec::new(),
        }
    }
}

/// Per-function control flow graph, one entry and a closed set of blocks.
/// `block_order` records insertion order (the reverse postorder a fresh
/// builder produces), which CHK dominance computation in L6 depends on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ControlFlowGraph {
    pub function_id: String,
    pub entry_block_id: String,
    pub blocks: Vec<BasicBlock>,
    pub edges: Vec<CfgEdge>,
}

impl ControlFlowGraph {
    pub fn new(function_id: impl Into<String>) -> Self {
        Self {
            function_id: function_id.into(),
            entry_block_id: String::new(),
            blocks: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn block(&self, id: &str) -> Option<&BasicBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn block_mut(&mut self, id: &str) -> Option<&mut BasicBlock> {
        self.blocks.iter_mut().find(|b| b.id == id)
    }

    pub fn add_block(&mut self, block: BasicBlock) {
        if self.blocks.is_empty() {
            self.entry_block_id = block.id.clone();
        }
        self.blocks.push(block);
    }

    pub fn add_edge(&mut self, edge: CfgEdge) {
        if let Some(source) = self.block_mut(&edge.source_block_id) {
            source.successors.push(edge.target_block_id.clone());
        }
        if let Some(target) = self.block_mut(&edge.target_block_id) {
            target.predecessors.push(edge.source_block_id.clone());
        }
        self.edges.push(edge);
    }

    pub fn block_ids_in_order(&self) -> Vec<&str> {
        self.blocks.iter().map(|b| b.id.as_str()).collect()
    }
}
