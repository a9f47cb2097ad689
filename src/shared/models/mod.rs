//! Shared models — the data model (§3)

pub mod cache_entry;
pub mod cfg;
pub mod change_set;
pub mod constant;
pub mod edge;
pub mod expression;
pub mod ir_document;
pub mod node;
pub mod occurrence;
pub mod span;
pub mod taint;

pub use cache_entry::{CacheEntry, CacheKey};
pub use cfg::{BasicBlock, CfgEdge, CfgEdgeKind, ControlFlowGraph};
pub use change_set::ChangeSet;
pub use constant::{ConstLiteral, ConstantValue};
pub use edge::{Edge, EdgeKind};
pub use expression::{BinOp, ExprId, ExprKind, Expression, ExpressionTree, LiteralValue, SymbolId, VarId};
pub use ir_document::IRDocument;
pub use node::{AttrMap, AttrValue, ControlFlowSummary, Node, NodeBuilder, NodeKind};
pub use occurrence::{Occurrence, OccurrenceIndex, ReferenceKind};
pub use span::{Location, Span};
pub use taint::{AtomKind, MatchRule, MatchRuleError, Severity, TaintAtom, TaintPath};
