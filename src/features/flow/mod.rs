//! SSA / CFG / DFG Engine (C6, §4.6)
//!
//! Pure functions over one function's syntax/CFG/expression tree at a
//! time: `build_cfg`, `build_ssa` (which also produces the DFG edges), and
//! `propagate_constants`. Every call owns its input and output graphs —
//! there is no shared mutable state, so these are safe to call from any
//! number of threads concurrently. C4's L5-L7 layer adapters
//! (`features::ir::{cfg,ssa,sccp}`) are the only callers; they own the
//! per-file bookkeeping of which function's graph goes where.

pub mod cfg;
pub mod dominance;
pub mod sccp;
pub mod ssa;

pub use cfg::build_cfg;
pub use dominance::Dominance;
pub use sccp::propagate_constants;
pub use ssa::{build_ssa, SsaResult};
