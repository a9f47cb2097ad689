//! Layered IR Builder (C4, §4.4)
//!
//! Nine layers run in order over a single file's `ParsedTree`, each
//! writing into the same `IRDocument` arena. A later layer declares which
//! earlier layers it requires by simply reading their output; toggling a
//! later layer off never mutates what an earlier one already wrote.

pub mod builder;
pub mod cfg;
pub mod enrichment;
pub mod expression;
pub mod lexical;
pub mod occurrence;
pub mod sccp;
pub mod ssa;
pub mod summaries;
pub mod cross_file_stub;

pub use builder::{IrBuilder, LayerError, LayerOutcome};
