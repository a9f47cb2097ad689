//! Feature modules — one per pipeline component (C1-C8); C9 lives in
//! `crate::pipeline`.

pub mod cache;
pub mod change_detection;
pub mod cross_file;
pub mod flow;
pub mod graph_builder;
pub mod ir;
pub mod parsing;
pub mod taint_analysis;
