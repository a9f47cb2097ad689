//! Pipeline Orchestrator (C9, §4.9)
//!
//! The only component that calls every other one: walks a repository (or
//! takes file contents directly), drives each file through C3/C4, then runs
//! C5 and C7 once across the whole batch. Which of the five strategies in
//! `config::Strategy` it runs is fixed at construction.

pub mod discovery;
pub mod orchestrator;
pub mod result;

pub use orchestrator::{PipelineOrchestrator, SourceFile};
pub use result::{FileLayerError, PipelineResult};
