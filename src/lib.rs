/*
 * Codegraph IR - deterministic, incremental, multi-layer program analysis
 * core.
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Common models (Node, Edge, Span, IRDocument, ...)
 * - features/    : Vertical slices, one per component (C1-C8)
 * - pipeline/    : C9 orchestration, tying every feature together
 * - config/      : Pipeline/cache/taint/layer configuration shapes
 */

#![allow(clippy::too_many_arguments)]

/// Shared models and utilities (§3 Data Model).
pub mod shared;

/// Feature modules — one per pipeline component (C1-C8).
pub mod features;

/// Pipeline orchestration (C9).
pub mod pipeline;

/// Configuration system.
pub mod config;

/// Crate-wide error type.
pub mod errors;

pub use errors::{CodegraphError, Result};
pub use pipeline::{PipelineOrchestrator, PipelineResult, SourceFile};
