//! Orchestrator run output (§4.9, consumed by §8 end-to-end scenarios)

use crate::features::cross_file::GlobalContext;
use crate::features::graph_builder::SymbolGraph;
use crate::shared::models::IRDocument;

/// Per-file build failure, keyed by file path. A `LayerError` from C4
/// flattened to a string, since the orchestrator's callers care about
/// "which file, which layer, what message" rather than the structured type.
#[derive(Debug, Clone)]
pub struct FileLayerError {
    pub file_path: String,
    pub layer: &'static str,
    pub message: String,
}

/// Everything one `PipelineOrchestrator::run` produced. `global_context`
/// and `symbol_graph` are `None` under `Strategy::Quick`, which stops after
/// L1 and never runs C5/C7 (§4.9).
#[derive(Debug, Default)]
pub struct PipelineResult {
    pub ir_docs: Vec<IRDocument>,
    pub global_context: Option<GlobalContext>,
    pub symbol_graph: Option<SymbolGraph>,
    pub layer_errors: Vec<FileLayerError>,
}

impl PipelineResult {
    pub fn files_processed(&self) -> usize {
        self.ir_docs.len()
    }

    pub fn find_document(&self, file_path: &str) -> Option<&IRDocument> {
        self.ir_docs.iter().find(|d| d.file_path == file_path)
    }
}
