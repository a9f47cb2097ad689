//! Pipeline Orchestrator (C9, §4.9)
//!
//! Drives C1-C8 end to end over a repository. The strategy is fixed at
//! construction and never switched implicitly (§4.9): `Default` walks every
//! discovered file sequentially; `Incremental` narrows that set to a
//! `ChangeSet` plus whatever previously depended on a changed file;
//! `Parallel` fans per-file L1-L8 out across `rayon`'s pool before the
//! cross-file barrier; `Overlay` substitutes in-memory edits for on-disk
//! content and tags the resulting nodes; `Quick` stops after L1 and never
//! runs C5/C7 at all, since neither means anything for a single file in
//! isolation.

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use tracing::{info, warn};

use crate::config::cache_config::CACHE_SCHEMA_VERSION;
use crate::config::{LayerToggles, PipelineConfig, Strategy};
use crate::errors::Result;
use crate::features::cache::fingerprint::{content_hash, struct_hash};
use crate::features::cache::SemanticCache;
use crate::features::cross_file;
use crate::features::cross_file::DependencyGraph;
use crate::features::graph_builder;
use crate::features::ir::builder::{IrBuilder, LayerOutcome};
use crate::features::parsing::ParserFacade;
use crate::shared::models::{CacheEntry, CacheKey, ChangeSet, IRDocument};
use crate::shared::ports::language::Language;
use crate::shared::ports::type_service::{NullTypeService, TypeService};

use super::discovery::{apply_overlay, discover_files};
use super::result::{FileLayerError, PipelineResult};

/// One file's content, already read off disk or substituted from an
/// overlay map. `overlay` is `true` only for the latter.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub file_path: String,
    pub language: Language,
    pub bytes: Vec<u8>,
    pub overlay: bool,
}

struct FileOutcome {
    file_path: String,
    ir_document: IRDocument,
    error: Option<(&'static str, String)>,
}

pub struct PipelineOrchestrator<'a> {
    config: PipelineConfig,
    repo_id: String,
    snapshot_id: String,
    type_service: &'a dyn TypeService,
    cache: Option<&'a SemanticCache>,
}

impl<'a> PipelineOrchestrator<'a> {
    pub fn new(config: PipelineConfig, repo_id: impl Into<String>, snapshot_id: impl Into<String>) -> Self {
        Self {
            config,
            repo_id: repo_id.into(),
            snapshot_id: snapshot_id.into(),
            type_service: &NullTypeService,
            cache: None,
        }
    }

    pub fn with_type_service(mut self, type_service: &'a dyn TypeService) -> Self {
        self.type_service = type_service;
        self
    }

    /// Enables the §4.4 semantic-cache consultation: a file whose
    /// content+struct+config hash already has a completed L4+ bundle on
    /// record skips C4's builder entirely.
    pub fn with_cache(mut self, cache: &'a SemanticCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Walks `repo_path`, applies `overlay` (meaningful only under
    /// `Strategy::Overlay`), narrows to the incremental file set when
    /// configured that way, then runs `process`.
    ///
    /// `change_set` and `previous_dependencies` (a prior run's
    /// `GlobalContext::file_dependencies`) are required for
    /// `Strategy::Incremental` — the orchestrator keeps no state of its own
    /// between runs, so the caller supplies what changed and what used to
    /// depend on what.
    pub fn run(
        &self,
        repo_path: &str,
        change_set: Option<&ChangeSet>,
        previous_dependencies: Option<&HashMap<String, Vec<String>>>,
        overlay: Option<&HashMap<String, String>>,
    ) -> Result<PipelineResult> {
        info!(strategy = ?self.config.strategy, repo_path, "starting pipeline run");

        let mut files = discover_files(repo_path)?;
        if let Some(overlay) = overlay {
            apply_overlay(&mut files, overlay);
        }

        let files = if matches!(self.config.strategy, Strategy::Incremental) {
            narrow_to_incremental(files, change_set, previous_dependencies)
        } else {
            files
        };

        Ok(self.process(files))
    }

    /// Strategy-agnostic core, usable directly by callers that already have
    /// file contents in hand (tests, editors holding unsaved buffers).
    pub fn process(&self, files: Vec<SourceFile>) -> PipelineResult {
        let toggles = self.config.effective_layers();
        let config_hash = self.config.config_hash();

        let mut outcomes: Vec<FileOutcome> = if matches!(self.config.strategy, Strategy::Parallel) {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.worker_count.max(1))
                .build()
                .unwrap_or_else(|_| rayon::ThreadPoolBuilder::new().build().expect("default rayon pool"));
            pool.install(|| {
                files
                    .par_iter()
                    .map(|f| self.build_one(f, &toggles, &config_hash))
                    .collect()
            })
        } else {
            files.iter().map(|f| self.build_one(f, &toggles, &config_hash)).collect()
        };
        outcomes.sort_by(|a, b| a.file_path.cmp(&b.file_path));

        let layer_errors: Vec<FileLayerError> = outcomes
            .iter()
            .filter_map(|o| {
                o.error.as_ref().map(|(layer, message)| FileLayerError {
                    file_path: o.file_path.clone(),
                    layer,
                    message: message.clone(),
                })
            })
            .collect();
        for err in &layer_errors {
            warn!(file = %err.file_path, layer = err.layer, message = %err.message, "layer failed");
        }
        let mut ir_docs: Vec<IRDocument> = outcomes.into_iter().map(|o| o.ir_document).collect();

        if matches!(self.config.strategy, Strategy::Quick) {
            return PipelineResult {
                ir_docs,
                global_context: None,
                symbol_graph: None,
                layer_errors,
            };
        }

        let global_context = cross_file::resolve(&mut ir_docs);
        let symbol_graph = graph_builder::project(&ir_docs, &self.repo_id, &self.snapshot_id, None);

        PipelineResult {
            ir_docs,
            global_context: Some(global_context),
            symbol_graph: Some(symbol_graph),
            layer_errors,
        }
    }

    fn build_one(&self, file: &SourceFile, toggles: &LayerToggles, config_hash: &str) -> FileOutcome {
        let source = String::from_utf8_lossy(&file.bytes).into_owned();
        let facade = ParserFacade::new();
        let parsed = match facade.parse(&source, &file.file_path, file.language) {
            Ok(tree) => tree,
            Err(err) => {
                return FileOutcome {
                    file_path: file.file_path.clone(),
                    ir_document: IRDocument::new(file.file_path.clone(), file.language, String::new()),
                    error: Some(("L1", err.to_string())),
                };
            }
        };

        let content = content_hash(&file.bytes);
        let structure = struct_hash(&parsed.root.kind_sequence());
        // Caching only applies once a run actually produces an L4+ bundle
        // worth skipping (§4.4); Quick's L1-only toggles never consult it.
        let cache_key = (self.cache.is_some() && toggles.l4_expression_trees)
            .then(|| CacheKey::new(content.clone(), structure.clone(), config_hash.to_string()));

        if let (Some(cache), Some(key)) = (self.cache, cache_key.as_ref()) {
            if let Some(entry) = cache.get(key, 0) {
                if let Ok(mut doc) = serde_json::from_slice::<IRDocument>(&entry.payload) {
                    if file.overlay {
                        doc.mark_overlay();
                    }
                    return FileOutcome {
                        file_path: file.file_path.clone(),
                        ir_document: doc,
                        error: None,
                    };
                }
            }
        }

        let builder = IrBuilder::new(self.type_service);
        let (mut doc, outcome) = builder.build(&parsed, &content, toggles);

        if let (Some(cache), Some(key)) = (self.cache, cache_key) {
            if matches!(outcome, LayerOutcome::Completed) {
                if let Ok(payload) = serde_json::to_vec(&doc) {
                    cache.set(key.clone(), CacheEntry::new(key, payload, CACHE_SCHEMA_VERSION, 0));
                }
            }
        }

        if file.overlay {
            doc.mark_overlay();
        }

        let error = match outcome {
            LayerOutcome::PartialFailure(e) => Some((e.layer, e.message)),
            LayerOutcome::Completed => None,
        };

        FileOutcome {
            file_path: file.file_path.clone(),
            ir_document: doc,
            error,
        }
    }
}

/// A changed file plus every file whose recorded dependency set (from a
/// prior `GlobalContext`) includes a changed file, transitively — closing
/// over chains and import cycles via `DependencyGraph::widen` (§4.9, §E5)
/// rather than stopping at one hop.
fn narrow_to_incremental(
    files: Vec<SourceFile>,
    change_set: Option<&ChangeSet>,
    previous_dependencies: Option<&HashMap<String, Vec<String>>>,
) -> Vec<SourceFile> {
    let Some(change_set) = change_set else {
        return files;
    };
    let changed = change_set.all_changed();

    let to_build = match previous_dependencies {
        Some(deps) => DependencyGraph::build(deps).widen(&changed),
        None => changed,
    };

    files.into_iter().filter(|f| to_build.contains(&f.file_path)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheConfig;
    use crate::shared::ports::storage::InMemoryStorage;

    fn source(path: &str, text: &str) -> SourceFile {
        SourceFile {
            file_path: path.to_string(),
            language: Language::Python,
            bytes: text.as_bytes().to_vec(),
            overlay: false,
        }
    }

    #[test]
    fn default_strategy_resolves_cross_file_imports() {
        let config = PipelineConfig::default();
        let orchestrator = PipelineOrchestrator::new(config, "repo-1", "snap-1");

        let files = vec![
            source("a.py", "import b\n"),
            source("b.py", "x = 1\n"),
        ];
        let result = orchestrator.process(files);

        assert_eq!(result.files_processed(), 2);
        assert!(result.global_context.is_some());
        assert!(result.symbol_graph.is_some());
    }

    #[test]
    fn quick_strategy_skips_cross_file_resolution() {
        let config = PipelineConfig {
            strategy: Strategy::Quick,
            ..PipelineConfig::default()
        };
        let orchestrator = PipelineOrchestrator::new(config, "repo-1", "snap-1");

        let result = orchestrator.process(vec![source("a.py", "x = 1\n")]);

        assert!(result.global_context.is_none());
        assert!(result.symbol_graph.is_none());
    }

    #[test]
    fn parallel_strategy_produces_same_file_count_as_default() {
        let config = PipelineConfig {
            strategy: Strategy::Parallel,
            ..PipelineConfig::default()
        };
        let orchestrator = PipelineOrchestrator::new(config, "repo-1", "snap-1");

        let files = (0..5).map(|i| source(&format!("f{i}.py"), "x = 1\n")).collect();
        let result = orchestrator.process(files);

        assert_eq!(result.files_processed(), 5);
    }

    #[test]
    fn incremental_strategy_includes_dependents_of_changed_files() {
        let files = vec![
            source("a.py", "import b\n"),
            source("b.py", "x = 1\n"),
            source("c.py", "y = 2\n"),
        ];
        let mut change_set = ChangeSet::new();
        change_set.mark_modified("b.py");

        let mut deps = HashMap::new();
        deps.insert("a.py".to_string(), vec!["b.py".to_string()]);
        deps.insert("c.py".to_string(), vec![]);

        let narrowed = narrow_to_incremental(files, Some(&change_set), Some(&deps));
        let paths: HashSet<String> = narrowed.into_iter().map(|f| f.file_path).collect();

        assert!(paths.contains("b.py"));
        assert!(paths.contains("a.py"));
        assert!(!paths.contains("c.py"));
    }

    #[test]
    fn overlay_file_is_tagged_on_every_node() {
        let config = PipelineConfig::default();
        let orchestrator = PipelineOrchestrator::new(config, "repo-1", "snap-1");

        let file = SourceFile {
            file_path: "a.py".to_string(),
            language: Language::Python,
            bytes: b"x = 1\n".to_vec(),
            overlay: true,
        };
        let result = orchestrator.process(vec![file]);

        let doc = result.find_document("a.py").unwrap();
        assert!(doc.nodes().all(|n| n.attrs.get("overlay") == Some(&crate::shared::models::AttrValue::Bool(true))));
    }

    #[test]
    fn cache_hit_is_reused_instead_of_rebuilding() {
        let cache_config = CacheConfig::default();
        let cache = SemanticCache::new(&cache_config, Box::new(InMemoryStorage::default()));
        let config = PipelineConfig::default();
        let orchestrator = PipelineOrchestrator::new(config, "repo-1", "snap-1").with_cache(&cache);

        let files = vec![source("a.py", "x = 1\n")];
        let first = orchestrator.process(files.clone());
        assert_eq!(cache.stats().hits, 0);

        let second = orchestrator.process(files);
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(
            first.find_document("a.py").unwrap().node_count(),
            second.find_document("a.py").unwrap().node_count()
        );
    }
}
