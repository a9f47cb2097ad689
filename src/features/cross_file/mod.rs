//! Cross-File Resolver (C5, §4.5)
//!
//! Runs once every file's `IRDocument` has finished L1-L9: builds a global
//! symbol table across the whole file set, then rewrites each file's
//! unresolved `Imports` edges onto the module they actually name, or marks
//! them external when they don't resolve to a local file.

mod module_path;

pub mod dep_graph;
pub mod impact;

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::info;

use crate::shared::models::{AttrValue, EdgeKind, IRDocument, Node, NodeKind};
use crate::shared::ports::language::Language;

use module_path::{extract_module_path, resolve_module_path};

pub use dep_graph::DependencyGraph;
pub use impact::{blast_radius, ImpactAnalysis, RiskLevel};

/// Output of one resolver pass (§3). Borrows nothing past its own
/// construction — every field is an owned copy out of the `IRDocument`s it
/// was built from.
#[derive(Debug, Default)]
pub struct GlobalContext {
    pub symbol_table: HashMap<String, Node>,
    pub file_dependencies: HashMap<String, Vec<String>>,
    /// Keyed by the resolved import's node id, since an `Import` node and
    /// its unresolved `Imports` edge are always 1:1.
    pub resolved_imports: HashMap<String, Node>,
}

/// One import's resolution, computed before any document is mutated so the
/// lookup pass never races with the rewrite pass.
struct Plan {
    doc_idx: usize,
    file_id: String,
    import_id: String,
    resolution: Option<(String, Node)>,
}

/// `resolve(ir_docs) → GlobalContext` (§4.5). Scans every document's nodes
/// into the symbol table, then resolves each document's import edges
/// against that file set.
pub fn resolve(ir_docs: &mut [IRDocument]) -> GlobalContext {
    let symbol_table = build_symbol_table(ir_docs);
    let known_files: HashSet<String> = ir_docs.iter().map(|d| d.file_path.clone()).collect();

    let mut plans = Vec::new();
    for (doc_idx, doc) in ir_docs.iter().enumerate() {
        let language = doc.language;
        for import_node in doc.nodes().filter(|n| n.kind == NodeKind::Import) {
            let file_id = import_node.parent_id.clone().unwrap_or_default();
            let resolution = extract_module_path(language, &import_node.name)
                .and_then(|module_path| {
                    resolve_module_path(language, &module_path, &doc.file_path, &known_files)
                })
                .and_then(|target_file| find_module_node(ir_docs, &target_file).map(|n| (target_file, n)));
            plans.push(Plan {
                doc_idx,
                file_id,
                import_id: import_node.id.clone(),
                resolution,
            });
        }
    }

    let total_imports = plans.len();
    let mut resolved_imports = HashMap::new();
    let mut file_dependencies: HashMap<String, BTreeSet<String>> = HashMap::new();
    for doc in ir_docs.iter() {
        file_dependencies.entry(doc.file_path.clone()).or_default();
    }

    for plan in plans {
        let file_path = ir_docs[plan.doc_idx].file_path.clone();
        match plan.resolution {
            Some((target_file, module_node)) => {
                ir_docs[plan.doc_idx].rewrite_edge_target(
                    &plan.file_id,
                    &plan.import_id,
                    EdgeKind::Imports,
                    module_node.id.clone(),
                );
                file_dependencies.entry(file_path).or_default().insert(target_file);
                resolved_imports.insert(plan.import_id, module_node);
            }
            None => {
                if let Some(node) = ir_docs[plan.doc_idx].get_node_mut(&plan.import_id) {
                    node.attrs.insert("is_external".to_string(), AttrValue::Bool(true));
                }
            }
        }
    }

    info!(
        files = ir_docs.len(),
        total_imports,
        resolved = resolved_imports.len(),
        external = total_imports - resolved_imports.len(),
        "cross-file resolution complete"
    );

    GlobalContext {
        symbol_table,
        file_dependencies: file_dependencies
            .into_iter()
            .map(|(file, deps)| (file, deps.into_iter().collect()))
            .collect(),
        resolved_imports,
    }
}

/// Every non-`Import` node, keyed by fqn. A colliding fqn keeps whichever
/// node's file_path sorts first — the lexicographic tie-break (§4.5).
fn build_symbol_table(ir_docs: &[IRDocument]) -> HashMap<String, Node> {
    let mut table: HashMap<String, Node> = HashMap::new();
    for doc in ir_docs {
        for node in doc.nodes() {
            if node.kind == NodeKind::Import {
                continue;
            }
            match table.get(&node.fqn) {
                Some(existing) if existing.file_path <= node.file_path => {}
                _ => {
                    table.insert(node.fqn.clone(), node.clone());
                }
            }
        }
    }
    table
}

fn find_module_node(ir_docs: &[IRDocument], target_file: &str) -> Option<Node> {
    ir_docs
        .iter()
        .find(|d| d.file_path == target_file)
        .and_then(|d| d.nodes().find(|n| n.kind == NodeKind::Module).cloned())
}

#[allow(dead_code)]
fn is_closed_set_language(language: Language) -> bool {
    matches!(
        language,
        Language::Python | Language::Java | Language::TypeScript | Language::JavaScript
    )
}
