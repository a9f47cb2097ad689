//! Symbol Graph Projector (C7, §4.7)
//!
//! Lowers every file's `IRDocument` into a compact, read-only symbol graph:
//! one `Symbol` per non-import node plus ranking signals aggregated from
//! edges, and one `Relation` per edge. Nothing here mutates the documents it
//! reads — this is a pure projection, run once cross-file resolution (C5)
//! has already rewritten import edges onto their real targets.

use std::collections::HashMap;

use crate::shared::models::{EdgeKind, IRDocument, NodeKind, Span};

/// A projected node, enriched with the ranking signals downstream indexing
/// consumers (search, hover) want without re-walking the full IR.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub id: String,
    pub kind: NodeKind,
    pub fqn: String,
    pub name: String,
    pub repo_id: String,
    pub snapshot_id: String,
    pub parent_id: Option<String>,
    pub span: Span,
    pub call_count: u32,
    pub import_count: u32,
    pub reference_count: u32,
    pub is_public: bool,
    pub is_exported: bool,
}

/// A projected edge.
#[derive(Debug, Clone)]
pub struct Relation {
    pub id: String,
    pub kind: EdgeKind,
    pub source_id: String,
    pub target_id: String,
}

#[derive(Debug, Default)]
pub struct SymbolGraph {
    pub symbols: Vec<Symbol>,
    pub relations: Vec<Relation>,
}

/// Projects every document in `ir_docs` into one `SymbolGraph`.
///
/// `module_exports`, when given, maps a file path to the names it exports
/// explicitly; absent entries fall back to the conservative top-level
/// public class/function heuristic (§4.7).
pub fn project(
    ir_docs: &[IRDocument],
    repo_id: &str,
    snapshot_id: &str,
    module_exports: Option<&HashMap<String, Vec<String>>>,
) -> SymbolGraph {
    let mut call_counts: HashMap<String, u32> = HashMap::new();
    let mut import_counts: HashMap<String, u32> = HashMap::new();
    let mut reference_counts: HashMap<String, u32> = HashMap::new();
    let mut relations = Vec::new();

    for doc in ir_docs {
        for edge in doc.edges() {
            match edge.kind {
                EdgeKind::Calls => *call_counts.entry(edge.target_id.clone()).or_default() += edge.frequency(),
                EdgeKind::Imports => *import_counts.entry(edge.target_id.clone()).or_default() += edge.frequency(),
                EdgeKind::References => *reference_counts.entry(edge.target_id.clone()).or_default() += edge.frequency(),
                _ => {}
            }
            relations.push(Relation {
                id: format!("{}->{}:{}", edge.source_id, edge.target_id, edge.kind.as_str()),
                kind: edge.kind,
                source_id: edge.source_id.clone(),
                target_id: edge.target_id.clone(),
            });
        }
    }

    let mut symbols = Vec::new();
    for doc in ir_docs {
        let exported_names = module_exports.and_then(|m| m.get(&doc.file_path));
        for node in doc.nodes() {
            if node.kind == NodeKind::Import {
                continue;
            }

            let is_top_level = node
                .parent_id
                .as_ref()
                .and_then(|parent_id| doc.get_node(parent_id))
                .map(|parent| matches!(parent.kind, NodeKind::Module | NodeKind::File))
                .unwrap_or(true);
            let is_public = node.is_public_by_convention();
            let is_exported = match exported_names {
                Some(names) => names.iter().any(|name| name == &node.name),
                None => is_top_level && is_public && matches!(node.kind, NodeKind::Class | NodeKind::Function),
            };

            symbols.push(Symbol {
                id: node.id.clone(),
                kind: node.kind,
                fqn: node.fqn.clone(),
                name: node.name.clone(),
                repo_id: repo_id.to_string(),
                snapshot_id: snapshot_id.to_string(),
                parent_id: node.parent_id.clone(),
                span: node.span,
                call_count: call_counts.get(&node.id).copied().unwrap_or(0),
                import_count: import_counts.get(&node.id).copied().unwrap_or(0),
                reference_count: reference_counts.get(&node.id).copied().unwrap_or(0),
                is_public,
                is_exported,
            });
        }
    }

    SymbolGraph { symbols, relations }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{Edge, Node};
    use crate::shared::ports::language::Language;

    fn doc_with_two_functions() -> (IRDocument, String, String) {
        let mut doc = IRDocument::new("pkg/a.py", Language::Python, "hash");
        let module = Node::new(NodeKind::Module, "pkg.a".into(), "pkg.a".into(), "pkg/a.py".into(), Span::zero());
        let module_id = doc.add_node(module);

        let caller = Node::new(NodeKind::Function, "pkg.a.caller".into(), "caller".into(), "pkg/a.py".into(), Span::new(1, 0, 2, 0))
            .with_parent(module_id.clone());
        let caller_id = doc.add_node(caller);

        let callee = Node::new(NodeKind::Function, "pkg.a.callee".into(), "callee".into(), "pkg/a.py".into(), Span::new(3, 0, 4, 0))
            .with_parent(module_id);
        let callee_id = doc.add_node(callee);

        doc.add_edge(Edge::new(caller_id.clone(), callee_id.clone(), EdgeKind::Calls));
        (doc, caller_id, callee_id)
    }

    #[test]
    fn call_count_aggregates_from_calls_edges() {
        let (doc, _caller_id, callee_id) = doc_with_two_functions();
        let graph = project(std::slice::from_ref(&doc), "repo-1", "snap-1", None);

        let callee = graph.symbols.iter().find(|s| s.id == callee_id).unwrap();
        assert_eq!(callee.call_count, 1);
    }

    #[test]
    fn top_level_public_function_is_exported_by_default_heuristic() {
        let (doc, _caller_id, callee_id) = doc_with_two_functions();
        let graph = project(std::slice::from_ref(&doc), "repo-1", "snap-1", None);

        let callee = graph.symbols.iter().find(|s| s.id == callee_id).unwrap();
        assert!(callee.is_exported);
    }

    #[test]
    fn explicit_export_map_overrides_the_heuristic() {
        let (doc, caller_id, callee_id) = doc_with_two_functions();
        let mut exports = HashMap::new();
        exports.insert("pkg/a.py".to_string(), vec!["caller".to_string()]);

        let graph = project(std::slice::from_ref(&doc), "repo-1", "snap-1", Some(&exports));

        let caller = graph.symbols.iter().find(|s| s.id == caller_id).unwrap();
        let callee = graph.symbols.iter().find(|s| s.id == callee_id).unwrap();
        assert!(caller.is_exported);
        assert!(!callee.is_exported);
    }

    #[test]
    fn import_nodes_never_become_symbols() {
        let mut doc = IRDocument::new("t.py", Language::Python, "hash");
        let file = Node::new(NodeKind::File, "t.py".into(), "t.py".into(), "t.py".into(), Span::zero());
        let file_id = doc.add_node(file);
        let import_node = Node::new(NodeKind::Import, "t.py::import#0".into(), "import os".into(), "t.py".into(), Span::zero())
            .with_parent(file_id);
        doc.add_node(import_node);

        let graph = project(std::slice::from_ref(&doc), "repo-1", "snap-1", None);

        assert!(!graph.symbols.iter().any(|s| s.kind == NodeKind::Import));
    }
}
