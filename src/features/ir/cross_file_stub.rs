//! L9 Cross-File Stub (§4.4)
//!
//! Turns L1's raw `ImportToken`s into `Import` nodes and unresolved
//! `Imports` edges from the file. Resolving an import token to the symbol
//! it names across files is C5's job entirely — this layer only records
//! that the edge exists and what text it was spelled with.

use crate::features::ir::lexical::ImportToken;
use crate::shared::models::{Edge, EdgeKind, IRDocument, Node, NodeKind};

pub struct CrossFileStubBuilder;

impl CrossFileStubBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn run(&self, file_id: &str, imports: &[ImportToken], doc: &mut IRDocument) {
        let file_path = doc.file_path.clone();
        for (idx, token) in imports.iter().enumerate() {
            let fqn = format!("{file_path}::import#{idx}");
            let import_node = Node::new(
                NodeKind::Import,
                fqn,
                token.raw_text.clone(),
                file_path.clone(),
                token.span,
            )
            .with_parent(file_id.to_string());
            let import_id = doc.add_node(import_node);
            doc.add_edge(Edge::new(file_id.to_string(), import_id, EdgeKind::Imports));
        }
    }
}

impl Default for CrossFileStubBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::Span;

    #[test]
    fn each_import_token_becomes_an_import_node_with_an_unresolved_edge() {
        let mut doc = IRDocument::new("t.py", crate::shared::ports::language::Language::Python, "hash");
        let tokens = vec![
            ImportToken { raw_text: "import os".to_string(), span: Span::new(1, 0, 1, 9) },
            ImportToken { raw_text: "import sys".to_string(), span: Span::new(2, 0, 2, 10) },
        ];

        CrossFileStubBuilder::new().run("file-1", &tokens, &mut doc);

        let import_nodes: Vec<_> = doc.nodes().filter(|n| n.kind == NodeKind::Import).collect();
        assert_eq!(import_nodes.len(), 2);
        assert_eq!(doc.edges().filter(|e| e.kind == EdgeKind::Imports).count(), 2);
    }
}
