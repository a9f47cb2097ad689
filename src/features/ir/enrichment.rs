//! L3 LSP Enrichment (§4.4)
//!
//! Attaches hover type/doc strings to declaration nodes and resolves
//! `Read`/`Write` occurrences to a definition site, both through the cached
//! `TypeService` port (§6) — an external type checker is out of scope, so
//! everything here degrades to "no enrichment" rather than failing when the
//! port is a `NullTypeService`.

use crate::shared::models::{AttrValue, IRDocument, NodeKind, ReferenceKind};
use crate::shared::ports::type_service::TypeService;

pub struct EnrichmentBuilder<'a> {
    type_service: &'a dyn TypeService,
}

impl<'a> EnrichmentBuilder<'a> {
    pub fn new(type_service: &'a dyn TypeService) -> Self {
        Self { type_service }
    }

    pub fn run(&self, doc: &mut IRDocument) {
        let file_path = doc.file_path.clone();
        let symbol_ids: Vec<String> = doc
            .nodes()
            .filter(|n| {
                matches!(
                    n.kind,
                    NodeKind::Function
                        | NodeKind::Method
                        | NodeKind::Class
                        | NodeKind::Variable
                        | NodeKind::Parameter
                        | NodeKind::Field
                )
            })
            .map(|n| n.id.clone())
            .collect();

        for id in symbol_ids {
            let Some(span) = doc.get_node(&id).map(|n| n.span) else { continue };
            let Some(hover) = self.type_service.hover(&file_path, span.start_line, span.start_col) else {
                continue;
            };
            if let Some(node) = doc.get_node_mut(&id) {
                if let Some(type_str) = hover.type_str {
                    node.attrs.insert("hover_type".to_string(), AttrValue::Str(type_str));
                }
                if let Some(docs) = hover.docs {
                    node.attrs.insert("hover_docs".to_string(), AttrValue::Str(docs));
                }
            }
        }

        self.resolve_occurrences(doc);
    }

    /// Populates `Occurrence::symbol_id` for reads/writes the type service
    /// can resolve to a definition location. Definitions already carry a
    /// symbol id from L1 (`Occurrence::definition_for`) and are left alone.
    fn resolve_occurrences(&self, doc: &mut IRDocument) {
        let file_path = doc.file_path.clone();
        let identifiers: Vec<String> = doc.occurrence_index.identifiers().map(str::to_string).collect();

        for identifier in identifiers {
            let occurrences = doc.occurrence_index.get(&identifier).to_vec();
            for (idx, occ) in occurrences.iter().enumerate() {
                if occ.reference_kind == ReferenceKind::Definition || occ.symbol_id.is_some() {
                    continue;
                }
                let Some(def_loc) = self
                    .type_service
                    .definition(&file_path, occ.span.start_line, occ.span.start_col)
                else {
                    continue;
                };
                if let Some(def_node) = doc
                    .nodes()
                    .find(|n| n.span.start_line == def_loc.line && n.span.start_col == def_loc.col)
                {
                    let symbol_id = def_node.id.clone();
                    doc.occurrence_index.set_symbol_id(&identifier, idx, symbol_id);
                }
            }
        }
    }
}
