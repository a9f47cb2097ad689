//! L2 Occurrence Index (§4.4)
//!
//! L1 already records one `Definition` occurrence per declared symbol
//! (`Occurrence::definition_for`, fired from the node's own declaration
//! site). This layer walks the AST a second time to add `Read`/`Write`
//! occurrences for every other identifier mention — the index L1 built is
//! extended in place, never rebuilt.

use crate::features::parsing::{ParsedTree, SyntaxKind, SyntaxNode};
use crate::shared::models::{IRDocument, Occurrence, ReferenceKind};

pub struct OccurrenceBuilder;

impl OccurrenceBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn run(&self, tree: &ParsedTree, doc: &mut IRDocument) {
        self.walk(&tree.root, doc, false);
    }

    /// `parent_is_assign_target` is set while walking the left-hand side of
    /// an `AssignmentStmt`'s first child, so a `NameExpr` there is recorded
    /// as a `Write` rather than a `Read`.
    fn walk(&self, node: &SyntaxNode, doc: &mut IRDocument, parent_is_assign_target: bool) {
        match &node.kind {
            SyntaxKind::NameExpr => {
                let text = node.text();
                if !text.is_empty() {
                    let reference_kind = if parent_is_assign_target {
                        ReferenceKind::Write
                    } else {
                        ReferenceKind::Read
                    };
                    doc.occurrence_index
                        .insert(Occurrence::new(text, node.span, reference_kind));
                }
                return;
            }
            SyntaxKind::AssignmentStmt => {
                if let Some(target) = node.children.first() {
                    self.walk(target, doc, true);
                }
                for child in node.children.iter().skip(1) {
                    self.walk(child, doc, false);
                }
                return;
            }
            _ => {}
        }

        for child in &node.children {
            self.walk(child, doc, false);
        }
    }
}

impl Default for OccurrenceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
