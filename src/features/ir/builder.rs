//! Pipeline entry point for C4: runs L1-L9 over one file's `ParsedTree` in
//! order, respecting `LayerToggles` and the failure semantics in §4.4 — a
//! parser failure still produces an `IRDocument` with L1 nodes and a
//! diagnostic, and every later layer is skipped for that file rather than
//! aborting the whole run.

use crate::config::LayerToggles;
use crate::features::parsing::ParsedTree;
use crate::shared::models::IRDocument;
use crate::shared::ports::type_service::{NullTypeService, TypeService};

use super::cfg::CfgBuilder;
use super::cross_file_stub::CrossFileStubBuilder;
use super::enrichment::EnrichmentBuilder;
use super::expression::ExpressionBuilder;
use super::lexical::LexicalBuilder;
use super::occurrence::OccurrenceBuilder;
use super::sccp::SccpAnalyzer;
use super::ssa::SsaBuilder;
use super::summaries::SummaryBuilder;

#[derive(Debug, Clone)]
pub struct LayerError {
    pub layer: &'static str,
    pub message: String,
}

#[derive(Debug, Clone)]
pub enum LayerOutcome {
    /// Every toggled-on layer ran to completion.
    Completed,
    /// Parsing produced diagnostics; only L1 ran, everything past it was
    /// skipped for this file.
    PartialFailure(LayerError),
}

pub struct IrBuilder<'a> {
    type_service: &'a dyn TypeService,
}

impl<'a> IrBuilder<'a> {
    pub fn new(type_service: &'a dyn TypeService) -> Self {
        Self { type_service }
    }

    pub fn build(&self, tree: &ParsedTree, content_hash: &str, toggles: &LayerToggles) -> (IRDocument, LayerOutcome) {
        let mut doc = IRDocument::new(tree.file_path.clone(), tree.language, content_hash.to_string());

        if !toggles.l1_lexical {
            return (doc, LayerOutcome::Completed);
        }

        let imports = LexicalBuilder::new().run(tree, &mut doc);

        if tree.has_errors() {
            let message = tree
                .diagnostics
                .iter()
                .map(|d| d.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return (
                doc,
                LayerOutcome::PartialFailure(LayerError {
                    layer: "L1",
                    message,
                }),
            );
        }

        if toggles.l2_occurrence {
            OccurrenceBuilder::new().run(tree, &mut doc);
        }
        if toggles.l3_lsp_enrichment {
            EnrichmentBuilder::new(self.type_service).run(&mut doc);
        }
        if toggles.l4_expression_trees {
            ExpressionBuilder::new().run(tree, &mut doc);
        }
        if toggles.l5_cfg {
            CfgBuilder::new().run(tree, &mut doc);
        }
        if toggles.l6_dfg_ssa {
            SsaBuilder::new().run(&mut doc);
        }
        if toggles.l7_constant_propagation {
            SccpAnalyzer::new().run(&mut doc);
        }
        if toggles.l8_semantic_summaries {
            SummaryBuilder::new().run(&mut doc);
        }
        if toggles.l9_cross_file_stub {
            if let Some(file_node) = doc.nodes().find(|n| matches!(n.kind, crate::shared::models::NodeKind::File)) {
                let file_id = file_node.id.clone();
                CrossFileStubBuilder::new().run(&file_id, &imports, &mut doc);
            }
        }

        (doc, LayerOutcome::Completed)
    }
}

impl<'a> Default for IrBuilder<'a> {
    fn default() -> Self {
        Self::new(&NullTypeService)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::parsing::{ParseDiagnostic, SyntaxKind, SyntaxNode};
    use crate::shared::models::Span;

    #[test]
    fn quick_strategy_toggles_produce_only_l1_nodes() {
        let root = SyntaxNode::new(SyntaxKind::Module, Span::zero(), "module");
        let tree = ParsedTree::new(
            root,
            String::new(),
            "t.py".to_string(),
            crate::shared::ports::language::Language::Python,
            Vec::new(),
        );
        let service = NullTypeService;
        let builder = IrBuilder::new(&service);
        let (doc, outcome) = builder.build(&tree, "hash", &LayerToggles::l1_only());

        assert!(matches!(outcome, LayerOutcome::Completed));
        assert!(doc.nodes().any(|n| matches!(n.kind, crate::shared::models::NodeKind::File)));
        assert!(doc.expression_trees.is_empty());
    }

    #[test]
    fn parse_errors_stop_the_pipeline_after_l1() {
        let root = SyntaxNode::new(SyntaxKind::Module, Span::zero(), "module");
        let tree = ParsedTree::new(
            root,
            String::new(),
            "broken.py".to_string(),
            crate::shared::ports::language::Language::Python,
            vec![ParseDiagnostic {
                message: "unexpected EOF".to_string(),
                span: Span::zero(),
            }],
        );
        let service = NullTypeService;
        let builder = IrBuilder::new(&service);
        let (doc, outcome) = builder.build(&tree, "hash", &LayerToggles::default());

        match outcome {
            LayerOutcome::PartialFailure(err) => assert_eq!(err.layer, "L1"),
            LayerOutcome::Completed => panic!("expected a partial failure"),
        }
        assert!(doc.nodes().any(|n| matches!(n.kind, crate::shared::models::NodeKind::File)));
        assert!(doc.cfgs.is_empty());
    }

    #[test]
    fn fully_enabled_toggles_run_every_layer_on_clean_input() {
        let func_name = SyntaxNode::new(SyntaxKind::NameExpr, Span::zero(), "identifier").with_text("hello");
        let func_span = Span::new(1, 0, 2, 0);
        let func = SyntaxNode::new(SyntaxKind::FunctionDef, func_span, "function_definition")
            .with_children(vec![func_name]);
        let root = SyntaxNode::new(SyntaxKind::Module, Span::zero(), "module")
            .with_children(vec![func]);
        let tree = ParsedTree::new(
            root,
            "def hello(): pass".to_string(),
            "t.py".to_string(),
            crate::shared::ports::language::Language::Python,
            Vec::new(),
        );
        let service = NullTypeService;
        let builder = IrBuilder::new(&service);
        let (doc, outcome) = builder.build(&tree, "hash", &LayerToggles::default());

        assert!(matches!(outcome, LayerOutcome::Completed));
        let func_id = doc
            .nodes()
            .find(|n| matches!(n.kind, crate::shared::models::NodeKind::Function))
            .unwrap()
            .id
            .clone();
        assert!(doc.cfgs.contains_key(&func_id));
        assert!(doc.get_node(&func_id).unwrap().control_flow_summary.is_some());
    }
}
