//! ParserFacade (C3, §4.3)

use tree_sitter::{Node as TSNode, Parser as TSParser, Tree};

use super::parsed_tree::{ParseDiagnostic, ParsedTree};
use super::syntax::{SyntaxKind, SyntaxNode};
use crate::errors::{CodegraphError, Result};
use crate::shared::models::Span;
use crate::shared::ports::language::Language;

fn ts_language(language: Language) -> tree_sitter::Language {
    match language {
        Language::Python => tree_sitter_python::language(),
        Language::Java => tree_sitter_java::language(),
        Language::TypeScript => tree_sitter_typescript::language_typescript(),
        Language::JavaScript => tree_sitter_javascript::language(),
        Language::Kotlin => tree_sitter_kotlin::language(),
        Language::Rust => tree_sitter_rust::language(),
        Language::Go => tree_sitter_go::language(),
    }
}

fn to_span(node: &TSNode) -> Span {
    Span::new(
        node.start_position().row as u32 + 1,
        node.start_position().column as u32,
        node.end_position().row as u32 + 1,
        node.end_position().column as u32,
    )
}

/// Maps a grammar-specific node kind string onto the language-neutral
/// `SyntaxKind`. Most of tree-sitter's grammars converge on the same
/// kind names for common constructs (`call`, `identifier`, `if_statement`);
/// divergences are handled per-language before falling through to the
/// shared table.
fn map_kind(language: Language, ts_kind: &str) -> SyntaxKind {
    if let Some(kind) = map_kind_language_specific(language, ts_kind) {
        return kind;
    }
    match ts_kind {
        "function_definition" | "function_declaration" | "function_item" | "method_definition" => {
            SyntaxKind::FunctionDef
        }
        "class_definition" | "class_declaration" | "class_body" => SyntaxKind::ClassDef,
        "lambda" | "arrow_function" | "lambda_expression" | "closure_expression" => {
            SyntaxKind::LambdaDef
        }
        "assignment" | "assignment_expression" | "variable_declarator" | "let_declaration" => {
            SyntaxKind::AssignmentStmt
        }
        "parameter" | "typed_parameter" | "default_parameter" | "formal_parameter"
        | "parameter_declaration" => SyntaxKind::ParameterDecl,
        "import_statement" | "import_from_statement" | "import_declaration" | "use_declaration" => {
            SyntaxKind::ImportDecl
        }
        "call" | "call_expression" | "method_invocation" => SyntaxKind::CallExpr,
        "identifier" | "field_identifier" | "type_identifier" => SyntaxKind::NameExpr,
        "attribute" | "field_expression" | "member_expression" | "field_access" => {
            SyntaxKind::AttributeExpr
        }
        "string" | "integer" | "float" | "true" | "false" | "none" | "null" | "number"
        | "string_literal" | "integer_literal" | "boolean_literal" => SyntaxKind::LiteralExpr,
        "binary_operator" | "binary_expression" | "comparison_operator" | "boolean_operator" => {
            SyntaxKind::BinaryExpr
        }
        "unary_operator" | "unary_expression" | "not_operator" => SyntaxKind::UnaryExpr,
        "return_statement" | "return_expression" => SyntaxKind::ReturnStmt,
        "if_statement" | "if_expression" => SyntaxKind::IfStmt,
        "for_statement" | "for_expression" | "for_in_statement" => SyntaxKind::ForStmt,
        "while_statement" | "while_expression" => SyntaxKind::WhileStmt,
        "try_statement" | "try_expression" => SyntaxKind::TryStmt,
        "with_statement" => SyntaxKind::WithStmt,
        "break_statement" | "break_expression" => SyntaxKind::BreakStmt,
        "continue_statement" | "continue_expression" => SyntaxKind::ContinueStmt,
        "raise_statement" | "throw_statement" | "throw_expression" => SyntaxKind::RaiseStmt,
        "yield" | "yield_expression" => SyntaxKind::YieldExpr,
        "await" | "await_expression" => SyntaxKind::AwaitExpr,
        "block" | "module" | "program" | "source_file" | "statement_block" => SyntaxKind::Block,
        "comment" | "line_comment" | "block_comment" => SyntaxKind::Comment,
        "decorator" | "annotation" | "attribute_item" => SyntaxKind::Decorator,
        "type" | "type_annotation" => SyntaxKind::TypeAnnotation,
        other => SyntaxKind::Other(other.to_string()),
    }
}

fn map_kind_language_specific(language: Language, ts_kind: &str) -> Option<SyntaxKind> {
    match (language, ts_kind) {
        (Language::Kotlin, "fun_decl" | "function_declaration") => Some(SyntaxKind::FunctionDef),
        (Language::Kotlin, "class_decl") => Some(SyntaxKind::ClassDef),
        (Language::Go, "func_literal") => Some(SyntaxKind::LambdaDef),
        (Language::Rust, "closure_expression") => Some(SyntaxKind::LambdaDef),
        (Language::Rust, "match_expression") => Some(SyntaxKind::IfStmt),
        _ => None,
    }
}

/// Dispatches to a tree-sitter grammar by language tag. A failure to parse
/// never aborts: the facade returns whatever tree tree-sitter produced,
/// degraded to an empty module node in the (rare) case tree-sitter itself
/// refuses to return a tree at all.
pub struct ParserFacade;

impl ParserFacade {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, source: &str, file_path: &str, language: Language) -> Result<ParsedTree> {
        let mut parser = TSParser::new();
        parser
            .set_language(&ts_language(language))
            .map_err(|e| CodegraphError::parse_error(format!("failed to set grammar: {e}")))?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| CodegraphError::parse_error("tree-sitter returned no tree"))?;

        Ok(self.convert(&tree, source, file_path, language))
    }

    fn convert(&self, tree: &Tree, source: &str, file_path: &str, language: Language) -> ParsedTree {
        let root_ts = tree.root_node();
        let root = self.convert_node(&root_ts, source, language);

        let mut diagnostics = Vec::new();
        collect_diagnostics(&root_ts, &mut diagnostics);

        ParsedTree::new(root, source.to_string(), file_path.to_string(), language, diagnostics)
    }

    fn convert_node(&self, node: &TSNode, source: &str, language: Language) -> SyntaxNode {
        let kind = map_kind(language, node.kind());
        let span = to_span(node);

        let mut cursor = node.walk();
        let children: Vec<SyntaxNode> = node
            .children(&mut cursor)
            .filter(|c| !c.is_extra())
            .map(|c| self.convert_node(&c, source, language))
            .collect();

        let text = if children.is_empty() {
            source.get(node.byte_range()).unwrap_or("").to_string()
        } else {
            String::new()
        };

        SyntaxNode::new(kind, span, node.kind())
            .with_text(text)
            .with_children(children)
    }
}

impl Default for ParserFacade {
    fn default() -> Self {
        Self::new()
    }
}

fn collect_diagnostics(node: &TSNode, out: &mut Vec<ParseDiagnostic>) {
    if node.is_error() || node.is_missing() {
        out.push(ParseDiagnostic {
            message: format!("parse error at {:?}", node.kind()),
            span: to_span(node),
        });
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_diagnostics(&child, out);
    }
}
