//! ParsedTree (§4.3): an immutable AST plus the source text it came from

use super::syntax::SyntaxNode;
use crate::shared::models::Span;
use crate::shared::ports::language::Language;

#[derive(Debug, Clone)]
pub struct ParseDiagnostic {
    pub message: String,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ParsedTree {
    pub root: SyntaxNode,
    pub source: String,
    pub file_path: String,
    pub language: Language,
    pub diagnostics: Vec<ParseDiagnostic>,
}

impl ParsedTree {
    pub fn new(
        root: SyntaxNode,
        source: String,
        file_path: String,
        language: Language,
        diagnostics: Vec<ParseDiagnostic>,
    ) -> Self {
        Self {
            root,
            source,
            file_path,
            language,
            diagnostics,
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn text_for_span(&self, span: &Span) -> &str {
        if span.start_line != span.end_line {
            return "";
        }
        let line_idx = (span.start_line as usize).saturating_sub(1);
        let Some(line) = self.source.lines().nth(line_idx) else {
            return "";
        };
        let start = span.start_col as usize;
        let end = span.end_col as usize;
        if start <= end && end <= line.len() {
            &line[start..end]
        } else {
            ""
        }
    }

    pub fn line_count(&self) -> usize {
        self.source.lines().count()
    }
}
