//! Parser Facade (C3, §4.3)
//!
//! Dispatches to a tree-sitter grammar by language tag and returns an
//! immutable AST plus the source text. The facade never aborts on a parse
//! error: whatever tree tree-sitter manages to produce is returned
//! alongside a diagnostic list, and it is downstream layers' job (C4 L1)
//! to decide how much of a broken tree is still useful.

pub mod facade;
pub mod parsed_tree;
pub mod syntax;

pub use facade::ParserFacade;
pub use parsed_tree::{ParseDiagnostic, ParsedTree};
pub use syntax::{SyntaxKind, SyntaxNode};
