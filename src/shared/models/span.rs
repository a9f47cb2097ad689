//! Source location types
//!
//! 1-based line/column positions; a span is half-open at the column end and
//! must satisfy `(start_line, start_col) <= (end_line, end_col)`.

use serde::{Deserialize, Serialize};

/// Single location in source code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Span in source code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

impl Span {
    /// Builds a span. Every producer in this crate derives spans from
    /// tree-sitter node ranges, which are always ordered; this asserts that
    /// invariant so a hand-built span (tests, fixtures) fails loudly instead
    /// of silently corrupting a node.
    pub fn new(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        let span = Self {
            start_line,
            start_col,
            end_line,
            end_col,
        };
        debug_assert!(
            span.is_ordered(),
            "span start must not come after end: {:?}",
            span
        );
        span
    }

    pub fn zero() -> Self {
        Self::new(0, 0, 0, 0)
    }

    fn is_ordered(&self) -> bool {
        (self.start_line, self.start_col) <= (self.end_line, self.end_col)
    }

    pub fn start(&self) -> Location {
        Location::new(self.start_line, self.start_col)
    }

    pub fn end(&self) -> Location {
        Location::new(self.end_line, self.end_col)
    }

    pub fn contains_line(&self, line: u32) -> bool {
        self.start_line <= line && line <= self.end_line
    }

    pub fn contains(&self, other: &Span) -> bool {
        self.start() <= other.start() && other.end() <= self.end()
    }

    pub fn line_count(&self) -> u32 {
        if self.end_line >= self.start_line {
            self.end_line - self.start_line + 1
        } else {
            0
        }
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::zero()
    }
}
