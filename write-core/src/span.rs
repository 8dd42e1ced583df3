//! Source positions for the Write compiler.
//!
//! Every token, AST node, and diagnostic carries a `Span` so that
//! downstream tooling (editors, the CLI) can point at the offending
//! source location.

use std::fmt;

/// A position in the source text. Line and column are 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Span {
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub fn new(line: u32, column: u32) -> Self {
        Span { line, column }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_line_and_column() {
        assert_eq!(Span::new(3, 7).to_string(), "3:7");
    }
}
