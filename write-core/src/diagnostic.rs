//! Diagnostics reported by the compiler pipeline.
//!
//! A `Diagnostic` is the only way a stage reports a problem with the
//! source program; stages accumulate them and keep going rather than
//! failing on the first error. The list handed to the caller is
//! append-only per compilation run and ordered by stage.

use std::fmt;

use crate::span::Span;

/// How serious a diagnostic is. Only `Error` blocks code generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Category of a diagnostic, used by editor consumers to choose a
/// presentation (squiggle, hover, quick-fix) without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    Lexical,
    Syntax,
    UndefinedIdentifier,
    Redeclaration,
    TypeMismatch,
    ArityMismatch,
    UnknownNamedArg,
    DuplicateArg,
    OutOfBoundsIndex,
    NonNumericLoopBound,
    ReturnOutsideFunction,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::Lexical => "lexical",
            DiagnosticKind::Syntax => "syntax",
            DiagnosticKind::UndefinedIdentifier => "undefined-identifier",
            DiagnosticKind::Redeclaration => "redeclaration",
            DiagnosticKind::TypeMismatch => "type-mismatch",
            DiagnosticKind::ArityMismatch => "arity-mismatch",
            DiagnosticKind::UnknownNamedArg => "unknown-named-arg",
            DiagnosticKind::DuplicateArg => "duplicate-arg",
            DiagnosticKind::OutOfBoundsIndex => "out-of-bounds-index",
            DiagnosticKind::NonNumericLoopBound => "non-numeric-loop-bound",
            DiagnosticKind::ReturnOutsideFunction => "return-outside-function",
        };
        write!(f, "{name}")
    }
}

/// A single reported problem with its source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn error(kind: DiagnosticKind, message: impl Into<String>, span: Span) -> Self {
        Diagnostic {
            severity: Severity::Error,
            kind,
            message: message.into(),
            span,
        }
    }

    pub fn warning(kind: DiagnosticKind, message: impl Into<String>, span: Span) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            kind,
            message: message.into(),
            span,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}[{}]: {}",
            self.span, self.severity, self.kind, self.message
        )
    }
}

/// True if any diagnostic in the slice has error severity.
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_position_severity_and_kind() {
        let diag = Diagnostic::error(
            DiagnosticKind::OutOfBoundsIndex,
            "index 5 out of bounds",
            Span::new(2, 5),
        );
        assert_eq!(
            diag.to_string(),
            "2:5: error[out-of-bounds-index]: index 5 out of bounds"
        );
    }

    #[test]
    fn warnings_do_not_count_as_errors() {
        let diags = vec![Diagnostic::warning(
            DiagnosticKind::ArityMismatch,
            "extra return values are ignored",
            Span::new(1, 1),
        )];
        assert!(!has_errors(&diags));
    }
}
