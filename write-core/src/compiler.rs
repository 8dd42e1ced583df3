//! The compilation pipeline: Lexer, Parser, Semantic Analyzer, Code
//! Generator, strictly in that order, each stage consuming the previous
//! stage's output. Diagnostics accumulate across stages; every stage
//! after the lexer still runs in degraded form so one pass surfaces as
//! many problems as possible. Only code generation is gated: it runs
//! exactly when no error-severity diagnostic exists (warnings do not
//! block it).

use std::fs;
use std::path::{Path, PathBuf};

use crate::ast::Program;
use crate::codegen::generate;
use crate::diagnostic::{has_errors, Diagnostic};
use crate::error::CoreError;
use crate::lexer::lex;
use crate::parser::parse;
use crate::semantic::analyze;
use crate::symbols::SymbolTable;

/// Everything one compilation run produces. `code` is `None` exactly
/// when an error-severity diagnostic was reported.
#[derive(Debug)]
pub struct CompileResult {
    pub program: Program,
    pub symbols: SymbolTable,
    pub diagnostics: Vec<Diagnostic>,
    pub code: Option<String>,
}

impl CompileResult {
    pub fn has_errors(&self) -> bool {
        has_errors(&self.diagnostics)
    }
}

/// Compile Write source text to C++. Pure and deterministic; all file
/// I/O belongs to the caller (or to [`compile_file`]).
pub fn compile(source: &str) -> CompileResult {
    let lexed = lex(source);
    let mut diagnostics = lexed.diagnostics;

    let parsed = parse(lexed.tokens);
    diagnostics.extend(parsed.diagnostics);

    let analysis = analyze(&parsed.program);
    diagnostics.extend(analysis.diagnostics);

    let code = if has_errors(&diagnostics) {
        None
    } else {
        Some(generate(&parsed.program, &analysis.symbols))
    };

    CompileResult {
        program: parsed.program,
        symbols: analysis.symbols,
        diagnostics,
        code,
    }
}

/// Read a source file and compile it.
pub fn compile_file(path: &Path) -> Result<CompileResult, CoreError> {
    let source = fs::read_to_string(path).map_err(|source| CoreError::ReadSource {
        path: PathBuf::from(path),
        source,
    })?;
    Ok(compile(&source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::{DiagnosticKind, Severity};

    #[test]
    fn clean_source_generates_code_without_diagnostics() {
        let result = compile("set x to 10\nset y to 5\nset sum to add x and y");
        assert!(result.diagnostics.is_empty());
        let code = result.code.unwrap();
        assert!(code.contains("auto x = 10;"));
        assert!(code.contains("auto y = 5;"));
        assert!(code.contains("auto sum = x + y;"));
    }

    #[test]
    fn out_of_bounds_index_blocks_generation() {
        let result = compile("make nums as list of size 3\nset nums[5] to 1");
        assert_eq!(result.diagnostics.len(), 1);
        let diag = &result.diagnostics[0];
        assert_eq!(diag.kind, DiagnosticKind::OutOfBoundsIndex);
        assert!(diag.message.contains("index 5"));
        assert!(diag.message.contains("size 3"));
        assert!(result.code.is_none());
    }

    #[test]
    fn named_arguments_resolve_to_positional_call() {
        let result = compile(
            "function sum_up (a, b)\n return a + b\nend function\ncall \"sum_up\" with arguments:(a = 3, b = 4)",
        );
        assert!(result.diagnostics.is_empty());
        assert!(result.code.unwrap().contains("sum_up(3, 4);"));
    }

    #[test]
    fn call_to_unknown_function_refuses_generation() {
        let result = compile("call \"unknown_fn\" with arguments:()");
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(
            result.diagnostics[0].kind,
            DiagnosticKind::UndefinedIdentifier
        );
        assert!(result.code.is_none());
    }

    #[test]
    fn for_loop_covers_the_upper_bound() {
        let result = compile("for i from 1 to 5 do\n print i\nend for");
        assert!(result.diagnostics.is_empty());
        assert!(result
            .code
            .unwrap()
            .contains("for (int i = 1; i <= 5; ++i) {"));
    }

    #[test]
    fn top_level_return_is_the_only_one_flagged() {
        let result = compile("function f ()\n return 1\nend function\nreturn 2");
        let flagged: Vec<_> = result
            .diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::ReturnOutsideFunction)
            .collect();
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].span.line, 4);
    }

    #[test]
    fn warnings_do_not_block_generation() {
        let result = compile("function f ()\n return 1, 2\nend function");
        assert!(result
            .diagnostics
            .iter()
            .all(|d| d.severity == Severity::Warning));
        assert!(result.code.is_some());
    }

    #[test]
    fn diagnostics_accumulate_across_stages() {
        // A lexical error, a syntax error, and a semantic error in one
        // source; all three stages report.
        let result = compile("set x to 10 @\nset to 5\nprint ghost");
        let kinds: Vec<_> = result.diagnostics.iter().map(|d| d.kind).collect();
        assert!(kinds.contains(&DiagnosticKind::Lexical));
        assert!(kinds.contains(&DiagnosticKind::Syntax));
        assert!(kinds.contains(&DiagnosticKind::UndefinedIdentifier));
        assert!(result.code.is_none());
    }

    #[test]
    fn overflowing_integer_literal_blocks_generation() {
        let result = compile("set x to 99999999999999999999");
        assert!(!result.diagnostics.is_empty());
        assert!(result
            .diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::Syntax));
        assert!(result.code.is_none());
    }

    #[test]
    fn compilation_is_deterministic() {
        let source = "make nums as list of size 3\nfor i from 0 to 2 do\n set nums[i] to i\nend for\nprint nums";
        let first = compile(source);
        let second = compile(source);
        assert_eq!(first.code, second.code);
        assert_eq!(first.diagnostics, second.diagnostics);
        assert_eq!(first.symbols, second.symbols);
    }

    #[test]
    fn symbol_table_is_published_even_when_generation_is_refused() {
        let result = compile("make nums as array of size 4\nprint ghost");
        assert!(result.code.is_none());
        let nums = result.symbols.lookup(0, "nums").unwrap();
        assert_eq!(nums.container_size, Some(4));
    }
}
