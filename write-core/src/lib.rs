//! Core pipeline for the Write language compiler.
//!
//! This crate compiles the English-like Write teaching language to C++
//! source text. The pipeline is strictly linear:
//!
//!   source .write
//!     -> lexer     (tokens)
//!     -> parser    (AST)
//!     -> semantic  (symbol table + diagnostics)
//!     -> codegen   (C++ text, only when no errors were found)
//!
//! Higher-level tools (CLI, editors) should depend on this crate rather
//! than reimplementing the pipeline; [`compiler::compile`] is the entry
//! point, and the diagnostics and symbol table it returns are the
//! interchange formats editor tooling consumes.

// ---------------------------------------------------------------------
// Error handling and diagnostics
// ---------------------------------------------------------------------

pub mod span;
pub mod diagnostic;
pub mod error;

// ---------------------------------------------------------------------
// Front-end: lexing and parsing
// ---------------------------------------------------------------------

pub mod lexer;
pub mod parser;
pub mod ast;

// ---------------------------------------------------------------------
// Semantic layer: types, scopes, symbol table
// ---------------------------------------------------------------------

pub mod types;
pub mod semantic;
pub mod symbols;

// ---------------------------------------------------------------------
// Back-end: code generation and compiler orchestration
// ---------------------------------------------------------------------

pub mod codegen;
pub mod compiler;

// ---------------------------------------------------------------------
// Public API re-exports
// ---------------------------------------------------------------------

pub use compiler::{compile, compile_file, CompileResult};
pub use diagnostic::{has_errors, Diagnostic, DiagnosticKind, Severity};
pub use error::CoreError;
pub use span::Span;
pub use symbols::SymbolTable;
