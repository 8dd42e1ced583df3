//! The published symbol table.
//!
//! Built once per compilation by the semantic analyzer and handed out as
//! an immutable snapshot: code generation reads function signatures from
//! it to rewrite named arguments into positional order, and IDE-style
//! consumers read variable types and container sizes for hover hints.
//! Keys are `(scope id, name)`; scope ids are assigned in pre-order with
//! the global scope as 0.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::types::Ty;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Function,
}

/// What is known about one name in one scope.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolInfo {
    pub kind: SymbolKind,
    pub ty: Ty,
    /// Literal size recorded for `list`/`array` declarations.
    pub container_size: Option<i64>,
}

/// One parameter of a resolved function signature, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSig {
    pub name: String,
    pub ty: Ty,
    pub has_default: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSig {
    pub params: Vec<ParamSig>,
    /// True when any `return` in the body carries a value; decides the
    /// generated return type.
    pub returns_value: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolTable {
    pub symbols: BTreeMap<(u32, String), SymbolInfo>,
    pub functions: BTreeMap<String, FunctionSig>,
}

impl SymbolTable {
    pub fn lookup(&self, scope: u32, name: &str) -> Option<&SymbolInfo> {
        self.symbols.get(&(scope, name.to_string()))
    }

    pub fn function(&self, name: &str) -> Option<&FunctionSig> {
        self.functions.get(name)
    }

    /// Plain-text rendering for `--dump-symbols`, one line per entry,
    /// ordered by scope id then name.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for ((scope, name), info) in &self.symbols {
            let kind = match info.kind {
                SymbolKind::Variable => "var",
                SymbolKind::Function => "fn",
            };
            let _ = write!(out, "scope {scope}: {kind} {name}: {}", info.ty);
            if let Some(size) = info.container_size {
                let _ = write!(out, " [size {size}]");
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_orders_by_scope_then_name() {
        let mut table = SymbolTable::default();
        table.symbols.insert(
            (1, "b".to_string()),
            SymbolInfo {
                kind: SymbolKind::Variable,
                ty: Ty::Float,
                container_size: None,
            },
        );
        table.symbols.insert(
            (0, "nums".to_string()),
            SymbolInfo {
                kind: SymbolKind::Variable,
                ty: Ty::List,
                container_size: Some(3),
            },
        );
        let text = table.render();
        assert_eq!(
            text,
            "scope 0: var nums: list [size 3]\nscope 1: var b: float\n"
        );
    }
}
