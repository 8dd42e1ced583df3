//! Semantic analysis: scopes, types, bounds, call resolution.
//!
//! The analyzer walks the whole program no matter how many problems it
//! finds; diagnostics on sibling statements are independent and all of
//! them are worth reporting in one pass. It publishes the symbol table
//! snapshot even for programs full of errors, so hover tooling keeps
//! working while the user is mid-edit.
//!
//! Scoping is block scoping throughout: the global scope, one scope per
//! function body (parameters included), and one scope per control-flow
//! block, the `for` loop variable living in the loop's scope. A name
//! must be unique within its innermost scope; shadowing an outer scope
//! is allowed.

use std::collections::BTreeMap;

use crate::ast::{
    BinOp, CallNode, Expr, ExprKind, FunctionDef, Param, Program, Stmt, StmtKind, UnOp,
};
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::span::Span;
use crate::symbols::{FunctionSig, ParamSig, SymbolInfo, SymbolKind, SymbolTable};
use crate::types::{assignable, promote, Ty};

/// Result of semantic analysis. The symbol table is always published,
/// errors or not.
#[derive(Debug)]
pub struct Analysis {
    pub symbols: SymbolTable,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn analyze(program: &Program) -> Analysis {
    let mut analyzer = Analyzer {
        table: SymbolTable::default(),
        diagnostics: Vec::new(),
        scopes: vec![Scope::new(0)],
        next_scope: 1,
        fn_depth: 0,
    };
    analyzer.run(program);
    Analysis {
        symbols: analyzer.table,
        diagnostics: analyzer.diagnostics,
    }
}

struct Scope {
    id: u32,
    names: BTreeMap<String, SymbolInfo>,
}

impl Scope {
    fn new(id: u32) -> Self {
        Scope {
            id,
            names: BTreeMap::new(),
        }
    }
}

struct Analyzer {
    table: SymbolTable,
    diagnostics: Vec<Diagnostic>,
    scopes: Vec<Scope>,
    next_scope: u32,
    fn_depth: u32,
}

impl Analyzer {
    fn run(&mut self, program: &Program) {
        // Signatures first so top-level code may call any function
        // regardless of definition order.
        for func in &program.functions {
            self.register_function(func);
        }
        for stmt in &program.statements {
            self.statement(stmt);
        }
        for func in &program.functions {
            self.function_body(func);
        }
        let global = self.scopes.pop().unwrap_or_else(|| Scope::new(0));
        self.publish(global);
    }

    // --- scopes ---

    fn push_scope(&mut self) {
        let id = self.next_scope;
        self.next_scope += 1;
        self.scopes.push(Scope::new(id));
    }

    fn pop_scope(&mut self) {
        if let Some(scope) = self.scopes.pop() {
            self.publish(scope);
        }
    }

    fn publish(&mut self, scope: Scope) {
        for (name, info) in scope.names {
            self.table.symbols.insert((scope.id, name), info);
        }
    }

    /// Declare a name in the innermost scope. A second declaration in
    /// the same scope is a redeclaration; the original entry wins.
    fn declare(&mut self, name: &str, info: SymbolInfo, span: Span) {
        let scope = self.scopes.last_mut().unwrap();
        if scope.names.contains_key(name) {
            self.diagnostics.push(Diagnostic::error(
                DiagnosticKind::Redeclaration,
                format!("'{name}' is already declared in this scope"),
                span,
            ));
            return;
        }
        scope.names.insert(name.to_string(), info);
    }

    fn lookup(&self, name: &str) -> Option<&SymbolInfo> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.names.get(name))
    }

    fn lookup_mut(&mut self, name: &str) -> Option<&mut SymbolInfo> {
        self.scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.names.get_mut(name))
    }

    // --- functions ---

    fn register_function(&mut self, func: &FunctionDef) {
        if self.table.functions.contains_key(&func.name) {
            self.diagnostics.push(Diagnostic::error(
                DiagnosticKind::Redeclaration,
                format!("function '{}' is defined more than once", func.name),
                func.span,
            ));
            return;
        }
        let mut params = Vec::with_capacity(func.params.len());
        for param in &func.params {
            if params.iter().any(|p: &ParamSig| p.name == param.name) {
                self.diagnostics.push(Diagnostic::error(
                    DiagnosticKind::Redeclaration,
                    format!("duplicate parameter '{}'", param.name),
                    param.span,
                ));
                continue;
            }
            params.push(ParamSig {
                name: param.name.clone(),
                ty: param_type(param),
                has_default: param.default.is_some(),
            });
        }
        let returns_value = body_returns_value(&func.body);
        self.table
            .functions
            .insert(func.name.clone(), FunctionSig { params, returns_value });
        self.declare(
            &func.name,
            SymbolInfo {
                kind: SymbolKind::Function,
                ty: if returns_value { Ty::Float } else { Ty::Unknown },
                container_size: None,
            },
            func.span,
        );
    }

    fn function_body(&mut self, func: &FunctionDef) {
        self.push_scope();
        self.fn_depth += 1;
        for param in &func.params {
            if let Some(default) = &param.default {
                let default_ty = self.expr_type(default);
                let declared = param_type(param);
                if !assignable(declared, default_ty) {
                    self.diagnostics.push(Diagnostic::error(
                        DiagnosticKind::TypeMismatch,
                        format!(
                            "default value of '{}' is {default_ty}, expected {declared}",
                            param.name
                        ),
                        param.span,
                    ));
                }
            }
            self.declare(
                &param.name,
                SymbolInfo {
                    kind: SymbolKind::Variable,
                    ty: param_type(param),
                    container_size: None,
                },
                param.span,
            );
        }
        for stmt in &func.body {
            self.statement(stmt);
        }
        self.fn_depth -= 1;
        self.pop_scope();
    }

    // --- statements ---

    fn statement(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Declaration { name, ty, size } => {
                let declared = ty.unwrap_or(Ty::Unknown);
                let mut container_size = None;
                if let Some(size_expr) = size {
                    self.expr_type(size_expr);
                    match size_expr.literal_int() {
                        Some(n) if n >= 0 => container_size = Some(n),
                        Some(n) => self.diagnostics.push(Diagnostic::error(
                            DiagnosticKind::TypeMismatch,
                            format!("container size must be non-negative, found {n}"),
                            size_expr.span,
                        )),
                        None => self.diagnostics.push(Diagnostic::error(
                            DiagnosticKind::TypeMismatch,
                            "container size must be an integer literal",
                            size_expr.span,
                        )),
                    }
                } else if declared.is_container() {
                    self.diagnostics.push(Diagnostic::error(
                        DiagnosticKind::TypeMismatch,
                        format!("'{name}' needs a size: 'make {name} as {declared} of size N'"),
                        stmt.span,
                    ));
                }
                self.declare(
                    name,
                    SymbolInfo {
                        kind: SymbolKind::Variable,
                        ty: declared,
                        container_size,
                    },
                    stmt.span,
                );
            }
            StmtKind::Assign { name, ty, value } => {
                let value_ty = self.expr_type(value);
                if let Some(declared) = ty {
                    if !assignable(*declared, value_ty) {
                        self.diagnostics.push(Diagnostic::error(
                            DiagnosticKind::TypeMismatch,
                            format!("cannot assign {value_ty} to '{name}' of type {declared}"),
                            value.span,
                        ));
                    }
                    self.declare(
                        name,
                        SymbolInfo {
                            kind: SymbolKind::Variable,
                            ty: *declared,
                            container_size: None,
                        },
                        stmt.span,
                    );
                    return;
                }
                match self.lookup(name) {
                    Some(info) => {
                        let target_ty = info.ty;
                        if !assignable(target_ty, value_ty) {
                            self.diagnostics.push(Diagnostic::error(
                                DiagnosticKind::TypeMismatch,
                                format!(
                                    "cannot assign {value_ty} to '{name}' of type {target_ty}"
                                ),
                                value.span,
                            ));
                        } else if target_ty == Ty::Unknown && value_ty != Ty::Unknown {
                            if let Some(info) = self.lookup_mut(name) {
                                info.ty = value_ty;
                            }
                        }
                    }
                    // First assignment declares the name, inferring its
                    // type from the value.
                    None => self.declare(
                        name,
                        SymbolInfo {
                            kind: SymbolKind::Variable,
                            ty: value_ty,
                            container_size: None,
                        },
                        stmt.span,
                    ),
                }
            }
            StmtKind::IndexAssign { name, index, value } => {
                self.check_index(name, index, stmt.span);
                let value_ty = self.expr_type(value);
                if !value_ty.is_numeric() {
                    self.diagnostics.push(Diagnostic::error(
                        DiagnosticKind::TypeMismatch,
                        format!("container elements are numeric, cannot store {value_ty}"),
                        value.span,
                    ));
                }
            }
            StmtKind::AddInPlace { amount, target }
            | StmtKind::SubInPlace { amount, target } => {
                let amount_ty = self.expr_type(amount);
                if !amount_ty.is_numeric() {
                    self.diagnostics.push(Diagnostic::error(
                        DiagnosticKind::TypeMismatch,
                        format!("amount must be numeric, found {amount_ty}"),
                        amount.span,
                    ));
                }
                match self.lookup(target) {
                    Some(info) if !info.ty.is_numeric() => {
                        let ty = info.ty;
                        self.diagnostics.push(Diagnostic::error(
                            DiagnosticKind::TypeMismatch,
                            format!("'{target}' has type {ty}, expected a numeric variable"),
                            stmt.span,
                        ));
                    }
                    Some(_) => {}
                    None => self.undefined(target, stmt.span),
                }
            }
            StmtKind::Print { values } => {
                for value in values {
                    self.expr_type(value);
                }
            }
            StmtKind::Input { prompt: _, name, ty } => match ty {
                Some(declared) => self.declare(
                    name,
                    SymbolInfo {
                        kind: SymbolKind::Variable,
                        ty: *declared,
                        container_size: None,
                    },
                    stmt.span,
                ),
                None => {
                    if self.lookup(name).is_none() {
                        self.diagnostics.push(Diagnostic::error(
                            DiagnosticKind::UndefinedIdentifier,
                            format!(
                                "input target '{name}' is not declared; declare it or add 'as TYPE'"
                            ),
                            stmt.span,
                        ));
                    }
                }
            },
            StmtKind::Return { values } => {
                if self.fn_depth == 0 {
                    self.diagnostics.push(Diagnostic::error(
                        DiagnosticKind::ReturnOutsideFunction,
                        "'return' outside of a function",
                        stmt.span,
                    ));
                }
                for value in values {
                    self.expr_type(value);
                }
                if values.len() > 1 {
                    self.diagnostics.push(Diagnostic::warning(
                        DiagnosticKind::ArityMismatch,
                        format!(
                            "only the first return value is used; {} extra value(s) are ignored",
                            values.len() - 1
                        ),
                        stmt.span,
                    ));
                }
            }
            StmtKind::If {
                first,
                elifs,
                else_body,
            } => {
                self.condition(&first.cond);
                self.block(&first.body);
                for branch in elifs {
                    self.condition(&branch.cond);
                    self.block(&branch.body);
                }
                if let Some(body) = else_body {
                    self.block(body);
                }
            }
            StmtKind::While { cond, body } => {
                self.condition(cond);
                self.block(body);
            }
            StmtKind::For {
                var,
                from,
                to,
                body,
            } => {
                for bound in [from, to] {
                    let ty = self.expr_type(bound);
                    if !ty.is_numeric() {
                        self.diagnostics.push(Diagnostic::error(
                            DiagnosticKind::NonNumericLoopBound,
                            format!("loop bound must be numeric, found {ty}"),
                            bound.span,
                        ));
                    }
                }
                self.push_scope();
                self.declare(
                    var,
                    SymbolInfo {
                        kind: SymbolKind::Variable,
                        ty: Ty::Int,
                        container_size: None,
                    },
                    stmt.span,
                );
                for inner in body {
                    self.statement(inner);
                }
                self.pop_scope();
            }
            StmtKind::Call(call) => {
                self.resolve_call(call);
            }
        }
    }

    fn block(&mut self, body: &[Stmt]) {
        self.push_scope();
        for stmt in body {
            self.statement(stmt);
        }
        self.pop_scope();
    }

    fn condition(&mut self, cond: &Expr) {
        let ty = self.expr_type(cond);
        if !ty.is_logic() {
            self.diagnostics.push(Diagnostic::error(
                DiagnosticKind::TypeMismatch,
                format!("condition must be a logical value, found {ty}"),
                cond.span,
            ));
        }
    }

    // --- expressions ---

    fn expr_type(&mut self, expr: &Expr) -> Ty {
        match &expr.kind {
            ExprKind::Int(_) => Ty::Int,
            ExprKind::Float(_) => Ty::Float,
            ExprKind::Str(_) => Ty::Str,
            ExprKind::Var(name) => match self.lookup(name) {
                Some(info) => info.ty,
                None => {
                    self.undefined(name, expr.span);
                    Ty::Unknown
                }
            },
            ExprKind::Index { name, index } => {
                self.check_index(name, index, expr.span);
                // Container elements are numeric.
                Ty::Float
            }
            ExprKind::Unary { op, operand } => {
                let ty = self.expr_type(operand);
                match op {
                    UnOp::Pos | UnOp::Neg => {
                        if !ty.is_numeric() {
                            self.diagnostics.push(Diagnostic::error(
                                DiagnosticKind::TypeMismatch,
                                format!("unary sign needs a numeric operand, found {ty}"),
                                operand.span,
                            ));
                            return Ty::Unknown;
                        }
                        ty
                    }
                    UnOp::Not => {
                        if !ty.is_logic() {
                            self.diagnostics.push(Diagnostic::error(
                                DiagnosticKind::TypeMismatch,
                                format!("'not' needs a logical operand, found {ty}"),
                                operand.span,
                            ));
                        }
                        Ty::Bool
                    }
                }
            }
            ExprKind::Binary { op, left, right } => {
                let lt = self.expr_type(left);
                let rt = self.expr_type(right);
                self.binary_type(*op, lt, rt, expr.span)
            }
            ExprKind::Call(call) => {
                let ty = self.resolve_call(call);
                // In expression position the call must produce a value;
                // statement-position calls go through `statement` and may
                // be valueless.
                if self
                    .table
                    .functions
                    .get(&call.name)
                    .is_some_and(|sig| !sig.returns_value)
                {
                    self.diagnostics.push(Diagnostic::error(
                        DiagnosticKind::TypeMismatch,
                        format!(
                            "'{}' does not return a value and cannot be used in an expression",
                            call.name
                        ),
                        expr.span,
                    ));
                }
                ty
            }
        }
    }

    fn binary_type(&mut self, op: BinOp, lt: Ty, rt: Ty, span: Span) -> Ty {
        if op.is_arithmetic() {
            if !lt.is_numeric() || !rt.is_numeric() {
                self.diagnostics.push(Diagnostic::error(
                    DiagnosticKind::TypeMismatch,
                    format!("operator '{}' needs numeric operands, found {lt} and {rt}", op.symbol()),
                    span,
                ));
                return Ty::Unknown;
            }
            // Power always promotes to floating point.
            if op == BinOp::Pow {
                return Ty::Float;
            }
            return promote(lt, rt);
        }
        if op.is_ordering() {
            if !lt.is_numeric() || !rt.is_numeric() {
                self.diagnostics.push(Diagnostic::error(
                    DiagnosticKind::TypeMismatch,
                    format!("operator '{}' needs numeric operands, found {lt} and {rt}", op.symbol()),
                    span,
                ));
            }
            return Ty::Bool;
        }
        if op.is_equality() {
            let comparable = lt == Ty::Unknown
                || rt == Ty::Unknown
                || lt == rt
                || (lt.is_numeric() && rt.is_numeric());
            if !comparable {
                self.diagnostics.push(Diagnostic::error(
                    DiagnosticKind::TypeMismatch,
                    format!("cannot compare {lt} with {rt}"),
                    span,
                ));
            }
            return Ty::Bool;
        }
        // Logical operators.
        if !lt.is_logic() || !rt.is_logic() {
            self.diagnostics.push(Diagnostic::error(
                DiagnosticKind::TypeMismatch,
                format!("operator '{}' needs logical operands, found {lt} and {rt}", op.symbol()),
                span,
            ));
        }
        Ty::Bool
    }

    /// Validate an indexed access, bounds-checking literal indices
    /// against the recorded container size.
    fn check_index(&mut self, name: &str, index: &Expr, span: Span) {
        let index_ty = self.expr_type(index);
        if !index_ty.is_numeric() {
            self.diagnostics.push(Diagnostic::error(
                DiagnosticKind::TypeMismatch,
                format!("index must be numeric, found {index_ty}"),
                index.span,
            ));
        }
        let Some(info) = self.lookup(name) else {
            self.undefined(name, span);
            return;
        };
        if !info.ty.is_container() && info.ty != Ty::Unknown {
            let ty = info.ty;
            self.diagnostics.push(Diagnostic::error(
                DiagnosticKind::TypeMismatch,
                format!("'{name}' has type {ty} and cannot be indexed"),
                span,
            ));
            return;
        }
        if let (Some(size), Some(value)) = (info.container_size, index.literal_int()) {
            if value < 0 || value >= size {
                self.diagnostics.push(Diagnostic::error(
                    DiagnosticKind::OutOfBoundsIndex,
                    format!("index {value} is out of bounds for '{name}' of size {size}"),
                    index.span,
                ));
            }
        }
    }

    /// Match a call site against the resolved signature: named arguments
    /// bind by parameter name, then positional arguments fill the
    /// remaining slots left to right. Returns the call's value type.
    fn resolve_call(&mut self, call: &CallNode) -> Ty {
        let arg_types: Vec<Ty> = call
            .args
            .iter()
            .map(|arg| self.expr_type(&arg.value))
            .collect();
        let Some(sig) = self.table.functions.get(&call.name).cloned() else {
            self.diagnostics.push(Diagnostic::error(
                DiagnosticKind::UndefinedIdentifier,
                format!("function '{}' is not defined", call.name),
                call.span,
            ));
            return Ty::Unknown;
        };

        // Which argument (by index) fills each parameter slot.
        let mut filled: Vec<Option<usize>> = vec![None; sig.params.len()];
        for (idx, arg) in call.args.iter().enumerate() {
            let Some(arg_name) = arg.name.as_deref() else {
                continue;
            };
            let Some(slot) = sig.params.iter().position(|p| p.name == arg_name) else {
                self.diagnostics.push(Diagnostic::error(
                    DiagnosticKind::UnknownNamedArg,
                    format!("'{}' has no parameter named '{arg_name}'", call.name),
                    arg.span,
                ));
                continue;
            };
            if filled[slot].is_some() {
                self.diagnostics.push(Diagnostic::error(
                    DiagnosticKind::DuplicateArg,
                    format!("argument '{arg_name}' supplied more than once"),
                    arg.span,
                ));
                continue;
            }
            filled[slot] = Some(idx);
        }
        for (idx, arg) in call.args.iter().enumerate() {
            if arg.name.is_some() {
                continue;
            }
            match filled.iter().position(Option::is_none) {
                Some(slot) => filled[slot] = Some(idx),
                None => {
                    self.diagnostics.push(Diagnostic::error(
                        DiagnosticKind::ArityMismatch,
                        format!(
                            "'{}' takes {} argument(s), extra argument supplied",
                            call.name,
                            sig.params.len()
                        ),
                        arg.span,
                    ));
                }
            }
        }
        for (slot, param) in sig.params.iter().enumerate() {
            match filled[slot] {
                Some(idx) => {
                    let arg_ty = arg_types[idx];
                    if !assignable(param.ty, arg_ty) {
                        self.diagnostics.push(Diagnostic::error(
                            DiagnosticKind::TypeMismatch,
                            format!(
                                "argument '{}' expects {}, found {arg_ty}",
                                param.name, param.ty
                            ),
                            call.args[idx].value.span,
                        ));
                    }
                }
                None if param.has_default => {}
                None => {
                    self.diagnostics.push(Diagnostic::error(
                        DiagnosticKind::ArityMismatch,
                        format!(
                            "missing argument '{}' in call to '{}'",
                            param.name, call.name
                        ),
                        call.span,
                    ));
                }
            }
        }

        if sig.returns_value {
            Ty::Float
        } else {
            Ty::Unknown
        }
    }

    fn undefined(&mut self, name: &str, span: Span) {
        self.diagnostics.push(Diagnostic::error(
            DiagnosticKind::UndefinedIdentifier,
            format!("'{name}' is not defined"),
            span,
        ));
    }
}

/// Declared type of a parameter, falling back to the default value's
/// literal type, then to numeric (`Unknown` stays permissive).
fn param_type(param: &Param) -> Ty {
    if let Some(ty) = param.ty {
        return ty;
    }
    match param.default.as_ref().map(|e| &e.kind) {
        Some(ExprKind::Int(_)) => Ty::Int,
        Some(ExprKind::Float(_)) => Ty::Float,
        Some(ExprKind::Str(_)) => Ty::Str,
        _ => Ty::Unknown,
    }
}

fn body_returns_value(body: &[Stmt]) -> bool {
    body.iter().any(|stmt| match &stmt.kind {
        StmtKind::Return { values } => !values.is_empty(),
        StmtKind::If {
            first,
            elifs,
            else_body,
        } => {
            body_returns_value(&first.body)
                || elifs.iter().any(|b| body_returns_value(&b.body))
                || else_body.as_deref().is_some_and(body_returns_value)
        }
        StmtKind::While { body, .. } | StmtKind::For { body, .. } => body_returns_value(body),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use crate::parser::parse;

    fn analyze_source(source: &str) -> Analysis {
        let parsed = parse(lex(source).tokens);
        assert!(
            parsed.diagnostics.is_empty(),
            "unexpected parse diagnostics: {:?}",
            parsed.diagnostics
        );
        analyze(&parsed.program)
    }

    fn kinds(analysis: &Analysis) -> Vec<DiagnosticKind> {
        analysis.diagnostics.iter().map(|d| d.kind).collect()
    }

    #[test]
    fn clean_program_has_no_diagnostics() {
        let analysis = analyze_source("set x to 10\nset y to 5\nset sum to add x and y");
        assert!(analysis.diagnostics.is_empty());
        let sum = analysis.symbols.lookup(0, "sum").unwrap();
        assert_eq!(sum.ty, Ty::Int);
    }

    #[test]
    fn undefined_variable_is_reported_once() {
        let analysis = analyze_source("print ghost");
        assert_eq!(kinds(&analysis), vec![DiagnosticKind::UndefinedIdentifier]);
    }

    #[test]
    fn redeclaration_in_same_scope() {
        let analysis = analyze_source("make x as int\nmake x as float");
        assert_eq!(kinds(&analysis), vec![DiagnosticKind::Redeclaration]);
    }

    #[test]
    fn shadowing_in_nested_block_is_allowed() {
        let analysis = analyze_source(
            "make x as int\nif 1 then\n make x as float\n print x\nend if",
        );
        assert!(analysis.diagnostics.is_empty());
    }

    #[test]
    fn literal_index_bounds_are_checked() {
        let analysis = analyze_source("make nums as list of size 3\nset nums[5] to 1");
        assert_eq!(kinds(&analysis), vec![DiagnosticKind::OutOfBoundsIndex]);
        assert!(analysis.diagnostics[0].message.contains("index 5"));
        assert!(analysis.diagnostics[0].message.contains("size 3"));
    }

    #[test]
    fn negative_literal_index_is_out_of_bounds() {
        let analysis = analyze_source("make nums as list of size 3\nprint nums[-1]");
        assert_eq!(kinds(&analysis), vec![DiagnosticKind::OutOfBoundsIndex]);
    }

    #[test]
    fn in_range_and_non_literal_indices_pass() {
        let analysis = analyze_source(
            "make nums as list of size 3\nset i to 9\nset nums[2] to 1\nset nums[i] to 1",
        );
        assert!(analysis.diagnostics.is_empty());
    }

    #[test]
    fn container_declaration_requires_a_size() {
        let analysis = analyze_source("make nums as list");
        assert_eq!(kinds(&analysis), vec![DiagnosticKind::TypeMismatch]);
        assert!(analysis.diagnostics[0].message.contains("of size"));
    }

    #[test]
    fn valueless_call_in_expression_position_is_a_type_mismatch() {
        let analysis = analyze_source(
            "function hello ()\n print \"hi\"\nend function\nset x to call \"hello\" with arguments:()",
        );
        assert_eq!(kinds(&analysis), vec![DiagnosticKind::TypeMismatch]);
    }

    #[test]
    fn valueless_call_in_statement_position_is_fine() {
        let analysis = analyze_source(
            "function hello ()\n print \"hi\"\nend function\ncall \"hello\" with arguments:()",
        );
        assert!(analysis.diagnostics.is_empty());
    }

    #[test]
    fn container_size_must_be_a_literal() {
        let analysis = analyze_source("set n to 3\nmake nums as list of size n");
        assert_eq!(kinds(&analysis), vec![DiagnosticKind::TypeMismatch]);
    }

    #[test]
    fn string_arithmetic_is_a_type_mismatch() {
        let analysis = analyze_source("set s to \"hi\"\nset x to s + 1");
        assert_eq!(kinds(&analysis), vec![DiagnosticKind::TypeMismatch]);
    }

    #[test]
    fn int_float_arithmetic_promotes_without_diagnostics() {
        let analysis = analyze_source("set x to 1\nset y to 2.5\nset z to x * y");
        assert!(analysis.diagnostics.is_empty());
        assert_eq!(analysis.symbols.lookup(0, "z").unwrap().ty, Ty::Float);
    }

    #[test]
    fn power_result_is_float() {
        let analysis = analyze_source("set x to 2 ^ 3");
        assert!(analysis.diagnostics.is_empty());
        assert_eq!(analysis.symbols.lookup(0, "x").unwrap().ty, Ty::Float);
    }

    #[test]
    fn non_numeric_loop_bound_is_reported() {
        let analysis =
            analyze_source("set s to \"hi\"\nfor i from 1 to s do\n print i\nend for");
        assert_eq!(kinds(&analysis), vec![DiagnosticKind::NonNumericLoopBound]);
    }

    #[test]
    fn return_outside_function_flags_top_level_only() {
        let analysis = analyze_source(
            "function f ()\n return 1\nend function\nreturn 2",
        );
        assert_eq!(kinds(&analysis), vec![DiagnosticKind::ReturnOutsideFunction]);
    }

    #[test]
    fn named_arguments_resolve_cleanly() {
        let analysis = analyze_source(
            "function sum_up (a, b)\n return a + b\nend function\ncall \"sum_up\" with arguments:(a = 3, b = 4)",
        );
        assert!(analysis.diagnostics.is_empty());
    }

    #[test]
    fn unknown_named_arg_reported_exactly_once() {
        let analysis = analyze_source(
            "function f (a)\n return a\nend function\ncall \"f\" with arguments:(c = 1, a = 2)",
        );
        assert_eq!(kinds(&analysis), vec![DiagnosticKind::UnknownNamedArg]);
    }

    #[test]
    fn duplicate_named_arg_reported_exactly_once() {
        let analysis = analyze_source(
            "function f (a)\n return a\nend function\ncall \"f\" with arguments:(a = 1, a = 2)",
        );
        assert_eq!(kinds(&analysis), vec![DiagnosticKind::DuplicateArg]);
    }

    #[test]
    fn missing_required_argument_is_arity_error() {
        let analysis = analyze_source(
            "function f (a, b)\n return a\nend function\ncall \"f\" with arguments:(1)",
        );
        assert_eq!(kinds(&analysis), vec![DiagnosticKind::ArityMismatch]);
    }

    #[test]
    fn default_fills_missing_argument() {
        let analysis = analyze_source(
            "function f (a, b = 4)\n return a + b\nend function\ncall \"f\" with arguments:(1)",
        );
        assert!(analysis.diagnostics.is_empty());
    }

    #[test]
    fn call_to_undefined_function() {
        let analysis = analyze_source("call \"unknown_fn\" with arguments:()");
        assert_eq!(kinds(&analysis), vec![DiagnosticKind::UndefinedIdentifier]);
    }

    #[test]
    fn extra_return_values_warn_but_are_not_errors() {
        let analysis = analyze_source(
            "function f ()\n return 1, 2\nend function",
        );
        assert_eq!(kinds(&analysis), vec![DiagnosticKind::ArityMismatch]);
        assert!(!analysis.diagnostics[0].is_error());
    }

    #[test]
    fn input_needs_declaration_or_inline_type() {
        let analysis = analyze_source("input \"age? \" age");
        assert_eq!(kinds(&analysis), vec![DiagnosticKind::UndefinedIdentifier]);
        let analysis = analyze_source("input \"age? \" age as int");
        assert!(analysis.diagnostics.is_empty());
    }

    #[test]
    fn analysis_never_halts_on_errors() {
        let analysis = analyze_source("print ghost\nset s to \"x\" + 1\nreturn 1");
        assert!(analysis.diagnostics.len() >= 3);
    }

    #[test]
    fn symbol_table_is_published_despite_errors() {
        let analysis = analyze_source("make nums as list of size 3\nprint ghost");
        assert!(!analysis.diagnostics.is_empty());
        let nums = analysis.symbols.lookup(0, "nums").unwrap();
        assert_eq!(nums.container_size, Some(3));
    }

    #[test]
    fn function_calls_resolve_before_definition_order() {
        let analysis = analyze_source(
            "call \"later\" with arguments:()\nfunction later ()\n print 1\nend function",
        );
        assert!(analysis.diagnostics.is_empty());
    }
}
