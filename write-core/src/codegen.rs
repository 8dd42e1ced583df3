//! C++ code generation.
//!
//! `generate` is only invoked once the diagnostics list is free of
//! error-severity entries, so it assumes a well-formed program: every
//! call resolves, every container has a literal size. It is
//! deterministic and idempotent; the same program and symbol table
//! always yield byte-identical text.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::ast::{
    BinOp, CallNode, Expr, ExprKind, FunctionDef, Param, Program, Stmt, StmtKind, UnOp,
};
use crate::symbols::SymbolTable;
use crate::types::Ty;

pub fn generate(program: &Program, symbols: &SymbolTable) -> String {
    let mut generator = Generator {
        symbols,
        functions: &program.functions,
        out: String::new(),
        indent: 0,
        env: vec![BTreeMap::new()],
    };
    generator.run(program);
    generator.out
}

/// What the generator tracks per variable: enough to tell a first
/// assignment (which declares) from a reassignment, and to render
/// container values in `print`.
#[derive(Debug, Clone)]
struct VarSlot {
    size: Option<i64>,
}

struct Generator<'a> {
    symbols: &'a SymbolTable,
    functions: &'a [FunctionDef],
    out: String,
    indent: usize,
    env: Vec<BTreeMap<String, VarSlot>>,
}

impl Generator<'_> {
    fn run(&mut self, program: &Program) {
        self.line("#include <iostream>");
        self.line("#include <cmath>");
        self.line("#include <string>");
        if self.uses_containers() {
            self.line("#include <array>");
        }
        self.line("using namespace std;");
        self.line("");
        for func in &program.functions {
            self.function(func);
            self.line("");
        }
        self.line("int main() {");
        self.indent += 1;
        self.env.push(BTreeMap::new());
        for stmt in &program.statements {
            self.statement(stmt);
        }
        self.env.pop();
        self.line("return 0;");
        self.indent -= 1;
        self.line("}");
    }

    fn uses_containers(&self) -> bool {
        self.symbols
            .symbols
            .values()
            .any(|info| info.ty.is_container())
    }

    fn function(&mut self, func: &FunctionDef) {
        let sig = self.symbols.function(&func.name);
        let returns_value = sig.is_some_and(|s| s.returns_value);
        let ret = if returns_value { "double" } else { "void" };
        let params: Vec<String> = func.params.iter().map(|p| self.param(p)).collect();
        self.line(&format!("{ret} {}({}) {{", func.name, params.join(", ")));
        self.indent += 1;
        self.env.push(BTreeMap::new());
        for param in &func.params {
            self.bind(&param.name, None);
        }
        for stmt in &func.body {
            self.statement(stmt);
        }
        self.env.pop();
        self.indent -= 1;
        self.line("}");
    }

    fn param(&self, param: &Param) -> String {
        let ty = param
            .ty
            .map(cpp_type)
            // Untyped parameters are numeric.
            .unwrap_or("double");
        let mut text = format!("{ty} {}", param.name);
        if let Some(default) = &param.default {
            let _ = write!(text, " = {}", self.expr(default));
        }
        text
    }

    // --- statements ---

    fn statement(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Declaration { name, ty, size } => {
                match (ty, size.as_ref().and_then(Expr::literal_int)) {
                    (Some(ty), Some(n)) if ty.is_container() => {
                        self.line(&format!("array<double, {n}> {name};"));
                        self.bind(name, Some(n));
                    }
                    (Some(ty), _) => {
                        self.line(&format!("{} {name};", cpp_type(*ty)));
                        self.bind(name, None);
                    }
                    (None, _) => {
                        self.line(&format!("double {name};"));
                        self.bind(name, None);
                    }
                }
            }
            StmtKind::Assign { name, ty, value } => {
                let rhs = self.expr(value);
                if let Some(ty) = ty {
                    self.line(&format!("{} {name} = {rhs};", cpp_type(*ty)));
                    self.bind(name, None);
                } else if self.slot(name).is_some() {
                    self.line(&format!("{name} = {rhs};"));
                } else {
                    // First assignment declares; the value's type stands in
                    // for a declaration.
                    self.line(&format!("auto {name} = {rhs};"));
                    self.bind(name, None);
                }
            }
            StmtKind::IndexAssign { name, index, value } => {
                let idx = self.index_expr(index);
                let rhs = self.expr(value);
                self.line(&format!("{name}[{idx}] = {rhs};"));
            }
            StmtKind::AddInPlace { amount, target } => {
                let amount = self.expr(amount);
                self.line(&format!("{target} += {amount};"));
            }
            StmtKind::SubInPlace { amount, target } => {
                let amount = self.expr(amount);
                self.line(&format!("{target} -= {amount};"));
            }
            StmtKind::Print { values } => self.print(values),
            StmtKind::Input { prompt, name, ty } => {
                if let Some(prompt) = prompt {
                    self.line(&format!("cout << \"{prompt}\";"));
                }
                if let Some(ty) = ty {
                    self.line(&format!("{} {name};", cpp_type(*ty)));
                    self.bind(name, None);
                }
                self.line(&format!("cin >> {name};"));
            }
            StmtKind::Return { values } => match values.first() {
                Some(value) => {
                    let value = self.expr(value);
                    self.line(&format!("return {value};"));
                }
                None => self.line("return;"),
            },
            StmtKind::If {
                first,
                elifs,
                else_body,
            } => {
                let cond = self.expr(&first.cond);
                self.line(&format!("if ({cond}) {{"));
                self.body(&first.body);
                for branch in elifs {
                    let cond = self.expr(&branch.cond);
                    self.line(&format!("}} else if ({cond}) {{"));
                    self.body(&branch.body);
                }
                if let Some(body) = else_body {
                    self.line("} else {");
                    self.body(body);
                }
                self.line("}");
            }
            StmtKind::While { cond, body } => {
                let cond = self.expr(cond);
                self.line(&format!("while ({cond}) {{"));
                self.body(body);
                self.line("}");
            }
            StmtKind::For {
                var,
                from,
                to,
                body,
            } => {
                let from = self.expr(from);
                let to = self.expr(to);
                // Inclusive upper bound.
                self.line(&format!("for (int {var} = {from}; {var} <= {to}; ++{var}) {{"));
                self.env.push(BTreeMap::new());
                self.bind(var, None);
                self.indent += 1;
                for inner in body {
                    self.statement(inner);
                }
                self.indent -= 1;
                self.env.pop();
                self.line("}");
            }
            StmtKind::Call(call) => {
                let call = self.call(call);
                self.line(&format!("{call};"));
            }
        }
    }

    fn body(&mut self, body: &[Stmt]) {
        self.env.push(BTreeMap::new());
        self.indent += 1;
        for stmt in body {
            self.statement(stmt);
        }
        self.indent -= 1;
        self.env.pop();
    }

    /// One `cout` chain with a single trailing `endl`. A container value
    /// interrupts the chain with an index loop rendering `[e0, e1, ...]`,
    /// then the chain resumes.
    fn print(&mut self, values: &[Expr]) {
        let mut chain = String::from("cout");
        for value in values {
            if let ExprKind::Var(name) = &value.kind {
                if let Some(size) = self.slot(name).and_then(|slot| slot.size) {
                    let _ = write!(chain, " << \"[\";");
                    self.line(&chain);
                    self.line(&format!("for (int idx = 0; idx < {size}; ++idx) {{"));
                    self.indent += 1;
                    self.line(&format!("cout << {name}[idx];"));
                    self.line(&format!("if (idx + 1 < {size}) cout << \", \";"));
                    self.indent -= 1;
                    self.line("}");
                    chain = String::from("cout << \"]\"");
                    continue;
                }
            }
            let _ = write!(chain, " << {}", self.expr(value));
        }
        chain.push_str(" << endl;");
        self.line(&chain);
    }

    // --- expressions ---

    fn expr(&self, expr: &Expr) -> String {
        match &expr.kind {
            ExprKind::Int(v) => v.to_string(),
            ExprKind::Float(v) => format!("{v:?}"),
            ExprKind::Str(text) => format!("\"{text}\""),
            ExprKind::Var(name) => name.clone(),
            ExprKind::Index { name, index } => {
                format!("{name}[{}]", self.index_expr(index))
            }
            ExprKind::Unary { op, operand } => {
                let symbol = match op {
                    UnOp::Pos => "+",
                    UnOp::Neg => "-",
                    UnOp::Not => "!",
                };
                format!("{symbol}{}", self.operand(operand))
            }
            ExprKind::Binary { op, left, right } => {
                if *op == BinOp::Pow {
                    return format!("pow({}, {})", self.expr(left), self.expr(right));
                }
                let symbol = match op {
                    BinOp::And => "&&",
                    BinOp::Or => "||",
                    _ => op.symbol(),
                };
                format!("{} {symbol} {}", self.operand(left), self.operand(right))
            }
            ExprKind::Call(call) => self.call(call),
        }
    }

    /// Operand of a unary or binary operator; nested operator
    /// expressions are parenthesized so the emitted text keeps the
    /// parsed grouping regardless of C++ precedence.
    fn operand(&self, expr: &Expr) -> String {
        match &expr.kind {
            ExprKind::Binary { op, .. } if *op != BinOp::Pow => {
                format!("({})", self.expr(expr))
            }
            ExprKind::Unary { .. } => format!("({})", self.expr(expr)),
            _ => self.expr(expr),
        }
    }

    /// Container subscript. A literal index is emitted as written; any
    /// other expression is cast, since container arithmetic is done in
    /// doubles.
    fn index_expr(&self, index: &Expr) -> String {
        match index.literal_int() {
            Some(value) => value.to_string(),
            None => format!("(int)({})", self.expr(index)),
        }
    }

    /// Render a call with every argument in positional order, named
    /// arguments rewritten to their parameter's slot and absent
    /// defaulted parameters filled from the definition.
    fn call(&self, call: &CallNode) -> String {
        let Some(sig) = self.symbols.function(&call.name) else {
            // Unresolvable calls never reach codegen; emit as written.
            let args: Vec<String> = call.args.iter().map(|a| self.expr(&a.value)).collect();
            return format!("{}({})", call.name, args.join(", "));
        };
        let mut slots: Vec<Option<String>> = vec![None; sig.params.len()];
        for arg in &call.args {
            if let Some(name) = &arg.name {
                if let Some(slot) = sig.params.iter().position(|p| &p.name == name) {
                    slots[slot] = Some(self.expr(&arg.value));
                }
            }
        }
        for arg in &call.args {
            if arg.name.is_none() {
                if let Some(slot) = slots.iter().position(Option::is_none) {
                    slots[slot] = Some(self.expr(&arg.value));
                }
            }
        }
        let defaults = self
            .functions
            .iter()
            .find(|f| f.name == call.name)
            .map(|f| f.params.as_slice())
            .unwrap_or_default();
        let args: Vec<String> = slots
            .into_iter()
            .enumerate()
            .map(|(slot, filled)| match filled {
                Some(text) => text,
                None => defaults
                    .get(slot)
                    .and_then(|p| p.default.as_ref())
                    .map(|d| self.expr(d))
                    .unwrap_or_default(),
            })
            .collect();
        format!("{}({})", call.name, args.join(", "))
    }

    // --- environment and output ---

    fn bind(&mut self, name: &str, size: Option<i64>) {
        self.env
            .last_mut()
            .unwrap()
            .insert(name.to_string(), VarSlot { size });
    }

    fn slot(&self, name: &str) -> Option<&VarSlot> {
        self.env
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
    }

    fn line(&mut self, text: &str) {
        if text.is_empty() {
            self.out.push('\n');
            return;
        }
        for _ in 0..self.indent {
            self.out.push_str("    ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }
}

fn cpp_type(ty: Ty) -> &'static str {
    match ty {
        Ty::Int => "int",
        Ty::Float => "float",
        Ty::Str => "string",
        Ty::Bool => "bool",
        // Containers are declared through their sized form; this arm is
        // for completeness only.
        Ty::List | Ty::Array => "auto",
        Ty::Unknown => "double",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use crate::parser::parse;
    use crate::semantic::analyze;

    fn generate_source(source: &str) -> String {
        let parsed = parse(lex(source).tokens);
        assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
        let analysis = analyze(&parsed.program);
        assert!(
            analysis.diagnostics.iter().all(|d| !d.is_error()),
            "{:?}",
            analysis.diagnostics
        );
        generate(&parsed.program, &analysis.symbols)
    }

    #[test]
    fn straight_line_assignments() {
        let code = generate_source("set x to 10\nset y to 5\nset sum to add x and y");
        assert!(code.contains("auto x = 10;"));
        assert!(code.contains("auto y = 5;"));
        assert!(code.contains("auto sum = x + y;"));
        assert!(code.contains("int main()"));
        assert!(code.contains("return 0;"));
    }

    #[test]
    fn generation_is_idempotent() {
        let source = "make nums as list of size 3\nset nums[0] to 1\nprint nums";
        let first = generate_source(source);
        let second = generate_source(source);
        assert_eq!(first, second);
    }

    #[test]
    fn reassignment_does_not_redeclare() {
        let code = generate_source("set x to 1\nset x to 2");
        assert!(code.contains("auto x = 1;"));
        assert!(code.contains("\n    x = 2;"));
    }

    #[test]
    fn typed_assignment_uses_declared_type() {
        let code = generate_source("set x: int to 5");
        assert!(code.contains("int x = 5;"));
    }

    #[test]
    fn container_declares_sized_array_and_pulls_in_the_header() {
        let code = generate_source("make nums as list of size 3");
        assert!(code.contains("#include <array>"));
        assert!(code.contains("array<double, 3> nums;"));
    }

    #[test]
    fn array_header_is_omitted_without_containers() {
        let code = generate_source("set x to 1");
        assert!(!code.contains("#include <array>"));
    }

    #[test]
    fn for_loop_upper_bound_is_inclusive() {
        let code = generate_source("for i from 1 to 5 do\n print i\nend for");
        assert!(code.contains("for (int i = 1; i <= 5; ++i) {"));
    }

    #[test]
    fn power_maps_to_pow() {
        let code = generate_source("set x to 2 ^ 3");
        assert!(code.contains("pow(2, 3)"));
    }

    #[test]
    fn phrase_power_matches_symbolic_power() {
        let a = generate_source("set x to power 2 and 3");
        let b = generate_source("set x to 2 ^ 3");
        assert_eq!(a, b);
    }

    #[test]
    fn print_chain_has_one_endl() {
        let code = generate_source("set x to 1\nprint \"x = \", x");
        assert!(code.contains("cout << \"x = \" << x << endl;"));
    }

    #[test]
    fn container_print_renders_bracketed_elements() {
        let code = generate_source("make nums as list of size 2\nprint nums");
        assert!(code.contains("cout << \"[\";"));
        assert!(code.contains("for (int idx = 0; idx < 2; ++idx) {"));
        assert!(code.contains("cout << nums[idx];"));
        assert!(code.contains("cout << \"]\" << endl;"));
    }

    #[test]
    fn named_arguments_are_rewritten_to_positional_order() {
        let code = generate_source(
            "function sum_up (a, b)\n return a + b\nend function\ncall \"sum_up\" with arguments:(b = 4, a = 3)",
        );
        assert!(code.contains("sum_up(3, 4);"));
    }

    #[test]
    fn omitted_defaulted_argument_is_filled_from_the_definition() {
        let code = generate_source(
            "function f (a, b = 4)\n return a + b\nend function\ncall \"f\" with arguments:(1)",
        );
        assert!(code.contains("double f(double a, double b = 4) {"));
        assert!(code.contains("f(1, 4);"));
    }

    #[test]
    fn valueless_function_is_void() {
        let code = generate_source("function hello ()\n print \"hi\"\nend function");
        assert!(code.contains("void hello() {"));
    }

    #[test]
    fn functions_are_emitted_before_main() {
        let code = generate_source(
            "function f ()\n print 1\nend function\ncall \"f\" with arguments:()",
        );
        let func_at = code.find("void f()").unwrap();
        let main_at = code.find("int main()").unwrap();
        assert!(func_at < main_at);
    }

    #[test]
    fn input_with_inline_type_declares_first() {
        let code = generate_source("input \"age? \" age as int");
        assert!(code.contains("cout << \"age? \";"));
        assert!(code.contains("int age;"));
        assert!(code.contains("cin >> age;"));
    }

    #[test]
    fn in_place_updates_use_compound_assignment() {
        let code = generate_source("set x to 1\nadd 6 to x\nsub 2 from x");
        assert!(code.contains("x += 6;"));
        assert!(code.contains("x -= 2;"));
    }

    #[test]
    fn if_elif_else_chain() {
        let code = generate_source(
            "set x to 1\nif x > 1 then\n print 1\nelse if x > 0 then\n print 2\nelse\n print 3\nend if",
        );
        assert!(code.contains("if (x > 1) {"));
        assert!(code.contains("} else if (x > 0) {"));
        assert!(code.contains("} else {"));
    }

    #[test]
    fn nested_grouping_is_preserved_with_parentheses() {
        let code = generate_source("set x to 2 * 3 + 4");
        assert!(code.contains("(2 * 3) + 4"));
    }

    #[test]
    fn float_literals_keep_a_decimal_point() {
        let code = generate_source("set x to 1.0\nset y to 2.5");
        assert!(code.contains("auto x = 1.0;"));
        assert!(code.contains("auto y = 2.5;"));
    }

    #[test]
    fn variable_index_is_cast_to_int() {
        let code = generate_source(
            "make nums as list of size 3\nfor i from 0 to 2 do\n set nums[i] to i\nend for",
        );
        assert!(code.contains("nums[(int)(i)] = i;"));
    }
}
