//! Recursive-descent parser for the Write language.
//!
//! One method per grammar production, with precedence climbing for
//! expressions (high to low: parentheses; unary `+ - not !`; power,
//! right-associative; `* /`; `+ -`; relational/equality; `and`; `or`).
//! English phrase operators are normalized to the same `BinOp`/`UnOp`
//! tags as their symbolic spellings while parsing.
//!
//! On a syntax error the parser records a diagnostic at the unexpected
//! token and recovers by skipping to a synchronizing token (a statement
//! start, a block terminator, or end of input), so a single pass can
//! report several independent errors.

use crate::ast::{
    BinOp, CallArg, CallNode, Expr, ExprKind, FunctionDef, IfBranch, Param, Program, Stmt,
    StmtKind, UnOp,
};
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::lexer::{Token, TokenKind};
use crate::span::Span;
use crate::types::Ty;

/// Result of parsing a token stream. The program is always produced;
/// after an error it contains whatever was recovered.
#[derive(Debug)]
pub struct ParseResult {
    pub program: Program,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse a token stream (as produced by `lexer::lex`) into a program.
/// An empty stream is treated as an immediate end of input.
pub fn parse(mut tokens: Vec<Token>) -> ParseResult {
    if tokens.is_empty() {
        tokens.push(Token {
            kind: TokenKind::Eof,
            lexeme: String::new(),
            span: Span::new(1, 1),
        });
    }
    let parser = Parser {
        tokens,
        pos: 0,
        diagnostics: Vec::new(),
    };
    parser.run()
}

/// Marker for "a syntax diagnostic was already recorded"; the caller
/// synchronizes and keeps going.
struct Interrupt;

type PResult<T> = Result<T, Interrupt>;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    diagnostics: Vec<Diagnostic>,
}

impl Parser {
    fn run(mut self) -> ParseResult {
        let mut program = Program::default();
        while !self.at_end() {
            if self.check(TokenKind::Function) || self.check(TokenKind::Func) {
                match self.function_def() {
                    Ok(func) => program.functions.push(func),
                    Err(_) => self.synchronize(),
                }
            } else {
                match self.statement() {
                    Ok(stmt) => program.statements.push(stmt),
                    Err(_) => self.synchronize(),
                }
            }
        }
        ParseResult {
            program,
            diagnostics: self.diagnostics,
        }
    }

    /// Skip tokens until the next plausible statement boundary.
    fn synchronize(&mut self) {
        if !self.at_end() {
            self.advance();
        }
        while !self.at_end() && !is_sync_point(self.peek().kind) {
            self.advance();
        }
    }

    // --- statements ---

    fn statement(&mut self) -> PResult<Stmt> {
        let span = self.peek().span;
        match self.peek().kind {
            TokenKind::Make => self.make_statement(),
            TokenKind::Set => self.set_statement(),
            TokenKind::Print => self.print_statement(),
            TokenKind::Input => self.input_statement(),
            TokenKind::Return => {
                self.advance();
                self.return_statement(span)
            }
            TokenKind::If => self.if_statement(),
            TokenKind::While => self.while_statement(),
            TokenKind::For => self.for_statement(),
            TokenKind::Call => {
                self.advance();
                let call = self.call_tail(span)?;
                Ok(Stmt {
                    kind: StmtKind::Call(call),
                    span,
                })
            }
            TokenKind::Add => {
                self.advance();
                let amount = self.expression()?;
                self.expect(TokenKind::To, "expected 'to' after amount")?;
                let target = self.expect_ident("expected target variable after 'to'")?;
                Ok(Stmt {
                    kind: StmtKind::AddInPlace {
                        amount,
                        target: target.lexeme,
                    },
                    span,
                })
            }
            TokenKind::Sub | TokenKind::Subtract => {
                self.advance();
                let amount = self.expression()?;
                self.expect(TokenKind::From, "expected 'from' after amount")?;
                let target = self.expect_ident("expected target variable after 'from'")?;
                Ok(Stmt {
                    kind: StmtKind::SubInPlace {
                        amount,
                        target: target.lexeme,
                    },
                    span,
                })
            }
            _ => {
                let tok = self.peek().clone();
                self.error(
                    format!("unexpected token '{}', expected a statement", describe(&tok)),
                    tok.span,
                );
                Err(Interrupt)
            }
        }
    }

    fn make_statement(&mut self) -> PResult<Stmt> {
        let span = self.advance().span; // 'make'
        let name = self.expect_ident("expected identifier after 'make'")?;
        let mut ty = None;
        let mut size = None;
        if self.matches(TokenKind::As) {
            let declared = self.type_name()?;
            ty = Some(declared);
            if declared.is_container() && self.matches(TokenKind::Of) {
                self.expect(TokenKind::Size, "expected 'size' after 'of'")?;
                size = Some(self.expression()?);
            }
        }
        Ok(Stmt {
            kind: StmtKind::Declaration {
                name: name.lexeme,
                ty,
                size,
            },
            span,
        })
    }

    fn set_statement(&mut self) -> PResult<Stmt> {
        let span = self.advance().span; // 'set'

        // "set return to EXPR" is sugar for a return statement.
        if self.check(TokenKind::Return) {
            self.advance();
            self.expect(TokenKind::To, "expected 'to' after 'set return'")?;
            return self.return_statement(span);
        }

        let name = self.expect_ident("expected identifier after 'set'")?;

        if self.matches(TokenKind::LBracket) {
            let index = self.expression()?;
            self.expect(TokenKind::RBracket, "expected ']' after index")?;
            self.expect(TokenKind::To, "expected 'to' in assignment")?;
            let value = self.expression()?;
            return Ok(Stmt {
                kind: StmtKind::IndexAssign {
                    name: name.lexeme,
                    index,
                    value,
                },
                span,
            });
        }

        let mut ty = None;
        if self.matches(TokenKind::Colon) {
            ty = Some(self.type_name()?);
        }
        self.expect(TokenKind::To, "expected 'to' in assignment")?;
        let value = self.assignment_rhs()?;
        Ok(Stmt {
            kind: StmtKind::Assign {
                name: name.lexeme,
                ty,
                value,
            },
            span,
        })
    }

    /// Right-hand side of `set ... to`. Supports the phrase forms
    /// `add EXPR to NAME` / `sub EXPR from NAME` as a whole-RHS spelling
    /// of `NAME + EXPR` / `NAME - EXPR`, falling back to an ordinary
    /// expression (so `add 1 and 2` still parses as the binary phrase).
    fn assignment_rhs(&mut self) -> PResult<Expr> {
        if self.check(TokenKind::Add) {
            if let Some(expr) = self.try_inplace_rhs(TokenKind::To, BinOp::Add) {
                return Ok(expr);
            }
        }
        if self.check(TokenKind::Sub) || self.check(TokenKind::Subtract) {
            if let Some(expr) = self.try_inplace_rhs(TokenKind::From, BinOp::Sub) {
                return Ok(expr);
            }
        }
        self.expression()
    }

    fn try_inplace_rhs(&mut self, link: TokenKind, op: BinOp) -> Option<Expr> {
        let save_pos = self.pos;
        let save_diags = self.diagnostics.len();
        self.advance(); // 'add' / 'sub' / 'subtract'
        let attempt = (|| -> PResult<Option<Expr>> {
            let amount = self.expression()?;
            if !self.matches(link) {
                return Ok(None);
            }
            let target = self.expect_ident("expected target variable")?;
            let target_expr = Expr {
                kind: ExprKind::Var(target.lexeme),
                span: target.span,
            };
            Ok(Some(Expr {
                span: target_expr.span,
                kind: ExprKind::Binary {
                    op,
                    left: Box::new(target_expr),
                    right: Box::new(amount),
                },
            }))
        })();
        match attempt {
            Ok(Some(expr)) => Some(expr),
            _ => {
                self.pos = save_pos;
                self.diagnostics.truncate(save_diags);
                None
            }
        }
    }

    fn print_statement(&mut self) -> PResult<Stmt> {
        let span = self.advance().span; // 'print'
        let mut values = vec![self.expression()?];
        loop {
            if self.matches(TokenKind::Comma) {
                values.push(self.expression()?);
                continue;
            }
            if self.at_expr_start() {
                values.push(self.expression()?);
                continue;
            }
            break;
        }
        Ok(Stmt {
            kind: StmtKind::Print { values },
            span,
        })
    }

    fn input_statement(&mut self) -> PResult<Stmt> {
        let span = self.advance().span; // 'input'
        let mut prompt = None;
        if self.check(TokenKind::Str) {
            prompt = Some(self.advance().lexeme);
        }
        let name = self.expect_ident("expected identifier after 'input'")?;
        let mut ty = None;
        if self.matches(TokenKind::As) {
            ty = Some(self.type_name()?);
        }
        Ok(Stmt {
            kind: StmtKind::Input {
                prompt,
                name: name.lexeme,
                ty,
            },
            span,
        })
    }

    fn return_statement(&mut self, span: Span) -> PResult<Stmt> {
        let mut values = Vec::new();
        if self.at_expr_start() {
            values.push(self.expression()?);
            loop {
                if self.matches(TokenKind::Comma) {
                    values.push(self.expression()?);
                    continue;
                }
                if self.at_expr_start() {
                    values.push(self.expression()?);
                    continue;
                }
                break;
            }
        }
        Ok(Stmt {
            kind: StmtKind::Return { values },
            span,
        })
    }

    fn if_statement(&mut self) -> PResult<Stmt> {
        let span = self.advance().span; // 'if'
        let cond = self.expression()?;
        self.expect(TokenKind::Then, "expected 'then' after if condition")?;
        let body = self.block_until(|p| {
            p.check(TokenKind::Else) || p.check_end_of(TokenKind::If)
        });
        let first = IfBranch { cond, body };

        let mut elifs = Vec::new();
        let mut else_body = None;
        loop {
            if self.check(TokenKind::Else) && self.check_next(TokenKind::If) {
                self.advance(); // 'else'
                self.advance(); // 'if'
                let cond = self.expression()?;
                self.expect(TokenKind::Then, "expected 'then' after else if condition")?;
                let body = self.block_until(|p| {
                    p.check(TokenKind::Else) || p.check_end_of(TokenKind::If)
                });
                elifs.push(IfBranch { cond, body });
                continue;
            }
            if self.matches(TokenKind::Else) {
                else_body = Some(self.block_until(|p| p.check_end_of(TokenKind::If)));
            }
            break;
        }

        self.expect_block_end(TokenKind::If, "if")?;
        Ok(Stmt {
            kind: StmtKind::If {
                first,
                elifs,
                else_body,
            },
            span,
        })
    }

    fn while_statement(&mut self) -> PResult<Stmt> {
        let span = self.advance().span; // 'while'
        let cond = self.expression()?;
        self.expect(TokenKind::Do, "expected 'do' after while condition")?;
        let body = self.block_until(|p| p.check_end_of(TokenKind::While));
        self.expect_block_end(TokenKind::While, "while")?;
        Ok(Stmt {
            kind: StmtKind::While { cond, body },
            span,
        })
    }

    fn for_statement(&mut self) -> PResult<Stmt> {
        let span = self.advance().span; // 'for'
        let var = self.expect_ident("expected loop variable after 'for'")?;
        self.expect(TokenKind::From, "expected 'from' in for loop")?;
        let from = self.expression()?;
        self.expect(TokenKind::To, "expected 'to' in for loop")?;
        let to = self.expression()?;
        self.expect(TokenKind::Do, "expected 'do' after for header")?;
        let body = self.block_until(|p| p.check_end_of(TokenKind::For));
        self.expect_block_end(TokenKind::For, "for")?;
        Ok(Stmt {
            kind: StmtKind::For {
                var: var.lexeme,
                from,
                to,
                body,
            },
            span,
        })
    }

    fn function_def(&mut self) -> PResult<FunctionDef> {
        let span = self.advance().span; // 'function' / 'func'
        let name = self.function_name()?;
        if self.matches(TokenKind::Arguments) {
            self.matches(TokenKind::Colon);
        }
        self.expect(TokenKind::LParen, "expected '(' after function name")?;
        let mut params: Vec<Param> = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                params.push(self.param_decl()?);
                if self.matches(TokenKind::Comma) {
                    continue;
                }
                break;
            }
        }
        self.expect(TokenKind::RParen, "expected ')' after parameters")?;

        let body = self.block_until(|p| {
            p.check_end_of(TokenKind::Function) || p.check_end_of(TokenKind::Func)
        });

        self.expect(TokenKind::End, "expected 'end function' to close function")?;
        if !self.matches(TokenKind::Function) && !self.matches(TokenKind::Func) {
            let tok = self.peek().clone();
            self.error("expected 'function' or 'func' after 'end'", tok.span);
            return Err(Interrupt);
        }

        Ok(FunctionDef {
            name,
            params,
            body,
            span,
        })
    }

    fn param_decl(&mut self) -> PResult<Param> {
        let name = self.expect_ident("expected parameter name")?;
        let mut ty = None;
        let mut default = None;
        if self.matches(TokenKind::Colon) {
            ty = Some(self.type_name()?);
        }
        if self.matches(TokenKind::Eq) {
            default = Some(self.expression()?);
        }
        Ok(Param {
            name: name.lexeme,
            ty,
            default,
            span: name.span,
        })
    }

    /// Everything after the `call` keyword: function name, `with
    /// arguments:`, and the parenthesized argument list. The parser only
    /// records what was written: positional order and `name = value`
    /// pairs; matching against parameters happens in semantic analysis.
    fn call_tail(&mut self, span: Span) -> PResult<CallNode> {
        let name = self.function_name()?;
        self.expect(TokenKind::With, "expected 'with' after function name")?;
        self.expect(TokenKind::Arguments, "expected 'arguments' after 'with'")?;
        self.matches(TokenKind::Colon);
        self.expect(TokenKind::LParen, "expected '(' after 'arguments:'")?;
        let mut args: Vec<CallArg> = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                if self.check(TokenKind::Ident) && self.check_next(TokenKind::Eq) {
                    let arg_name = self.advance();
                    self.advance(); // '='
                    let value = self.expression()?;
                    args.push(CallArg {
                        name: Some(arg_name.lexeme),
                        value,
                        span: arg_name.span,
                    });
                } else {
                    let value = self.expression()?;
                    args.push(CallArg {
                        name: None,
                        span: value.span,
                        value,
                    });
                }
                if self.matches(TokenKind::Comma) {
                    continue;
                }
                break;
            }
        }
        self.expect(TokenKind::RParen, "expected ')' after call arguments")?;
        Ok(CallNode { name, args, span })
    }

    fn function_name(&mut self) -> PResult<String> {
        if self.check(TokenKind::Str) || self.check(TokenKind::Ident) {
            return Ok(self.advance().lexeme);
        }
        let tok = self.peek().clone();
        self.error("expected function name", tok.span);
        Err(Interrupt)
    }

    /// Collect statements until `stop` matches or input ends. A bad
    /// statement inside the block is recorded and skipped so the rest of
    /// the block still parses.
    fn block_until(&mut self, stop: impl Fn(&Parser) -> bool) -> Vec<Stmt> {
        let mut stmts = Vec::new();
        while !self.at_end() && !stop(self) {
            match self.statement() {
                Ok(stmt) => stmts.push(stmt),
                Err(_) => self.synchronize(),
            }
        }
        stmts
    }

    fn expect_block_end(&mut self, kind: TokenKind, name: &str) -> PResult<()> {
        self.expect(TokenKind::End, &format!("expected 'end {name}' to close {name}"))?;
        self.expect(kind, &format!("expected '{name}' after 'end'"))?;
        Ok(())
    }

    /// `end` followed by the given keyword.
    fn check_end_of(&self, kind: TokenKind) -> bool {
        self.check(TokenKind::End) && self.check_next(kind)
    }

    // --- expressions ---

    fn expression(&mut self) -> PResult<Expr> {
        self.or_expr()
    }

    fn or_expr(&mut self) -> PResult<Expr> {
        let mut expr = self.and_expr()?;
        while self.matches(TokenKind::Or) || self.matches(TokenKind::Pipe) {
            let right = self.and_expr()?;
            expr = binary(BinOp::Or, expr, right);
        }
        Ok(expr)
    }

    fn and_expr(&mut self) -> PResult<Expr> {
        let mut expr = self.comparison()?;
        while self.matches(TokenKind::And) || self.matches(TokenKind::Amp) {
            let right = self.comparison()?;
            expr = binary(BinOp::And, expr, right);
        }
        Ok(expr)
    }

    fn comparison(&mut self) -> PResult<Expr> {
        let mut expr = self.additive()?;
        while let Some(op) = self.comparison_op()? {
            let right = self.additive()?;
            expr = binary(op, expr, right);
        }
        Ok(expr)
    }

    /// A symbolic comparison operator, or an `is ...` phrase. Both
    /// spellings produce the same `BinOp` tag. Longer phrases are tried
    /// first so `is greater than or equal to` is not cut short at
    /// `is greater than`.
    fn comparison_op(&mut self) -> PResult<Option<BinOp>> {
        use TokenKind::*;
        for (kind, op) in [
            (EqEq, BinOp::Eq),
            (NotEq, BinOp::Ne),
            (Ge, BinOp::Ge),
            (Le, BinOp::Le),
            (Gt, BinOp::Gt),
            (Lt, BinOp::Lt),
        ] {
            if self.matches(kind) {
                return Ok(Some(op));
            }
        }
        if !self.check(TokenKind::Is) {
            return Ok(None);
        }
        let is_span = self.advance().span;
        const PHRASES: &[(&[TokenKind], BinOp)] = &[
            (&[Greater, Than, Or, Equal, To], BinOp::Ge),
            (&[Less, Than, Or, Equal, To], BinOp::Le),
            (&[Greater, Or, Equal, To], BinOp::Ge),
            (&[Less, Or, Equal, To], BinOp::Le),
            (&[Greater, Than], BinOp::Gt),
            (&[Less, Than], BinOp::Lt),
            (&[Equal, To], BinOp::Eq),
            (&[Not, Equal, To], BinOp::Ne),
        ];
        for (phrase, op) in PHRASES {
            if self.try_keywords(phrase) {
                return Ok(Some(*op));
            }
        }
        self.error("expected comparison phrase after 'is'", is_span);
        Err(Interrupt)
    }

    fn try_keywords(&mut self, seq: &[TokenKind]) -> bool {
        let save = self.pos;
        for kind in seq {
            if !self.matches(*kind) {
                self.pos = save;
                return false;
            }
        }
        true
    }

    fn additive(&mut self) -> PResult<Expr> {
        let mut expr = self.multiplicative()?;
        loop {
            let op = if self.matches(TokenKind::Plus) {
                BinOp::Add
            } else if self.matches(TokenKind::Minus) {
                BinOp::Sub
            } else {
                break;
            };
            let right = self.multiplicative()?;
            expr = binary(op, expr, right);
        }
        Ok(expr)
    }

    fn multiplicative(&mut self) -> PResult<Expr> {
        let mut expr = self.power()?;
        loop {
            let op = if self.matches(TokenKind::Star) {
                BinOp::Mul
            } else if self.matches(TokenKind::Slash) {
                BinOp::Div
            } else {
                break;
            };
            let right = self.power()?;
            expr = binary(op, expr, right);
        }
        Ok(expr)
    }

    fn power(&mut self) -> PResult<Expr> {
        let base = self.unary()?;
        if self.matches(TokenKind::Caret) {
            // Right-associative: 2 ^ 3 ^ 2 is 2 ^ (3 ^ 2).
            let exponent = self.power()?;
            return Ok(binary(BinOp::Pow, base, exponent));
        }
        Ok(base)
    }

    fn unary(&mut self) -> PResult<Expr> {
        let span = self.peek().span;
        let op = match self.peek().kind {
            TokenKind::Plus => UnOp::Pos,
            TokenKind::Minus => UnOp::Neg,
            TokenKind::Not | TokenKind::Bang => UnOp::Not,
            _ => return self.primary(),
        };
        self.advance();
        let operand = self.unary()?;
        Ok(Expr {
            kind: ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        })
    }

    fn primary(&mut self) -> PResult<Expr> {
        let tok = self.peek().clone();
        match tok.kind {
            TokenKind::Number => {
                self.advance();
                let kind = if tok.lexeme.contains('.') {
                    match tok.lexeme.parse() {
                        Ok(value) => ExprKind::Float(value),
                        Err(_) => {
                            self.error(
                                format!("number '{}' is out of range", tok.lexeme),
                                tok.span,
                            );
                            return Err(Interrupt);
                        }
                    }
                } else {
                    match tok.lexeme.parse() {
                        Ok(value) => ExprKind::Int(value),
                        Err(_) => {
                            self.error(
                                format!("integer literal '{}' is out of range", tok.lexeme),
                                tok.span,
                            );
                            return Err(Interrupt);
                        }
                    }
                };
                Ok(Expr { kind, span: tok.span })
            }
            TokenKind::Str => {
                self.advance();
                Ok(Expr {
                    kind: ExprKind::Str(tok.lexeme),
                    span: tok.span,
                })
            }
            TokenKind::Ident => {
                self.advance();
                if self.matches(TokenKind::LBracket) {
                    let index = self.expression()?;
                    self.expect(TokenKind::RBracket, "expected ']' after index")?;
                    return Ok(Expr {
                        kind: ExprKind::Index {
                            name: tok.lexeme,
                            index: Box::new(index),
                        },
                        span: tok.span,
                    });
                }
                Ok(Expr {
                    kind: ExprKind::Var(tok.lexeme),
                    span: tok.span,
                })
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.expression()?;
                self.expect(TokenKind::RParen, "expected ')' after expression")?;
                Ok(expr)
            }
            TokenKind::Call => {
                self.advance();
                let call = self.call_tail(tok.span)?;
                Ok(Expr {
                    kind: ExprKind::Call(call),
                    span: tok.span,
                })
            }
            TokenKind::Add => self.phrase_binary(BinOp::Add),
            TokenKind::Subtract => self.phrase_binary(BinOp::Sub),
            TokenKind::Multiply => self.phrase_binary(BinOp::Mul),
            TokenKind::Divide => self.phrase_binary(BinOp::Div),
            TokenKind::Power => self.phrase_binary(BinOp::Pow),
            _ => {
                self.error(
                    format!("expected expression, found '{}'", describe(&tok)),
                    tok.span,
                );
                Err(Interrupt)
            }
        }
    }

    /// The phrase spelling of a binary operator: `add X and Y`,
    /// `power X and Y`. Operands bind at unary level, like the symbolic
    /// form's tightest operands.
    fn phrase_binary(&mut self, op: BinOp) -> PResult<Expr> {
        let span = self.advance().span; // the operator keyword
        let left = self.unary()?;
        self.expect(TokenKind::And, "expected 'and' between operands")?;
        let right = self.unary()?;
        Ok(Expr {
            kind: ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        })
    }

    fn at_expr_start(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::Number
                | TokenKind::Str
                | TokenKind::Ident
                | TokenKind::LParen
                | TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Bang
                | TokenKind::Not
                | TokenKind::Add
                | TokenKind::Subtract
                | TokenKind::Multiply
                | TokenKind::Divide
                | TokenKind::Power
                | TokenKind::Call
        )
    }

    // --- token helpers ---

    fn type_name(&mut self) -> PResult<Ty> {
        if let Some(ty) = Ty::from_keyword(self.peek().kind) {
            self.advance();
            return Ok(ty);
        }
        let tok = self.peek().clone();
        self.error("expected a type name", tok.span);
        Err(Interrupt)
    }

    fn expect(&mut self, kind: TokenKind, message: &str) -> PResult<Token> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        let tok = self.peek().clone();
        self.error(format!("{message}, found '{}'", describe(&tok)), tok.span);
        Err(Interrupt)
    }

    fn expect_ident(&mut self, message: &str) -> PResult<Token> {
        self.expect(TokenKind::Ident, message)
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            return true;
        }
        false
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn check_next(&self, kind: TokenKind) -> bool {
        self.tokens
            .get(self.pos + 1)
            .is_some_and(|t| t.kind == kind)
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if !self.at_end() {
            self.pos += 1;
        }
        tok
    }

    fn at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn error(&mut self, message: impl Into<String>, span: Span) {
        self.diagnostics
            .push(Diagnostic::error(DiagnosticKind::Syntax, message, span));
    }
}

fn binary(op: BinOp, left: Expr, right: Expr) -> Expr {
    Expr {
        span: left.span,
        kind: ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
    }
}

/// Tokens the panic-mode recovery stops at: the start of a new
/// statement or top-level construct, a block terminator, or `Eof`.
fn is_sync_point(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Set
            | TokenKind::Make
            | TokenKind::Print
            | TokenKind::Input
            | TokenKind::If
            | TokenKind::While
            | TokenKind::For
            | TokenKind::Call
            | TokenKind::Return
            | TokenKind::Add
            | TokenKind::Sub
            | TokenKind::Subtract
            | TokenKind::Function
            | TokenKind::Func
            | TokenKind::End
            | TokenKind::Eof
    )
}

fn describe(token: &Token) -> String {
    match token.kind {
        TokenKind::Eof => "end of input".to_string(),
        _ => token.lexeme.clone(),
    }
}
