//! AST node definitions for the Write language.
//!
//! Statements and expressions are closed variant sets; every stage that
//! walks the tree matches exhaustively, so adding a node kind is a
//! compile-time-checked change across the whole pipeline. Operators have
//! a single tag regardless of whether the source spelled them as symbols
//! (`+`, `>=`) or English phrases (`add x and y`, `is greater than or
//! equal to`); later stages never see the original spelling.

use crate::span::Span;
use crate::types::Ty;

/// A parsed compilation unit: function definitions plus the top-level
/// statement sequence.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub functions: Vec<FunctionDef>,
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// Function parameter with optional declared type and default value.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: Option<Ty>,
    pub default: Option<Expr>,
    pub span: Span,
}

/// A statement with its source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// `make NAME`, `make NAME as TYPE`, `make NAME as list of size N`.
    Declaration {
        name: String,
        ty: Option<Ty>,
        size: Option<Expr>,
    },
    /// `set NAME to EXPR`, optionally with an inline type annotation.
    Assign {
        name: String,
        ty: Option<Ty>,
        value: Expr,
    },
    /// `set NAME[INDEX] to EXPR`.
    IndexAssign {
        name: String,
        index: Expr,
        value: Expr,
    },
    /// `add EXPR to NAME`.
    AddInPlace { amount: Expr, target: String },
    /// `sub EXPR from NAME`.
    SubInPlace { amount: Expr, target: String },
    /// `print EXPR, EXPR, ...`.
    Print { values: Vec<Expr> },
    /// `input "prompt"? NAME (as TYPE)?`.
    Input {
        prompt: Option<String>,
        name: String,
        ty: Option<Ty>,
    },
    /// `return EXPR, ...` (also spelled `set return to EXPR`).
    Return { values: Vec<Expr> },
    If {
        first: IfBranch,
        elifs: Vec<IfBranch>,
        else_body: Option<Vec<Stmt>>,
    },
    While { cond: Expr, body: Vec<Stmt> },
    /// `for VAR from FROM to TO do ... end for`; the upper bound is
    /// inclusive.
    For {
        var: String,
        from: Expr,
        to: Expr,
        body: Vec<Stmt>,
    },
    /// `call NAME with arguments:(...)` in statement position.
    Call(CallNode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfBranch {
    pub cond: Expr,
    pub body: Vec<Stmt>,
}

/// A call site: what was written, before named/positional resolution.
/// Matching arguments to parameters is the semantic analyzer's job.
#[derive(Debug, Clone, PartialEq)]
pub struct CallNode {
    pub name: String,
    pub args: Vec<CallArg>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallArg {
    /// `Some` for `name = value`, `None` for a positional argument.
    pub name: Option<String>,
    pub value: Expr,
    pub span: Span,
}

/// An expression with its source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Int(i64),
    Float(f64),
    Str(String),
    Var(String),
    Index { name: String, index: Box<Expr> },
    Unary { op: UnOp, operand: Box<Expr> },
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call(CallNode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Pos,
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinOp {
    pub fn is_arithmetic(self) -> bool {
        matches!(self, BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Pow)
    }

    pub fn is_equality(self) -> bool {
        matches!(self, BinOp::Eq | BinOp::Ne)
    }

    pub fn is_ordering(self) -> bool {
        matches!(self, BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge)
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinOp::And | BinOp::Or)
    }

    /// Canonical symbol, used in diagnostics.
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Pow => "^",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "and",
            BinOp::Or => "or",
        }
    }
}

impl Expr {
    /// The compile-time integer value of a literal expression, if it is
    /// one. Recognizes a unary minus over an int literal so negative
    /// container indices can be bounds-checked.
    pub fn literal_int(&self) -> Option<i64> {
        match &self.kind {
            ExprKind::Int(v) => Some(*v),
            ExprKind::Unary { op: UnOp::Neg, operand } => {
                operand.literal_int().map(|v| -v)
            }
            ExprKind::Unary { op: UnOp::Pos, operand } => operand.literal_int(),
            _ => None,
        }
    }
}
