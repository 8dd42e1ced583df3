//! Lexer for the Write language.
//!
//! Scans source text left to right into a token stream with line/column
//! positions. The lexer is error-tolerant: an unrecognized character or a
//! malformed literal produces a lexical diagnostic and scanning continues
//! past it, so one pass can surface several problems. The stream always
//! ends with exactly one `Eof` token.

use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::span::Span;

/// Kind of a token produced by the lexer.
///
/// Every reserved word gets its own variant; the parser matches English
/// phrases (`is greater than`, `add x and y`) directly on keyword
/// sequences. Numbers are a single kind; whether a literal is an int or
/// a float is decided from the lexeme when the AST node is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Special
    Eof,

    // Identifiers and literals
    Ident,
    Number,
    Str,

    // Punctuation and operators
    Plus,     // +
    Minus,    // -
    Star,     // *
    Slash,    // /
    Caret,    // ^
    LParen,   // (
    RParen,   // )
    LBracket, // [
    RBracket, // ]
    Comma,    // ,
    Colon,    // :
    Bang,     // !
    Amp,      // &
    Pipe,     // |
    Eq,       // =
    EqEq,     // ==
    NotEq,    // !=
    Gt,       // >
    Lt,       // <
    Ge,       // >=
    Le,       // <=

    // Keywords
    Set,
    To,
    Print,
    Make,
    Input,
    As,
    If,
    Else,
    End,
    Then,
    While,
    Do,
    For,
    From,
    And,
    Or,
    Not,
    Is,
    Greater,
    Less,
    Equal,
    Than,
    Add,
    Sub,
    Subtract,
    Multiply,
    Divide,
    Power,
    Of,
    Size,
    Function,
    Func,
    Call,
    With,
    Arguments,
    Return,
    Int,
    Float,
    StringTy,
    Bool,
    List,
    Array,
}

/// A single token with its kind, text, and source position.
///
/// For string literals the lexeme is the content between the quotes with
/// escape sequences kept as written; for everything else it is the raw
/// source text of the token.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: Span,
}

/// Result of lexing a source buffer.
#[derive(Debug)]
pub struct LexResult {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Lex a source string into tokens.
pub fn lex(source: &str) -> LexResult {
    let lexer = Lexer {
        source,
        bytes: source.as_bytes(),
        index: 0,
        line: 1,
        column: 1,
        tokens: Vec::new(),
        diagnostics: Vec::new(),
    };
    lexer.run()
}

struct Lexer<'src> {
    source: &'src str,
    bytes: &'src [u8],
    index: usize,
    line: u32,
    column: u32,
    tokens: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
}

impl<'src> Lexer<'src> {
    fn run(mut self) -> LexResult {
        while let Some(ch) = self.peek() {
            let span = Span::new(self.line, self.column);
            match ch {
                b' ' | b'\t' | b'\r' | b'\n' => {
                    self.consume();
                }
                b'#' => {
                    while let Some(c) = self.peek() {
                        if c == b'\n' {
                            break;
                        }
                        self.consume();
                    }
                }
                b'"' => self.lex_string(span),
                b'0'..=b'9' => self.lex_number(span),
                b'(' => self.simple(TokenKind::LParen, span),
                b')' => self.simple(TokenKind::RParen, span),
                b'[' => self.simple(TokenKind::LBracket, span),
                b']' => self.simple(TokenKind::RBracket, span),
                b',' => self.simple(TokenKind::Comma, span),
                b':' => self.simple(TokenKind::Colon, span),
                b'+' => self.simple(TokenKind::Plus, span),
                b'-' => self.simple(TokenKind::Minus, span),
                b'*' => self.simple(TokenKind::Star, span),
                b'/' => self.simple(TokenKind::Slash, span),
                b'^' => self.simple(TokenKind::Caret, span),
                b'&' => self.simple(TokenKind::Amp, span),
                b'|' => self.simple(TokenKind::Pipe, span),
                b'=' => self.one_or_two(TokenKind::Eq, TokenKind::EqEq, span),
                b'!' => self.one_or_two(TokenKind::Bang, TokenKind::NotEq, span),
                b'>' => self.one_or_two(TokenKind::Gt, TokenKind::Ge, span),
                b'<' => self.one_or_two(TokenKind::Lt, TokenKind::Le, span),
                _ => {
                    if is_ident_start(ch) {
                        self.lex_ident_or_keyword(span);
                    } else {
                        self.consume();
                        self.diagnostics.push(Diagnostic::error(
                            DiagnosticKind::Lexical,
                            format!("unrecognized character '{}'", ch as char),
                            span,
                        ));
                    }
                }
            }
        }

        let eof_span = Span::new(self.line, self.column);
        self.tokens.push(Token {
            kind: TokenKind::Eof,
            lexeme: String::new(),
            span: eof_span,
        });

        LexResult {
            tokens: self.tokens,
            diagnostics: self.diagnostics,
        }
    }

    fn simple(&mut self, kind: TokenKind, span: Span) {
        let start = self.index;
        self.consume();
        self.push(kind, start, span);
    }

    /// Single-character token, or its two-character form when the next
    /// byte is `=` (longest match: `==`, `!=`, `>=`, `<=` win over their
    /// one-character prefixes).
    fn one_or_two(&mut self, single: TokenKind, double: TokenKind, span: Span) {
        let start = self.index;
        self.consume();
        if self.peek() == Some(b'=') {
            self.consume();
            self.push(double, start, span);
        } else {
            self.push(single, start, span);
        }
    }

    fn lex_string(&mut self, span: Span) {
        self.consume(); // opening quote
        let content_start = self.index;

        while let Some(ch) = self.peek() {
            match ch {
                b'"' => {
                    let content_end = self.index;
                    self.consume(); // closing quote
                    self.tokens.push(Token {
                        kind: TokenKind::Str,
                        lexeme: self.source[content_start..content_end].to_string(),
                        span,
                    });
                    return;
                }
                b'\n' => break,
                b'\\' => {
                    self.consume();
                    if self.peek().is_some_and(|c| c != b'\n') {
                        self.consume();
                    }
                }
                _ => {
                    self.consume();
                }
            }
        }

        // Hit a newline or end of input before the closing quote.
        self.diagnostics.push(Diagnostic::error(
            DiagnosticKind::Lexical,
            "unterminated string literal",
            span,
        ));
    }

    fn lex_number(&mut self, span: Span) {
        let start = self.index;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.consume();
        }

        if self.peek() == Some(b'.') {
            if self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
                self.consume(); // '.'
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.consume();
                }
            } else {
                // "12." with nothing after the dot is malformed, not a
                // float. Keep the integer part and skip the dot.
                self.push(TokenKind::Number, start, span);
                let dot_span = Span::new(self.line, self.column);
                self.consume();
                self.diagnostics.push(Diagnostic::error(
                    DiagnosticKind::Lexical,
                    "malformed number: expected digits after '.'",
                    dot_span,
                ));
                return;
            }
        }

        self.push(TokenKind::Number, start, span);
    }

    fn lex_ident_or_keyword(&mut self, span: Span) {
        let start = self.index;
        while self.peek().is_some_and(is_ident_continue) {
            self.consume();
        }
        let text = &self.source[start..self.index];
        let kind = keyword_kind(text).unwrap_or(TokenKind::Ident);
        self.tokens.push(Token {
            kind,
            lexeme: text.to_string(),
            span,
        });
    }

    fn push(&mut self, kind: TokenKind, start: usize, span: Span) {
        self.tokens.push(Token {
            kind,
            lexeme: self.source[start..self.index].to_string(),
            span,
        });
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.index).copied()
    }

    fn peek_next(&self) -> Option<u8> {
        self.bytes.get(self.index + 1).copied()
    }

    fn consume(&mut self) {
        if let Some(ch) = self.peek() {
            self.index += 1;
            if ch == b'\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }
}

fn is_ident_start(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_'
}

fn is_ident_continue(ch: u8) -> bool {
    is_ident_start(ch) || ch.is_ascii_digit()
}

fn keyword_kind(text: &str) -> Option<TokenKind> {
    let kind = match text {
        "set" => TokenKind::Set,
        "to" => TokenKind::To,
        "print" => TokenKind::Print,
        "make" => TokenKind::Make,
        "input" => TokenKind::Input,
        "as" => TokenKind::As,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "end" => TokenKind::End,
        "then" => TokenKind::Then,
        "while" => TokenKind::While,
        "do" => TokenKind::Do,
        "for" => TokenKind::For,
        "from" => TokenKind::From,
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        "not" => TokenKind::Not,
        "is" => TokenKind::Is,
        "greater" => TokenKind::Greater,
        "less" => TokenKind::Less,
        "equal" => TokenKind::Equal,
        "than" => TokenKind::Than,
        "add" => TokenKind::Add,
        "sub" => TokenKind::Sub,
        "subtract" => TokenKind::Subtract,
        "multiply" => TokenKind::Multiply,
        "divide" => TokenKind::Divide,
        "power" => TokenKind::Power,
        "of" => TokenKind::Of,
        "size" => TokenKind::Size,
        "function" => TokenKind::Function,
        "func" => TokenKind::Func,
        "call" => TokenKind::Call,
        "with" => TokenKind::With,
        // Accepted misspelling; both lex to the same keyword so the two
        // forms stay interchangeable everywhere.
        "arguments" | "aguments" => TokenKind::Arguments,
        "return" => TokenKind::Return,
        "int" => TokenKind::Int,
        "float" => TokenKind::Float,
        "string" => TokenKind::StringTy,
        "bool" => TokenKind::Bool,
        "list" => TokenKind::List,
        "array" => TokenKind::Array,
        _ => return None,
    };
    Some(kind)
}
