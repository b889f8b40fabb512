//! Token types for the KPL lexer.
//!
//! Vocabulary tokens carry **registry-backed IDs**:
//! - `Keyword(KeywordId)` for reserved words
//! - `Operator(OperatorId)` for builtin operators
//! - `Punctuation(PunctuationId)` for delimiters and separators
//!
//! ## Notes
//! - Literal payloads are already decoded (escapes processed, numbers parsed). The raw text is kept in
//!   [`Token::lexeme`].
//! - Comments are real tokens. The parser consumes a stream filtered by [`strip_comments`].

use crate::ast::Span;
use kpl_core::lang::keywords::KeywordId;
use kpl_core::lang::operators::OperatorId;
use kpl_core::lang::punctuation::PunctuationId;

// ============================================================================
// TOKEN TYPES
// ============================================================================

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ========== Keyword / operator / punctuation (ID-based) ==========
    Keyword(KeywordId),
    Operator(OperatorId),
    Punctuation(PunctuationId),
    /// Run of operator characters that is not a builtin operator (e.g. `<+>`).
    CustomOperator(String),

    // ========== Identifiers and Literals ==========
    Ident(String),
    Int(i64),
    Double(f64),
    Char(char),
    String(String),

    // ========== Trivia ==========
    /// `-- ...` or `/* ... */`, raw text including the markers.
    Comment(String),

    Eof,
}

/// A token with its kind, raw source text and span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }

    /// 1-based line of the first character.
    pub fn line(&self) -> usize {
        self.span.line
    }

    /// 1-based column of the first character.
    pub fn column(&self) -> usize {
        self.span.column
    }
}

/// Drop comment tokens, keeping everything else in order.
pub fn strip_comments(tokens: Vec<Token>) -> Vec<Token> {
    tokens
        .into_iter()
        .filter(|t| !matches!(t.kind, TokenKind::Comment(_)))
        .collect()
}
