//! Punctuation vocabulary for KPL.
//!
//! Single-character delimiters and separators. Every entry is exactly one character, so the lexer can dispatch
//! on the first character without lookahead.
//!
//! ## Examples
//! ```rust
//! use kpl_core::lang::punctuation::{self, PunctuationId};
//!
//! assert_eq!(punctuation::from_char(':'), Some(PunctuationId::Colon));
//! assert_eq!(punctuation::as_str(PunctuationId::RBrace), "}");
//! ```

/// Broad syntactic grouping for punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctuationCategory {
    Delimiter,
    Separator,
    Access,
}

/// Stable identifier for punctuation tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctuationId {
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Colon,
    Semicolon,
    Dot,
}

/// Metadata for a punctuation token.
#[derive(Debug, Clone, Copy)]
pub struct PunctuationInfo {
    pub id: PunctuationId,
    pub canonical: char,
    pub spelling: &'static str,
    pub category: PunctuationCategory,
}

/// Registry of all punctuation tokens.
pub const PUNCTUATION: &[PunctuationInfo] = &[
    info(PunctuationId::LParen, '(', "(", PunctuationCategory::Delimiter),
    info(PunctuationId::RParen, ')', ")", PunctuationCategory::Delimiter),
    info(PunctuationId::LBrace, '{', "{", PunctuationCategory::Delimiter),
    info(PunctuationId::RBrace, '}', "}", PunctuationCategory::Delimiter),
    info(PunctuationId::LBracket, '[', "[", PunctuationCategory::Delimiter),
    info(PunctuationId::RBracket, ']', "]", PunctuationCategory::Delimiter),
    info(PunctuationId::Comma, ',', ",", PunctuationCategory::Separator),
    info(PunctuationId::Colon, ':', ":", PunctuationCategory::Separator),
    info(PunctuationId::Semicolon, ';', ";", PunctuationCategory::Separator),
    info(PunctuationId::Dot, '.', ".", PunctuationCategory::Access),
];

pub fn info_for(id: PunctuationId) -> &'static PunctuationInfo {
    PUNCTUATION
        .iter()
        .find(|p| p.id == id)
        .expect("INVARIANT: every PunctuationId has a PUNCTUATION entry")
}

pub fn as_str(id: PunctuationId) -> &'static str {
    info_for(id).spelling
}

/// Resolve a punctuation character to its identifier.
pub fn from_char(c: char) -> Option<PunctuationId> {
    PUNCTUATION.iter().find(|p| p.canonical == c).map(|p| p.id)
}

/// Resolve a punctuation spelling to its identifier.
pub fn from_str(s: &str) -> Option<PunctuationId> {
    PUNCTUATION.iter().find(|p| p.spelling == s).map(|p| p.id)
}

const fn info(id: PunctuationId, canonical: char, spelling: &'static str, category: PunctuationCategory) -> PunctuationInfo {
    PunctuationInfo {
        id,
        canonical,
        spelling,
        category,
    }
}
