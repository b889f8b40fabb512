//! KPL language vocabulary registries.
//!
//! Callers work with **stable IDs** (`KeywordId`, `OperatorId`, `PunctuationId`) and look up spellings and
//! metadata via the registry tables, instead of comparing strings across the lexer, parser and tooling.
//!
//! ## Notes
//! - Registries are **pure**: no AST types, no IO, no side effects.
//! - The lexer/parser enforce syntax; registries provide spellings and metadata for shared use (diagnostics,
//!   completion, hover).
//!
//! ## Examples
//! ```rust
//! use kpl_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("while"), Some(KeywordId::While));
//! assert_eq!(keywords::as_str(KeywordId::EndWhile), "endWhile");
//! ```

pub mod keywords;
pub mod operators;
pub mod punctuation;
pub mod registry;
pub mod snippets;
