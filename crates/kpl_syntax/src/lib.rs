#![forbid(unsafe_code)]
//! Syntax frontend for the KPL language and Blitz assembly: lexers, parser, AST, diagnostics.
//!
//! This crate is dependency-light and shared by the CLI, the formatter and the language server.
//!
//! ## Notes
//! - This crate is “syntax-only”: beyond Blitz symbol existence checks it does no semantic analysis.
//! - Vocabulary identity (keywords/operators/punctuation, Blitz instructions/registers) comes from `kpl_core`.
//! - Both languages report problems through the same closed [`diagnostics::Diagnostic`] record.
//!
//! ## Examples
//! ```rust
//! use kpl_syntax::{blitz, parser};
//!
//! let outcome = parser::parse_source("code Test\nendCode");
//! assert!(outcome.diagnostics.is_empty());
//!
//! let result = blitz::parse_text("L1: add r1,r2,r3\n jmp L1");
//! assert!(result.diagnostics.is_empty());
//! ```
//!
//! ## See also
//! - `kpl_core::lang` and `kpl_core::blitz` for the static vocabulary tables.

pub mod ast;
pub mod blitz;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod token_helpers;
