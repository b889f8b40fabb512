//! Parser for the KPL programming language
//!
//! Converts a comment-free token stream into an AST. One method per grammar production, composed top-down from
//! [`Program`] through files, declarations, statements and a precedence ladder of expression levels.
//!
//! ## Examples
//!
//! ```rust
//! use kpl_syntax::{lexer, parser};
//!
//! let source = "code Test\n  function f() returns int\n    return 1\n  endFunction\nendCode";
//! let tokens = lexer::strip_comments(lexer::lex(source).unwrap());
//! let program = parser::parse(&tokens).unwrap();
//! assert_eq!(program.units.len(), 1);
//! ```

use std::borrow::Cow;

use crate::ast::*;
use crate::diagnostics::{CompileError, Diagnostic};
use crate::lexer::{self, Token, TokenKind};
use kpl_core::lang::keywords::KeywordId;
use kpl_core::lang::operators::OperatorId;
use kpl_core::lang::punctuation::PunctuationId;

// NOTE: This module is split across multiple files using `include!` to keep all parser
// methods in the same Rust module (preserving privacy + call patterns) while avoiding
// a single large source file.

include!("parser/core.rs");
include!("parser/helpers.rs");
include!("parser/decl.rs");
include!("parser/types.rs");
include!("parser/stmts.rs");
include!("parser/expr.rs");
include!("parser/util.rs");
include!("parser/api.rs");
include!("parser/tests.rs");
