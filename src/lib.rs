#![forbid(unsafe_code)]
//! Tooling for the KPL language and Blitz assembly
//!
//! The syntax layer lives in `kpl_syntax` (lexers, parser, AST, Blitz symbols) on top of the vocabulary tables in
//! `kpl_core`. This crate adds the user-facing tools: the Blitz formatter, workspace discovery, the CLI and the
//! language server.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents a tooling bug (logic error), use `.expect("INVARIANT: reason")` with a
//!   clear explanation.

pub mod cli;
pub mod format;
pub mod lsp;
pub mod workspace;

pub use kpl_syntax::{ast, blitz, diagnostics, lexer, parser};

pub use format::{FormatConfig, check_formatted, format_diff, format_source, format_source_with_config};
pub use workspace::{SourceLanguage, Workspace, WorkspaceConfig, WorkspaceError};
