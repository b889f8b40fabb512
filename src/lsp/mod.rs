//! KPL / Blitz Language Server Protocol (LSP) implementation
//!
//! Provides IDE features:
//! - Real-time diagnostics for `.k`/`.h` (KPL) and `.s` (Blitz) documents
//! - Hover for Blitz instructions, registers, directives, symbols and numbers, and for KPL keywords
//! - Completions (KPL snippets and keywords; Blitz instructions, directives and registers)
//! - Document formatting for Blitz

pub mod backend;
pub mod completion;
pub mod diagnostics;
pub mod hover;

pub use backend::KplLanguageServer;
