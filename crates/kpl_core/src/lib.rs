#![forbid(unsafe_code)]
//! Canonical vocabulary for the KPL toolchain.
//!
//! This crate is intentionally small and dependency-free. It holds the static, read-only tables that both the
//! syntax frontend and the editor tooling consult:
//! - KPL reserved words, operators and punctuation (`lang`)
//! - KPL editor snippets for block statements and builtin types (`lang::snippets`)
//! - Blitz instruction, directive and register definitions (`blitz`)
//!
//! ## Notes
//!
//! - Everything here is `const` data plus pure lookup helpers: **no IO**, no global mutable state.
//! - Lookups take a spelling and return a stable ID or a `&'static` info record. Case rules are explicit per
//!   language: KPL lookups are case-sensitive, Blitz lookups lowercase their input first.

pub mod blitz;
pub mod lang;
