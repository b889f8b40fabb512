//! Shareable metadata for `kpl_core` registries.
//!
//! Every vocabulary in this crate is **registry-first**: a stable ID enum plus a `const` table of info records.
//! This submodule holds the small metadata types those tables share.
//!
//! ## Notes
//! - These types are `Copy` so registries can live in `const` tables.
//! - Metadata is for tooling/docs/diagnostics; syntax rules are still enforced by the lexer/parser.
//!
//! ## See also
//! - [`crate::lang::keywords`]
//! - [`crate::lang::operators`]
//! - [`crate::blitz::instructions`]

/// Describe the lifecycle status of a vocabulary item.
///
/// ## Examples
/// ```rust
/// use kpl_core::lang::registry::Stability;
///
/// let s = Stability::Stable;
/// assert_eq!(format!("{s:?}"), "Stable");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stability {
    Stable,
    Deprecated,
}

/// Represent a small example snippet for documentation.
///
/// ## Notes
/// - `code` is the example body, in KPL or Blitz syntax depending on the registry.
/// - `note` is an optional short explanation.
#[derive(Debug, Clone, Copy)]
pub struct Example {
    pub code: &'static str,
    pub note: Option<&'static str>,
}

/// Spelling comparison rule for a language.
///
/// KPL reserved words are case-sensitive (`If` is an identifier). Blitz mnemonics and register names are not
/// (`ADD R1,R2,R3` is the same instruction as `add r1,r2,r3`).
///
/// ## Examples
/// ```rust
/// use kpl_core::lang::registry::CaseRule;
///
/// assert!(CaseRule::Insensitive.matches("ADD", "add"));
/// assert!(!CaseRule::Sensitive.matches("If", "if"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CaseRule {
    #[default]
    Sensitive,
    Insensitive,
}

impl CaseRule {
    /// Return `true` if `spelling` matches `canonical` under this rule.
    pub fn matches(self, spelling: &str, canonical: &str) -> bool {
        match self {
            CaseRule::Sensitive => spelling == canonical,
            CaseRule::Insensitive => spelling.eq_ignore_ascii_case(canonical),
        }
    }
}
