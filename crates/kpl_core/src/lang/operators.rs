//! Operator vocabulary for KPL.
//!
//! This module defines the fixed operator set along with its binding metadata. KPL also lets programs declare
//! their own `infix`/`prefix` operators spelled with operator-class characters; those are not in this table and
//! surface in the token stream as custom operators (see [`is_operator_char`]).
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive** and exact: `"<<"` resolves, `"<<<"` does not.
//! - `precedence` is relative; higher binds tighter. Levels mirror the parser's precedence-climbing chain, from
//!   `||` (lowest binary level) to `*`/`/`/`%`.
//! - `-`, `*` and `&` are both infix and prefix (negation, dereference, address-of).
//!
//! ## Examples
//! ```rust
//! use kpl_core::lang::operators::{self, OperatorId};
//!
//! assert_eq!(operators::from_str(">>>"), Some(OperatorId::UShr));
//! assert!(operators::info_for(OperatorId::Star).precedence > operators::info_for(OperatorId::Plus).precedence);
//! ```

use super::registry::Stability;

/// Define whether an operator is infix (binary), prefix (unary), or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fixity {
    Infix,
    Prefix,
    InfixOrPrefix,
}

/// Stable identifier for every builtin operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorId {
    // Arithmetic
    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    // Assignment
    Eq,

    // Comparison
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Bitwise
    Amp,
    Pipe,
    Caret,
    Shl,
    Shr,
    UShr,

    // Logical
    AmpAmp,
    PipePipe,
    Bang,
}

/// Metadata for an operator.
#[derive(Debug, Clone, Copy)]
pub struct OperatorInfo {
    pub id: OperatorId,
    pub spelling: &'static str,
    pub precedence: u8,
    pub fixity: Fixity,
    pub description: &'static str,
    pub stability: Stability,
}

/// Precedence of prefix operators (`!x`, `-x`, `*p`, `&x`).
pub const PREFIX_PRECEDENCE: u8 = 13;

/// Registry of all builtin operators.
pub const OPERATORS: &[OperatorInfo] = &[
    // Arithmetic
    op(OperatorId::Plus, "+", 11, Fixity::Infix, "addition"),
    op(OperatorId::Minus, "-", 11, Fixity::InfixOrPrefix, "subtraction / negation"),
    op(OperatorId::Star, "*", 12, Fixity::InfixOrPrefix, "multiplication / dereference"),
    op(OperatorId::Slash, "/", 12, Fixity::Infix, "division"),
    op(OperatorId::Percent, "%", 12, Fixity::Infix, "remainder"),
    // Assignment (statement-level only)
    op(OperatorId::Eq, "=", 0, Fixity::Infix, "assignment"),
    // Comparison
    op(OperatorId::EqEq, "==", 8, Fixity::Infix, "equality"),
    op(OperatorId::NotEq, "!=", 8, Fixity::Infix, "inequality"),
    op(OperatorId::Lt, "<", 9, Fixity::Infix, "less than"),
    op(OperatorId::LtEq, "<=", 9, Fixity::Infix, "less than or equal"),
    op(OperatorId::Gt, ">", 9, Fixity::Infix, "greater than"),
    op(OperatorId::GtEq, ">=", 9, Fixity::Infix, "greater than or equal"),
    // Bitwise
    op(OperatorId::Amp, "&", 7, Fixity::InfixOrPrefix, "bitwise and / address-of"),
    op(OperatorId::Pipe, "|", 5, Fixity::Infix, "bitwise or"),
    op(OperatorId::Caret, "^", 6, Fixity::Infix, "bitwise xor"),
    op(OperatorId::Shl, "<<", 10, Fixity::Infix, "shift left"),
    op(OperatorId::Shr, ">>", 10, Fixity::Infix, "arithmetic shift right"),
    op(OperatorId::UShr, ">>>", 10, Fixity::Infix, "logical shift right"),
    // Logical
    op(OperatorId::AmpAmp, "&&", 4, Fixity::Infix, "logical and"),
    op(OperatorId::PipePipe, "||", 3, Fixity::Infix, "logical or"),
    op(OperatorId::Bang, "!", PREFIX_PRECEDENCE, Fixity::Prefix, "logical not"),
];

/// Characters that may appear in an operator spelling, builtin or user-declared.
pub const OPERATOR_CHARS: &str = "+-*\\/!@#$%^&~`|?<>=";

/// Return `true` if `c` can be part of an operator run.
pub fn is_operator_char(c: char) -> bool {
    OPERATOR_CHARS.contains(c)
}

/// Metadata record for `id`.
pub fn info_for(id: OperatorId) -> &'static OperatorInfo {
    OPERATORS
        .iter()
        .find(|o| o.id == id)
        .expect("INVARIANT: every OperatorId has an OPERATORS entry")
}

/// Canonical spelling of `id`.
pub fn as_str(id: OperatorId) -> &'static str {
    info_for(id).spelling
}

/// Resolve an operator spelling to its identifier.
///
/// ## Parameters
/// - `spelling`: Candidate operator run, e.g. `"<="`.
///
/// ## Returns
/// - `Some(id)` for a builtin operator, `None` for anything else (including user-declared operators).
pub fn from_str(spelling: &str) -> Option<OperatorId> {
    OPERATORS.iter().find(|o| o.spelling == spelling).map(|o| o.id)
}

// --- helpers -----------------------------------------------------------------

const fn op(id: OperatorId, spelling: &'static str, precedence: u8, fixity: Fixity, description: &'static str) -> OperatorInfo {
    OperatorInfo {
        id,
        spelling,
        precedence,
        fixity,
        description,
        stability: Stability::Stable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_chars_cover_every_spelling() {
        for info in OPERATORS {
            assert!(info.spelling.chars().all(is_operator_char), "{}", info.spelling);
        }
    }

    #[test]
    fn test_logical_levels_are_below_bitwise() {
        let or = info_for(OperatorId::PipePipe).precedence;
        let and = info_for(OperatorId::AmpAmp).precedence;
        let bit_or = info_for(OperatorId::Pipe).precedence;
        assert!(or < and && and < bit_or);
    }

    #[test]
    fn test_unknown_run_is_not_builtin() {
        assert_eq!(from_str("<>"), None);
        assert_eq!(from_str("**"), None);
    }
}
