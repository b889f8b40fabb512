//! Define the reserved word vocabulary for KPL.
//!
//! This module is the single source of truth for KPL reserved words: a stable identifier ([`KeywordId`]) plus a
//! const metadata table ([`KEYWORDS`]) recording canonical spellings and categories.
//!
//! ## Notes
//! - KPL is **case-sensitive**: [`from_str`] only accepts the exact canonical spelling. [`lookup`] takes an
//!   explicit [`CaseRule`] for tooling that wants lenient matching.
//! - Most block constructs close with a dedicated `end*` keyword (`if` ... `endIf`). [`closing_keyword`] maps an
//!   opener to its terminator.
//!
//! ## Examples
//! ```rust
//! use kpl_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("endHeader"), Some(KeywordId::EndHeader));
//! assert_eq!(keywords::as_str(KeywordId::ElseIf), "elseIf");
//! assert_eq!(keywords::from_str("EndHeader"), None);
//! ```

use super::registry::{CaseRule, Stability};

/// Stable identifier for every reserved word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    Alloc,
    AnyType,
    Array,
    ArraySize,
    AsInteger,
    AsPtrTo,
    Behavior,
    Bool,
    Break,
    By,
    Case,
    Catch,
    Char,
    Class,
    Code,
    Const,
    Continue,
    Debug,
    Default,
    Do,
    Double,
    Else,
    ElseIf,
    EndBehavior,
    EndClass,
    EndCode,
    EndFor,
    EndFunction,
    EndHeader,
    EndIf,
    EndInterface,
    EndMethod,
    EndRecord,
    EndSwitch,
    EndTry,
    EndWhile,
    Enum,
    Errors,
    Extends,
    External,
    False,
    Fields,
    For,
    Free,
    Function,
    Functions,
    Header,
    If,
    Implements,
    Infix,
    Int,
    Interface,
    IsInstanceOf,
    IsKindOf,
    Messages,
    Method,
    Methods,
    New,
    Null,
    Of,
    Prefix,
    Ptr,
    Record,
    Renaming,
    Return,
    Returns,
    SelfKw,
    SizeOf,
    Super,
    Superclass,
    Switch,
    Throw,
    To,
    True,
    Try,
    Type,
    TypeOfNull,
    Until,
    Uses,
    Var,
    Void,
    While,
}

/// High-level grouping for documentation and tooling.
///
/// Categories are metadata only; they do not enforce parsing context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    /// `header`/`code` file framing and `uses` clauses.
    FileStructure,
    /// Declaration sections and their members.
    Declaration,
    /// Statements and their block terminators.
    ControlFlow,
    /// Builtin types and type constructors.
    Type,
    /// Literal-like words (`true`, `null`, `self`).
    Literal,
    /// Expression-only operators spelled as words (`sizeOf`, `asInteger`).
    Expression,
}

/// Metadata for a keyword.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
    pub category: KeywordCategory,
    pub stability: Stability,
}

/// Registry of all reserved words, in alphabetical order.
pub const KEYWORDS: &[KeywordInfo] = &[
    info(KeywordId::Alloc, "alloc", KeywordCategory::Expression),
    info(KeywordId::AnyType, "anyType", KeywordCategory::Type),
    info(KeywordId::Array, "array", KeywordCategory::Type),
    info(KeywordId::ArraySize, "arraySize", KeywordCategory::Expression),
    info(KeywordId::AsInteger, "asInteger", KeywordCategory::Expression),
    info(KeywordId::AsPtrTo, "asPtrTo", KeywordCategory::Expression),
    info(KeywordId::Behavior, "behavior", KeywordCategory::Declaration),
    info(KeywordId::Bool, "bool", KeywordCategory::Type),
    info(KeywordId::Break, "break", KeywordCategory::ControlFlow),
    info(KeywordId::By, "by", KeywordCategory::ControlFlow),
    info(KeywordId::Case, "case", KeywordCategory::ControlFlow),
    info(KeywordId::Catch, "catch", KeywordCategory::ControlFlow),
    info(KeywordId::Char, "char", KeywordCategory::Type),
    info(KeywordId::Class, "class", KeywordCategory::Declaration),
    info(KeywordId::Code, "code", KeywordCategory::FileStructure),
    info(KeywordId::Const, "const", KeywordCategory::Declaration),
    info(KeywordId::Continue, "continue", KeywordCategory::ControlFlow),
    info(KeywordId::Debug, "debug", KeywordCategory::ControlFlow),
    info(KeywordId::Default, "default", KeywordCategory::ControlFlow),
    info(KeywordId::Do, "do", KeywordCategory::ControlFlow),
    info(KeywordId::Double, "double", KeywordCategory::Type),
    info(KeywordId::Else, "else", KeywordCategory::ControlFlow),
    info(KeywordId::ElseIf, "elseIf", KeywordCategory::ControlFlow),
    info(KeywordId::EndBehavior, "endBehavior", KeywordCategory::Declaration),
    info(KeywordId::EndClass, "endClass", KeywordCategory::Declaration),
    info(KeywordId::EndCode, "endCode", KeywordCategory::FileStructure),
    info(KeywordId::EndFor, "endFor", KeywordCategory::ControlFlow),
    info(KeywordId::EndFunction, "endFunction", KeywordCategory::Declaration),
    info(KeywordId::EndHeader, "endHeader", KeywordCategory::FileStructure),
    info(KeywordId::EndIf, "endIf", KeywordCategory::ControlFlow),
    info(KeywordId::EndInterface, "endInterface", KeywordCategory::Declaration),
    info(KeywordId::EndMethod, "endMethod", KeywordCategory::Declaration),
    info(KeywordId::EndRecord, "endRecord", KeywordCategory::Type),
    info(KeywordId::EndSwitch, "endSwitch", KeywordCategory::ControlFlow),
    info(KeywordId::EndTry, "endTry", KeywordCategory::ControlFlow),
    info(KeywordId::EndWhile, "endWhile", KeywordCategory::ControlFlow),
    info(KeywordId::Enum, "enum", KeywordCategory::Declaration),
    info(KeywordId::Errors, "errors", KeywordCategory::Declaration),
    info(KeywordId::Extends, "extends", KeywordCategory::Declaration),
    info(KeywordId::External, "external", KeywordCategory::Declaration),
    info(KeywordId::False, "false", KeywordCategory::Literal),
    info(KeywordId::Fields, "fields", KeywordCategory::Declaration),
    info(KeywordId::For, "for", KeywordCategory::ControlFlow),
    info(KeywordId::Free, "free", KeywordCategory::ControlFlow),
    info(KeywordId::Function, "function", KeywordCategory::Declaration),
    info(KeywordId::Functions, "functions", KeywordCategory::Declaration),
    info(KeywordId::Header, "header", KeywordCategory::FileStructure),
    info(KeywordId::If, "if", KeywordCategory::ControlFlow),
    info(KeywordId::Implements, "implements", KeywordCategory::Declaration),
    info(KeywordId::Infix, "infix", KeywordCategory::Declaration),
    info(KeywordId::Int, "int", KeywordCategory::Type),
    info(KeywordId::Interface, "interface", KeywordCategory::Declaration),
    info(KeywordId::IsInstanceOf, "isInstanceOf", KeywordCategory::Expression),
    info(KeywordId::IsKindOf, "isKindOf", KeywordCategory::Expression),
    info(KeywordId::Messages, "messages", KeywordCategory::Declaration),
    info(KeywordId::Method, "method", KeywordCategory::Declaration),
    info(KeywordId::Methods, "methods", KeywordCategory::Declaration),
    info(KeywordId::New, "new", KeywordCategory::Expression),
    info(KeywordId::Null, "null", KeywordCategory::Literal),
    info(KeywordId::Of, "of", KeywordCategory::Type),
    info(KeywordId::Prefix, "prefix", KeywordCategory::Declaration),
    info(KeywordId::Ptr, "ptr", KeywordCategory::Type),
    info(KeywordId::Record, "record", KeywordCategory::Type),
    info(KeywordId::Renaming, "renaming", KeywordCategory::FileStructure),
    info(KeywordId::Return, "return", KeywordCategory::ControlFlow),
    info(KeywordId::Returns, "returns", KeywordCategory::Declaration),
    info(KeywordId::SelfKw, "self", KeywordCategory::Literal),
    info(KeywordId::SizeOf, "sizeOf", KeywordCategory::Expression),
    info(KeywordId::Super, "super", KeywordCategory::Literal),
    info(KeywordId::Superclass, "superclass", KeywordCategory::Declaration),
    info(KeywordId::Switch, "switch", KeywordCategory::ControlFlow),
    info(KeywordId::Throw, "throw", KeywordCategory::ControlFlow),
    info(KeywordId::To, "to", KeywordCategory::ControlFlow),
    info(KeywordId::True, "true", KeywordCategory::Literal),
    info(KeywordId::Try, "try", KeywordCategory::ControlFlow),
    info(KeywordId::Type, "type", KeywordCategory::Declaration),
    info(KeywordId::TypeOfNull, "typeOfNull", KeywordCategory::Type),
    info(KeywordId::Until, "until", KeywordCategory::ControlFlow),
    info(KeywordId::Uses, "uses", KeywordCategory::FileStructure),
    info(KeywordId::Var, "var", KeywordCategory::Declaration),
    info(KeywordId::Void, "void", KeywordCategory::Type),
    info(KeywordId::While, "while", KeywordCategory::ControlFlow),
];

/// Canonical spelling.
///
/// ## Parameters
/// - `id`: Keyword identifier.
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).canonical
}

/// Category for `id`.
pub fn category(id: KeywordId) -> KeywordCategory {
    info_for(id).category
}

/// Full metadata record for `id`.
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    KEYWORDS
        .iter()
        .find(|k| k.id == id)
        .expect("INVARIANT: every KeywordId has a KEYWORDS entry")
}

/// Resolve an exact spelling to a keyword id.
///
/// ## Returns
/// - `Some(id)` if `s` is a reserved word, `None` otherwise.
pub fn from_str(s: &str) -> Option<KeywordId> {
    lookup(s, CaseRule::Sensitive)
}

/// Resolve a spelling under an explicit case rule.
pub fn lookup(s: &str, rule: CaseRule) -> Option<KeywordId> {
    KEYWORDS.iter().find(|k| rule.matches(s, k.canonical)).map(|k| k.id)
}

/// Return the keyword that closes a block opened by `id`, if any.
///
/// ## Examples
/// ```rust
/// use kpl_core::lang::keywords::{closing_keyword, KeywordId};
///
/// assert_eq!(closing_keyword(KeywordId::While), Some(KeywordId::EndWhile));
/// assert_eq!(closing_keyword(KeywordId::Do), Some(KeywordId::Until));
/// assert_eq!(closing_keyword(KeywordId::Return), None);
/// ```
pub fn closing_keyword(id: KeywordId) -> Option<KeywordId> {
    use KeywordId::*;
    let end = match id {
        Header => EndHeader,
        Code => EndCode,
        Interface => EndInterface,
        Class => EndClass,
        Behavior => EndBehavior,
        Function => EndFunction,
        Method => EndMethod,
        Record => EndRecord,
        If => EndIf,
        While => EndWhile,
        For => EndFor,
        Switch => EndSwitch,
        Try => EndTry,
        Do => Until,
        _ => return None,
    };
    Some(end)
}

// --- helpers -----------------------------------------------------------------

const fn info(id: KeywordId, canonical: &'static str, category: KeywordCategory) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        category,
        stability: Stability::Stable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_respects_case_rule() {
        assert_eq!(lookup("ENDIF", CaseRule::Insensitive), Some(KeywordId::EndIf));
        assert_eq!(lookup("ENDIF", CaseRule::Sensitive), None);
    }

    #[test]
    fn test_self_keyword_spelling() {
        assert_eq!(from_str("self"), Some(KeywordId::SelfKw));
        assert_eq!(category(KeywordId::SelfKw), KeywordCategory::Literal);
    }

    #[test]
    fn test_every_closing_keyword_is_reserved() {
        for info in KEYWORDS {
            if let Some(end) = closing_keyword(info.id) {
                assert!(from_str(as_str(end)).is_some());
            }
        }
    }
}
