//! Editor snippet tables for KPL.
//!
//! Block statements come in `start ... end` pairs; completion inserts the whole block. Special statements are
//! the mid-block keywords (`else`, `case`, ...) that only make sense inside an open block. Type tables list the
//! builtin type names offered in type position.
//!
//! Snippet bodies use the LSP snippet syntax (`${1:name}` placeholders, `$0` final cursor).

use super::keywords::KeywordId;

/// A `start ... end` block with its insertion snippet.
#[derive(Debug, Clone, Copy)]
pub struct BlockSnippet {
    pub start: KeywordId,
    /// `None` for open-ended sections (`var`, `fields`, `methods`).
    pub end: Option<KeywordId>,
    pub snippet: &'static str,
}

/// A mid-block keyword with its insertion snippet.
#[derive(Debug, Clone, Copy)]
pub struct SpecialSnippet {
    pub keyword: KeywordId,
    pub snippet: &'static str,
}

/// A builtin type offered in type position.
#[derive(Debug, Clone, Copy)]
pub struct TypeSnippet {
    pub keyword: KeywordId,
    pub documentation: &'static str,
}

pub const BLOCK_SNIPPETS: &[BlockSnippet] = &[
    // Files
    block(KeywordId::Code, Some(KeywordId::EndCode), "code ${1:filename}\n\t$0\nendCode"),
    block(KeywordId::Header, Some(KeywordId::EndHeader), "header ${1:filename}\n\t$0\nendHeader"),
    // Interfaces and classes
    block(KeywordId::Interface, Some(KeywordId::EndInterface), "interface ${1:name}\n\t$0\nendInterface"),
    block(KeywordId::Class, Some(KeywordId::EndClass), "class ${1:name}\n\t$0\nendClass"),
    // Behaviors and functions
    block(KeywordId::Behavior, Some(KeywordId::EndBehavior), "behavior ${1:name}\n\t$0\nendBehavior"),
    block(KeywordId::Function, Some(KeywordId::EndFunction), "function ${1:name} ($2) $3\n\t$0\nendFunction"),
    block(KeywordId::Method, Some(KeywordId::EndMethod), "method ${1:name} ($2) $3\n\t$0\nendMethod"),
    // Control flow
    block(KeywordId::If, Some(KeywordId::EndIf), "if ${1:condition}\n\t$0\nendIf"),
    block(KeywordId::While, Some(KeywordId::EndWhile), "while ${1:condition}\n\t$0\nendWhile"),
    block(KeywordId::For, Some(KeywordId::EndFor), "for ${1:initialization}\n\t$0\nendFor"),
    block(
        KeywordId::Switch,
        Some(KeywordId::EndSwitch),
        "switch ${1:expression}\n\tcase ${2:value}:\n\t\t$0\nendSwitch",
    ),
    block(KeywordId::Try, Some(KeywordId::EndTry), "try\n\t$0\n\tcatch ${1:error}\nendTry"),
    block(KeywordId::Do, Some(KeywordId::Until), "do\n\t$0\nuntil ${1:condition}"),
    // Data structures and sections
    block(KeywordId::Record, Some(KeywordId::EndRecord), "record\n\t${1:name}: $0\nendRecord"),
    block(KeywordId::Var, None, "var\n\t${1:name}: $0"),
    block(KeywordId::Fields, None, "fields\n\t${1:name}: $0"),
    block(KeywordId::Methods, None, "methods\n\t${1:name} ($2) $0"),
];

pub const SPECIAL_SNIPPETS: &[SpecialSnippet] = &[
    SpecialSnippet {
        keyword: KeywordId::Else,
        snippet: "else\n\t$0",
    },
    SpecialSnippet {
        keyword: KeywordId::ElseIf,
        snippet: "elseIf ${1:condition}\n\t$0",
    },
    SpecialSnippet {
        keyword: KeywordId::Catch,
        snippet: "catch ${1:error}\n\t$0",
    },
    SpecialSnippet {
        keyword: KeywordId::Case,
        snippet: "case ${1:value}:\n\t$0",
    },
    SpecialSnippet {
        keyword: KeywordId::Default,
        snippet: "default:\n\t$0",
    },
];

pub const PRIMITIVE_TYPES: &[TypeSnippet] = &[
    TypeSnippet {
        keyword: KeywordId::Int,
        documentation: "Integer type",
    },
    TypeSnippet {
        keyword: KeywordId::Char,
        documentation: "Character type",
    },
    TypeSnippet {
        keyword: KeywordId::Bool,
        documentation: "Boolean type",
    },
    TypeSnippet {
        keyword: KeywordId::Double,
        documentation: "Double precision floating point type",
    },
    TypeSnippet {
        keyword: KeywordId::Void,
        documentation: "Void type",
    },
];

pub const SPECIAL_TYPES: &[TypeSnippet] = &[
    TypeSnippet {
        keyword: KeywordId::TypeOfNull,
        documentation: "Type of null value",
    },
    TypeSnippet {
        keyword: KeywordId::AnyType,
        documentation: "Any type",
    },
];

/// Block snippet opened by `start`, if any.
pub fn block_for(start: KeywordId) -> Option<&'static BlockSnippet> {
    BLOCK_SNIPPETS.iter().find(|b| b.start == start)
}

/// Return `true` if `id` closes one of the snippet blocks.
pub fn is_block_end(id: KeywordId) -> bool {
    BLOCK_SNIPPETS.iter().any(|b| b.end == Some(id))
}

/// All builtin type snippets, primitives first.
pub fn all_types() -> impl Iterator<Item = &'static TypeSnippet> {
    PRIMITIVE_TYPES.iter().chain(SPECIAL_TYPES)
}

const fn block(start: KeywordId, end: Option<KeywordId>, snippet: &'static str) -> BlockSnippet {
    BlockSnippet { start, end, snippet }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::keywords;

    #[test]
    fn test_block_snippets_start_with_their_keyword() {
        for b in BLOCK_SNIPPETS {
            assert!(b.snippet.starts_with(keywords::as_str(b.start)), "{:?}", b.start);
            if let Some(end) = b.end {
                assert!(b.snippet.contains(keywords::as_str(end)), "{:?}", end);
            }
        }
    }

    #[test]
    fn test_do_block_ends_with_until() {
        assert!(is_block_end(KeywordId::Until));
        assert!(!is_block_end(KeywordId::Do));
        assert_eq!(all_types().count(), 7);
    }
}
