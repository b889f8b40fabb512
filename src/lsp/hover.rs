//! Hover lookups for KPL and Blitz documents
//!
//! Positions here are 1-based `(line, column)`; the backend converts from LSP positions first.

use kpl_core::lang::keywords::{self, KeywordCategory, KeywordId};
use kpl_core::lang::snippets;
use kpl_syntax::blitz::{BlitzToken, SymbolManager, token_hover};
use kpl_syntax::lexer::{Token, TokenKind};

/// Hover text plus the 1-based `(line, column, length)` it applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverInfo {
    pub markdown: String,
    pub line: usize,
    pub column: usize,
    pub length: usize,
}

fn category_label(category: KeywordCategory) -> &'static str {
    match category {
        KeywordCategory::FileStructure => "file structure",
        KeywordCategory::Declaration => "declaration",
        KeywordCategory::ControlFlow => "control flow",
        KeywordCategory::Type => "type",
        KeywordCategory::Literal => "literal",
        KeywordCategory::Expression => "expression",
    }
}

/// Markdown describing a KPL keyword.
pub fn keyword_markdown(id: KeywordId) -> String {
    let spelling = keywords::as_str(id);
    let mut text = format!(
        "```kpl\n{}\n```\n\n*{} keyword*",
        spelling,
        category_label(keywords::category(id))
    );

    if let Some(ty) = snippets::all_types().find(|t| t.keyword == id) {
        text.push_str("\n\n");
        text.push_str(ty.documentation);
    } else if let Some(block) = snippets::block_for(id) {
        match block.end {
            Some(end) => text.push_str(&format!("\n\nCloses with `{}`", keywords::as_str(end))),
            None => text.push_str("\n\nOpens a section"),
        }
    } else if snippets::is_block_end(id) {
        let opener = snippets::BLOCK_SNIPPETS
            .iter()
            .find(|b| b.end == Some(id))
            .map(|b| keywords::as_str(b.start));
        if let Some(opener) = opener {
            text.push_str(&format!("\n\nEnds a `{opener}` block"));
        }
    }
    text
}

/// Hover for the KPL token under a 1-based position, if it is a keyword.
pub fn kpl_hover(tokens: &[Token], line: usize, column: usize) -> Option<HoverInfo> {
    let token = tokens.iter().find(|t| {
        let width = t.lexeme.chars().count();
        t.line() == line && column >= t.column() && column < t.column() + width
    })?;
    match token.kind {
        TokenKind::Keyword(id) => Some(HoverInfo {
            markdown: keyword_markdown(id),
            line: token.line(),
            column: token.column(),
            length: token.lexeme.chars().count(),
        }),
        _ => None,
    }
}

/// Hover for the Blitz token under a 1-based position.
pub fn blitz_hover(tokens: &[BlitzToken], symbols: &SymbolManager, line: usize, column: usize) -> Option<HoverInfo> {
    let token = tokens
        .iter()
        .find(|t| t.line == line && t.contains_column(column))?;
    let markdown = token_hover(token, symbols)?;
    Some(HoverInfo {
        markdown,
        line: token.line,
        column: token.column,
        length: token.length,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kpl_syntax::blitz::BlitzParser;
    use kpl_syntax::parser::parse_source;

    #[test]
    fn test_keyword_markdown_for_block() {
        insta::assert_snapshot!(keyword_markdown(KeywordId::While), @r"
        ```kpl
        while
        ```

        *control flow keyword*

        Closes with `endWhile`
        ");
    }

    #[test]
    fn test_keyword_markdown_for_type_and_end() {
        assert!(keyword_markdown(KeywordId::Int).ends_with("Integer type"));
        assert!(keyword_markdown(KeywordId::EndIf).ends_with("Ends a `if` block"));
    }

    #[test]
    fn test_kpl_hover_on_keyword_only() {
        let outcome = parse_source("code Main\n  function f ()\n  endFunction\nendCode\n");
        let hover = kpl_hover(&outcome.tokens, 2, 4).unwrap();
        assert_eq!((hover.line, hover.column, hover.length), (2, 3, 8));
        assert!(hover.markdown.contains("function"));

        assert!(kpl_hover(&outcome.tokens, 1, 6).is_none(), "identifier has no hover");
        assert!(kpl_hover(&outcome.tokens, 9, 1).is_none());
    }

    #[test]
    fn test_blitz_hover_uses_symbol_table() {
        let mut parser = BlitzParser::new();
        let result = parser.parse_text("Loop:\n\tjmp Loop\n");
        let hover = blitz_hover(&result.tokens, parser.symbols(), 2, 6).unwrap();
        assert_eq!(hover.column, 6);
        assert!(hover.markdown.contains("**Label**"));

        let hover = blitz_hover(&result.tokens, parser.symbols(), 2, 2).unwrap();
        assert!(hover.markdown.contains("Jump to address"));
        assert!(blitz_hover(&result.tokens, parser.symbols(), 2, 5).is_none());
    }
}
