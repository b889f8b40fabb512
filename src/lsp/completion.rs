//! Completion items for KPL and Blitz documents
//!
//! Items are context-free: the same list is offered anywhere in a document of the given language.

use std::collections::HashSet;

use kpl_core::blitz::{directives, instructions, registers};
use kpl_core::lang::keywords::{self, KEYWORDS};
use kpl_core::lang::snippets::{self, BLOCK_SNIPPETS, SPECIAL_SNIPPETS};
use tower_lsp::lsp_types::{CompletionItem, CompletionItemKind, Documentation, InsertTextFormat, MarkupContent, MarkupKind};

fn markdown(value: String) -> Option<Documentation> {
    Some(Documentation::MarkupContent(MarkupContent {
        kind: MarkupKind::Markdown,
        value,
    }))
}

fn snippet_item(label: &str, kind: CompletionItemKind, snippet: &str) -> CompletionItem {
    CompletionItem {
        label: label.to_string(),
        kind: Some(kind),
        insert_text: Some(snippet.to_string()),
        insert_text_format: Some(InsertTextFormat::SNIPPET),
        ..Default::default()
    }
}

/// Block snippets, their closing keywords, mid-block statements, builtin types, then every remaining keyword.
pub fn kpl_completions() -> Vec<CompletionItem> {
    let mut items = Vec::new();
    let mut seen = HashSet::new();

    for block in BLOCK_SNIPPETS {
        let start = keywords::as_str(block.start);
        let doc = match block.end {
            Some(end) => format!("Creates a {start} block with matching {}", keywords::as_str(end)),
            None => format!("Creates a {start} statement"),
        };
        items.push(CompletionItem {
            documentation: markdown(doc),
            ..snippet_item(start, CompletionItemKind::SNIPPET, block.snippet)
        });
        seen.insert(start);

        if let Some(end) = block.end {
            let end = keywords::as_str(end);
            if seen.insert(end) {
                items.push(CompletionItem {
                    label: end.to_string(),
                    kind: Some(CompletionItemKind::KEYWORD),
                    commit_characters: Some(vec!["\n".to_string()]),
                    ..Default::default()
                });
            }
        }
    }

    for special in SPECIAL_SNIPPETS {
        let label = keywords::as_str(special.keyword);
        if seen.insert(label) {
            items.push(snippet_item(label, CompletionItemKind::KEYWORD, special.snippet));
        }
    }

    for ty in snippets::all_types() {
        let label = keywords::as_str(ty.keyword);
        if seen.insert(label) {
            items.push(CompletionItem {
                label: label.to_string(),
                kind: Some(CompletionItemKind::TYPE_PARAMETER),
                documentation: markdown(ty.documentation.to_string()),
                ..Default::default()
            });
        }
    }

    for info in KEYWORDS {
        if seen.insert(info.canonical) {
            items.push(CompletionItem {
                label: info.canonical.to_string(),
                kind: Some(CompletionItemKind::KEYWORD),
                ..Default::default()
            });
        }
    }

    items
}

/// Instructions, directives and registers.
pub fn blitz_completions() -> Vec<CompletionItem> {
    let mut items = Vec::new();

    for def in instructions::INSTRUCTIONS {
        items.push(CompletionItem {
            label: def.mnemonic.to_string(),
            kind: Some(CompletionItemKind::FUNCTION),
            detail: Some(def.description.to_string()),
            documentation: kpl_syntax::blitz::instruction_hover_text(def.mnemonic)
                .and_then(|text| markdown(format!("```\n{text}\n```"))),
            ..Default::default()
        });
    }

    for def in directives::DIRECTIVES {
        items.push(CompletionItem {
            label: def.name.to_string(),
            kind: Some(CompletionItemKind::KEYWORD),
            detail: Some(def.description.to_string()),
            documentation: markdown(format!("```blitz-asm\n{}\n```", def.example)),
            ..Default::default()
        });
    }

    for name in registers::all_names() {
        let detail = registers::lookup(&name).map(|r| r.description);
        items.push(CompletionItem {
            label: name,
            kind: Some(CompletionItemKind::VARIABLE),
            detail,
            ..Default::default()
        });
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find<'a>(items: &'a [CompletionItem], label: &str) -> &'a CompletionItem {
        items
            .iter()
            .find(|i| i.label == label)
            .unwrap_or_else(|| panic!("missing completion {label}"))
    }

    #[test]
    fn test_kpl_block_snippet_and_end_keyword() {
        let items = kpl_completions();
        let if_item = find(&items, "if");
        assert_eq!(if_item.kind, Some(CompletionItemKind::SNIPPET));
        assert_eq!(if_item.insert_text_format, Some(InsertTextFormat::SNIPPET));
        assert_eq!(if_item.insert_text.as_deref(), Some("if ${1:condition}\n\t$0\nendIf"));
        match &if_item.documentation {
            Some(Documentation::MarkupContent(m)) => {
                assert_eq!(m.value, "Creates a if block with matching endIf");
            }
            other => panic!("unexpected documentation {other:?}"),
        }

        let end_if = find(&items, "endIf");
        assert_eq!(end_if.kind, Some(CompletionItemKind::KEYWORD));
        assert!(end_if.insert_text.is_none());
    }

    #[test]
    fn test_kpl_open_section_has_statement_doc() {
        let items = kpl_completions();
        match &find(&items, "var").documentation {
            Some(Documentation::MarkupContent(m)) => assert_eq!(m.value, "Creates a var statement"),
            other => panic!("unexpected documentation {other:?}"),
        }
    }

    #[test]
    fn test_kpl_labels_are_unique() {
        let items = kpl_completions();
        let mut labels: Vec<&str> = items.iter().map(|i| i.label.as_str()).collect();
        let total = labels.len();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), total);
        assert_eq!(find(&items, "int").kind, Some(CompletionItemKind::TYPE_PARAMETER));
        assert_eq!(find(&items, "else").kind, Some(CompletionItemKind::KEYWORD));
    }

    #[test]
    fn test_blitz_completions_cover_tables() {
        let items = blitz_completions();
        assert_eq!(find(&items, "add").kind, Some(CompletionItemKind::FUNCTION));
        assert_eq!(find(&items, ".text").detail.as_deref(), Some("Begin code section"));
        assert_eq!(find(&items, "r15").kind, Some(CompletionItemKind::VARIABLE));
        assert!(items.iter().any(|i| i.label == "pc"));
    }
}
