//! Hover text for Blitz tokens.
//!
//! [`instruction_hover_text`] is plain text; [`token_hover`] renders Markdown for editors.

use std::fmt::Write as _;

use kpl_core::blitz::{directives, instructions, registers};

use super::lexer::{BlitzToken, BlitzTokenKind};
use super::symbols::{SymbolKind, SymbolManager};
use super::validator::parse_number;

/// Description, category and every format of `mnemonic`.
pub fn instruction_hover_text(mnemonic: &str) -> Option<String> {
    let def = instructions::lookup(mnemonic)?;
    let mut text = format!("{}\nCategory: {}\n\nFormats:\n", def.description, def.category);
    for usage in def.formats {
        let _ = write!(text, "\n{}: {}", usage.format, usage.example);
        if let Some(description) = usage.description {
            let _ = write!(text, "\n   {description}");
        }
    }
    Some(text)
}

/// Markdown hover for a token, or `None` for tokens without hover (commas, operators, comments).
pub fn token_hover(token: &BlitzToken, symbols: &SymbolManager) -> Option<String> {
    let mut md = code_block(&token.text);
    match token.kind {
        BlitzTokenKind::Instruction => {
            let Some(def) = instructions::lookup(&token.text) else {
                return Some("Unknown instruction".to_string());
            };
            let _ = write!(md, "\n\n{}\n\n**Formats:**\n", def.description);
            for usage in def.formats {
                let _ = writeln!(md, "- `{}`", usage.example);
                if let Some(description) = usage.description {
                    let _ = writeln!(md, "  {description}");
                }
            }
            let _ = writeln!(md, "\n**Category:** {}", def.category);
        }
        BlitzTokenKind::Register => {
            let Some(reg) = registers::lookup(&token.text) else {
                return Some("Unknown register".to_string());
            };
            let _ = write!(md, "\n\n{}", reg.description);
            if reg.reserved {
                md.push_str("\n\n*This is a reserved register*");
            }
        }
        BlitzTokenKind::Label | BlitzTokenKind::Identifier | BlitzTokenKind::Constant => {
            let Some(symbol) = symbols.get_symbol(&token.text) else {
                return Some(format!("Symbol: {}", token.text));
            };
            match symbol.kind {
                SymbolKind::Label => {
                    md.push_str("\n\n**Label**\n");
                    if let Some(def) = symbol.definition {
                        let _ = write!(md, "Defined at line {}", def.line);
                    }
                    let _ = write!(md, "\nUsed {} time(s)", symbol.references.len());
                }
                SymbolKind::Import => md.push_str("\n\n**Imported Symbol**\nDefined in another file"),
                SymbolKind::Export => {
                    md.push_str("\n\n**Exported Symbol**\n");
                    if let Some(def) = symbol.definition {
                        let _ = write!(md, "Defined at line {}", def.line);
                    }
                }
                SymbolKind::Constant => {
                    md.push_str("\n\n**Constant**");
                    if let Some(value) = &symbol.value {
                        let _ = write!(md, "\nValue: `{value}`");
                    }
                }
            }
        }
        BlitzTokenKind::Directive => {
            let description = directives::lookup(&token.text).map_or("Assembler directive", |d| d.description);
            let _ = write!(md, "\n\n{description}");
        }
        BlitzTokenKind::Memory => {
            md.push_str("\n\nMemory access");
            if token.text.contains("++") {
                md.push_str("\n\nPost-increment memory access");
            } else if token.text.contains("--") {
                md.push_str("\n\nPre-decrement memory access");
            } else if token.text.contains('+') {
                md.push_str("\n\nOffset-based memory access");
            }
        }
        BlitzTokenKind::Number => {
            let lower = token.text.to_ascii_lowercase();
            if let Some(value) = parse_number(&token.text) {
                if lower.starts_with("0x") || lower.starts_with("0b") {
                    let _ = write!(md, "\n\nDecimal: {value}");
                } else {
                    let _ = write!(md, "\n\nHex: 0x{value:X}");
                }
            }
        }
        BlitzTokenKind::String | BlitzTokenKind::Comment | BlitzTokenKind::Comma | BlitzTokenKind::Operator => {
            return None;
        }
    }
    Some(md)
}

fn code_block(text: &str) -> String {
    format!("```blitz-asm\n{text}\n```")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blitz::BlitzParser;

    fn hover_at(source: &str, line: usize, column: usize) -> Option<String> {
        let mut parser = BlitzParser::new();
        let result = parser.parse_text(source);
        let token = result
            .tokens
            .iter()
            .find(|t| t.line == line && t.contains_column(column))?;
        token_hover(token, parser.symbols())
    }

    #[test]
    fn test_instruction_hover_text() {
        insta::assert_snapshot!(instruction_hover_text("jmp").unwrap(), @r"
        Jump to address
        Category: control

        Formats:

        C: jmp Ra+Rc
           Jump to address Ra+Rc
        F: jmp data24
           Jump to immediate address
        ");
        assert!(instruction_hover_text("frob").is_none());
    }

    #[test]
    fn test_label_hover_counts_uses() {
        let md = hover_at("Loop: nop\n  jmp Loop\n  be Loop", 2, 8).unwrap();
        assert!(md.starts_with("```blitz-asm\nLoop\n```"));
        assert!(md.contains("**Label**\nDefined at line 1\nUsed 2 time(s)"));
    }

    #[test]
    fn test_register_hover() {
        let md = hover_at("  mov r1,r2", 1, 7).unwrap();
        assert!(md.ends_with("32-bit general purpose register 1"));
    }

    #[test]
    fn test_number_hover_converts_base() {
        assert!(hover_at("  set 255,r1", 1, 7).unwrap().ends_with("Hex: 0xFF"));
        assert!(hover_at("  set 0x10,r1", 1, 7).unwrap().ends_with("Decimal: 16"));
    }

    #[test]
    fn test_memory_hover() {
        let md = hover_at("  pop [r14++],r1", 1, 8).unwrap();
        assert!(md.ends_with("Post-increment memory access"));
    }

    #[test]
    fn test_no_hover_on_punctuation() {
        assert!(hover_at("  mov r1,r2", 1, 9).is_none());
    }
}
