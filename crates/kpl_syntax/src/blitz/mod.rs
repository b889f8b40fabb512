//! Blitz assembly frontend.
//!
//! Blitz has no parser in the usual sense: [`BlitzParser::parse_text`] tokenizes each line (recording labels,
//! constants, imports, exports and references as it goes), checks every line's head against the instruction and
//! directive tables, then validates the symbol table once the whole file has been seen.
//!
//! ## Module Structure
//!
//! - `lexer` - per-line tokenizer ([`tokenize_line`])
//! - `symbols` - [`SymbolManager`] with pending forward references
//! - `validator` - operand and format checks
//! - `hover` - hover text for instructions and tokens
//!
//! ## Notes
//! - Lines and columns are 1-based everywhere in this module.
//! - Mnemonics and registers match ignoring case by default ([`LexerConfig::blitz`]).

pub mod hover;
pub mod lexer;
pub mod symbols;
pub mod validator;

pub use hover::{instruction_hover_text, token_hover};
pub use lexer::{BlitzToken, BlitzTokenKind, tokenize_line};
pub use symbols::{Location, Symbol, SymbolKind, SymbolManager, SymbolValue};
pub use validator::{
    instruction_formats, is_valid_immediate, is_valid_memory_ref, is_valid_register, matching_format,
    validate_format, validate_operand_type,
};

use kpl_core::blitz::formats::split_operands;
use kpl_core::blitz::{directives, instructions};

use crate::diagnostics::Diagnostic;
use crate::lexer::LexerConfig;

/// Tokens and diagnostics of one Blitz file.
#[derive(Debug, Clone, Default)]
pub struct BlitzParseResult {
    pub tokens: Vec<BlitzToken>,
    /// Sorted by position.
    pub diagnostics: Vec<Diagnostic>,
}

impl BlitzParseResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Blitz tokenizer plus the symbol table of the last file it parsed.
#[derive(Debug)]
pub struct BlitzParser {
    config: LexerConfig,
    symbols: SymbolManager,
}

impl Default for BlitzParser {
    fn default() -> Self {
        Self::new()
    }
}

impl BlitzParser {
    pub fn new() -> Self {
        Self::with_config(LexerConfig::blitz())
    }

    pub fn with_config(config: LexerConfig) -> Self {
        Self {
            config,
            symbols: SymbolManager::new(),
        }
    }

    pub fn symbols(&self) -> &SymbolManager {
        &self.symbols
    }

    pub fn get_symbol(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get_symbol(name)
    }

    /// Tokenize a single line into this parser's symbol table.
    pub fn tokenize_line(&mut self, line: &str, line_number: usize) -> Vec<BlitzToken> {
        tokenize_line(line, line_number, self.config, &mut self.symbols)
    }

    /// Tokenize and validate a whole file. The symbol table is cleared first.
    #[tracing::instrument(skip_all, fields(bytes = text.len()))]
    pub fn parse_text(&mut self, text: &str) -> BlitzParseResult {
        self.symbols.reset();
        let mut result = BlitzParseResult::default();

        for (idx, line) in text.lines().enumerate() {
            let (tokens, diagnostics) = lexer::scan_line(line, idx + 1, self.config, &mut self.symbols);
            result.diagnostics.extend(diagnostics);
            check_line(line, &tokens, &mut result.diagnostics);
            result.tokens.extend(tokens);
        }

        result.diagnostics.extend(self.symbols.validate_symbols());
        result.diagnostics.sort_by_key(|d| (d.line, d.column));
        tracing::debug!(
            tokens = result.tokens.len(),
            diagnostics = result.diagnostics.len(),
            "blitz parse finished"
        );
        result
    }
}

/// Tokenize and validate a Blitz file with a fresh parser.
pub fn parse_text(text: &str) -> BlitzParseResult {
    BlitzParser::new().parse_text(text)
}

/// Check the statement that heads a line: directive spelling, instruction operand count.
fn check_line(line: &str, tokens: &[BlitzToken], diagnostics: &mut Vec<Diagnostic>) {
    let Some(head) = tokens
        .iter()
        .find(|t| !matches!(t.kind, BlitzTokenKind::Label | BlitzTokenKind::Comment))
    else {
        return;
    };

    match head.kind {
        BlitzTokenKind::Directive => {
            if directives::lookup(&head.text).is_none() {
                diagnostics.push(Diagnostic::warning(
                    format!("Unknown directive '{}'", head.text),
                    head.line,
                    head.column,
                    head.length,
                ));
            }
        }
        BlitzTokenKind::Instruction => {
            let Some(def) = instructions::lookup(&head.text) else {
                return;
            };
            let operands_end = lexer::comment_start(line).unwrap_or(line.len()).max(head.end());
            let found = split_operands(&line[head.end()..operands_end]).len();
            if !def.accepts_operand_count(found) {
                let mut counts: Vec<usize> = def.formats.iter().map(|u| u.operand_count()).collect();
                counts.sort_unstable();
                counts.dedup();
                let expected = counts.iter().map(usize::to_string).collect::<Vec<_>>().join(" or ");
                diagnostics.push(Diagnostic::warning(
                    format!("'{}' expects {expected} operand(s), found {found}", def.mnemonic),
                    head.line,
                    head.column,
                    head.length,
                ));
            }
        }
        BlitzTokenKind::Identifier => diagnostics.push(Diagnostic::error(
            format!("Unknown instruction '{}'", head.text),
            head.line,
            head.column,
            head.length,
        )),
        BlitzTokenKind::Constant => {}
        _ => diagnostics.push(Diagnostic::error(
            format!("Expected instruction, directive or label, found '{}'", head.text),
            head.line,
            head.column,
            head.length,
        )),
    }
}
