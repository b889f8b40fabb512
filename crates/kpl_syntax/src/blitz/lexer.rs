//! Per-line Blitz tokenizer.
//!
//! Every line is scanned on its own. The only context carried within a line is whether the mnemonic slot has been
//! filled and whether the previous token was a control-transfer instruction (so that the next bare identifier is
//! a label reference). Symbol bookkeeping happens inline: label definitions, `.import`/`.export` operands,
//! constant definitions and identifier references go straight into the [`SymbolManager`].

use kpl_core::blitz::{instructions, registers};

use super::symbols::{Location, Symbol, SymbolKind, SymbolManager, SymbolValue};
use super::validator::parse_number;
use crate::diagnostics::Diagnostic;
use crate::lexer::LexerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlitzTokenKind {
    Instruction,
    Register,
    /// Label definition (`Loop:`) or a label operand of a branch, jump or call.
    Label,
    Identifier,
    Directive,
    /// Bracketed memory operand, `[r1+r2]`, kept whole.
    Memory,
    Number,
    String,
    /// `!` to end of line.
    Comment,
    /// Name on the left of a constant definition.
    Constant,
    Comma,
    Operator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlitzToken {
    pub kind: BlitzTokenKind,
    pub text: String,
    /// 1-based line.
    pub line: usize,
    /// 1-based column, counted in characters.
    pub column: usize,
    /// Length in characters.
    pub length: usize,
    /// Byte offset of the token within its line.
    pub start: usize,
}

impl BlitzToken {
    /// Byte offset just past the token within its line.
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }

    /// Return `true` if the 1-based `column` falls inside the token.
    pub fn contains_column(&self, column: usize) -> bool {
        column >= self.column && column < self.column + self.length
    }

    pub fn location(&self) -> Location {
        Location::new(self.line, self.column)
    }
}

/// Tokenize one line, recording symbols as a side effect.
///
/// `line_number` is 1-based. Lexical problems on the line are dropped; use
/// [`BlitzParser::parse_text`](super::BlitzParser::parse_text) to get them as diagnostics.
pub fn tokenize_line(
    line: &str,
    line_number: usize,
    config: LexerConfig,
    symbols: &mut SymbolManager,
) -> Vec<BlitzToken> {
    scan_line(line, line_number, config, symbols).0
}

pub(crate) fn scan_line(
    line: &str,
    line_number: usize,
    config: LexerConfig,
    symbols: &mut SymbolManager,
) -> (Vec<BlitzToken>, Vec<Diagnostic>) {
    let mut scanner = LineScanner {
        line,
        chars: line.char_indices().collect(),
        pos: 0,
        line_number,
        config,
        symbols,
        tokens: Vec::new(),
        diagnostics: Vec::new(),
        mnemonic_seen: false,
        expecting_label: false,
        directive: None,
    };
    scanner.scan();
    (scanner.tokens, scanner.diagnostics)
}

const OPERATOR_CHARS: &str = "+-*/%&|^~<>()=";

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Byte offset of the `!` that starts a trailing comment, ignoring `!` inside quotes.
pub fn comment_start(line: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        match quote {
            Some(q) => {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
            }
            None => match c {
                '"' | '\'' => quote = Some(c),
                '!' => return Some(i),
                _ => {}
            },
        }
    }
    None
}

/// If `line` is `IDENT = expr`, return the byte range of `IDENT`.
fn constant_definition(line: &str) -> Option<(usize, usize)> {
    let start = line.len() - line.trim_start().len();
    let rest = &line[start..];
    if !rest.starts_with(is_ident_start) {
        return None;
    }
    let name_len = rest.find(|c: char| !is_ident_char(c)).unwrap_or(rest.len());
    let after = rest[name_len..].trim_start();
    (after.starts_with('=') && !after.starts_with("==")).then_some((start, start + name_len))
}

struct LineScanner<'a, 's> {
    line: &'a str,
    chars: Vec<(usize, char)>,
    /// Index into `chars`; also the 0-based column.
    pos: usize,
    line_number: usize,
    config: LexerConfig,
    symbols: &'s mut SymbolManager,
    tokens: Vec<BlitzToken>,
    diagnostics: Vec<Diagnostic>,
    /// An instruction or directive (or an unknown word in its place) has been read.
    mnemonic_seen: bool,
    expecting_label: bool,
    /// Lowercased directive governing the rest of the line.
    directive: Option<String>,
}

impl LineScanner<'_, '_> {
    fn scan(&mut self) {
        if let Some((name_start, name_end)) = constant_definition(self.line) {
            self.constant_line(name_start, name_end);
        }

        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.pos += 1;
                continue;
            }
            let start = self.pos;
            match c {
                '!' => {
                    self.pos = self.chars.len();
                    self.push(BlitzTokenKind::Comment, start);
                }
                '"' | '\'' => self.string(c),
                '[' => self.memory(),
                ',' => {
                    self.pos += 1;
                    self.push(BlitzTokenKind::Comma, start);
                }
                '.' if self.peek_at(1).is_some_and(is_ident_start) => self.directive(),
                c if c.is_ascii_digit() => self.number(),
                c if is_ident_start(c) => self.word(),
                c if OPERATOR_CHARS.contains(c) => self.operator(c),
                other => {
                    self.pos += 1;
                    self.error(format!("Unexpected character: {other}"), start, 1);
                }
            }
        }
    }

    // ========================================================================
    // Cursor
    // ========================================================================

    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.chars.get(self.pos + n).map(|&(_, c)| c)
    }

    fn byte_at(&self, idx: usize) -> usize {
        self.chars.get(idx).map_or(self.line.len(), |&(b, _)| b)
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
    }

    fn location(&self, idx: usize) -> Location {
        Location::new(self.line_number, idx + 1)
    }

    fn text(&self, start: usize) -> &str {
        &self.line[self.byte_at(start)..self.byte_at(self.pos)]
    }

    fn push(&mut self, kind: BlitzTokenKind, start: usize) {
        self.tokens.push(BlitzToken {
            kind,
            text: self.text(start).to_string(),
            line: self.line_number,
            column: start + 1,
            length: self.pos - start,
            start: self.byte_at(start),
        });
        if kind != BlitzTokenKind::Instruction {
            self.expecting_label = false;
        }
    }

    fn error(&mut self, message: String, start: usize, length: usize) {
        self.diagnostics
            .push(Diagnostic::error(message, self.line_number, start + 1, length));
    }

    // ========================================================================
    // Token forms
    // ========================================================================

    /// `NAME = expr`: the name becomes a constant, the expression is scanned as operands.
    fn constant_line(&mut self, name_start: usize, name_end: usize) {
        let start = self.line[..name_start].chars().count();
        self.pos = start + self.line[name_start..name_end].chars().count();
        self.push(BlitzTokenKind::Constant, start);

        let name = self.line[name_start..name_end].to_string();
        let after_eq = self.line[name_end..]
            .find('=')
            .map_or(self.line.len(), |i| name_end + i + 1);
        let expr_end = comment_start(&self.line[after_eq..]).map_or(self.line.len(), |i| after_eq + i);
        let expr = self.line[after_eq..expr_end].trim();

        let mut symbol = Symbol::new(&name, SymbolKind::Constant).defined_at(self.location(start));
        if !expr.is_empty() {
            symbol = symbol.with_value(match parse_number(expr) {
                Some(n) => SymbolValue::Number(n),
                None => SymbolValue::Text(expr.to_string()),
            });
        }
        self.symbols.add_symbol(symbol);
        self.mnemonic_seen = true;
    }

    fn word(&mut self) {
        let start = self.pos;
        self.eat_while(is_ident_char);
        let text = self.text(start).to_string();
        let location = self.location(start);

        if self.peek() == Some(':') {
            self.push(BlitzTokenKind::Label, start);
            self.pos += 1;
            self.symbols
                .add_symbol(Symbol::new(text, SymbolKind::Label).defined_at(location));
            return;
        }

        if !self.mnemonic_seen {
            self.mnemonic_seen = true;
            if self.is_mnemonic(&text) {
                self.push(BlitzTokenKind::Instruction, start);
                self.expecting_label = instructions::takes_label_target(&text);
            } else if self.is_register(&text) {
                self.push(BlitzTokenKind::Register, start);
            } else {
                // Reported as an unknown instruction by the line checks.
                self.push(BlitzTokenKind::Identifier, start);
            }
            return;
        }

        if self.is_register(&text) {
            self.push(BlitzTokenKind::Register, start);
            return;
        }

        let declared = match self.directive.as_deref() {
            Some(".import") => Some(SymbolKind::Import),
            Some(".export") => Some(SymbolKind::Export),
            _ => None,
        };
        match declared {
            Some(SymbolKind::Import) => {
                self.push(BlitzTokenKind::Identifier, start);
                self.symbols.add_symbol(Symbol::new(text, SymbolKind::Import));
            }
            Some(kind) => {
                self.push(BlitzTokenKind::Identifier, start);
                self.symbols.add_symbol(Symbol::new(text, kind).referenced_at(location));
            }
            None => {
                let kind = if self.expecting_label {
                    BlitzTokenKind::Label
                } else {
                    BlitzTokenKind::Identifier
                };
                self.push(kind, start);
                self.symbols.add_reference(&text, location);
            }
        }
    }

    fn directive(&mut self) {
        let start = self.pos;
        self.pos += 1;
        self.eat_while(is_ident_char);
        self.push(BlitzTokenKind::Directive, start);
        self.directive = Some(self.text(start).to_ascii_lowercase());
        self.mnemonic_seen = true;
    }

    fn number(&mut self) {
        let start = self.pos;
        let radix_prefix = matches!(self.peek(), Some('0')) && matches!(self.peek_at(1), Some('x' | 'X' | 'b' | 'B'));
        if radix_prefix {
            self.pos += 2;
            self.eat_while(|c| c.is_ascii_hexdigit());
        } else {
            self.eat_while(|c| c.is_ascii_digit());
            if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
                self.pos += 1;
                self.eat_while(|c| c.is_ascii_digit());
            }
            if matches!(self.peek(), Some('e' | 'E')) {
                let sign = usize::from(matches!(self.peek_at(1), Some('+' | '-')));
                if self.peek_at(1 + sign).is_some_and(|c| c.is_ascii_digit()) {
                    self.pos += 1 + sign;
                    self.eat_while(|c| c.is_ascii_digit());
                }
            }
        }
        self.push(BlitzTokenKind::Number, start);
    }

    fn string(&mut self, quote: char) {
        let start = self.pos;
        self.pos += 1;
        let mut escaped = false;
        while let Some(c) = self.peek() {
            self.pos += 1;
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == quote {
                self.push(BlitzTokenKind::String, start);
                return;
            }
        }
        self.push(BlitzTokenKind::String, start);
        let what = if quote == '"' { "string" } else { "character" };
        self.error(format!("Unterminated {what} literal"), start, self.pos - start);
    }

    fn memory(&mut self) {
        let start = self.pos;
        self.eat_while(|c| c != ']');
        if self.peek() == Some(']') {
            self.pos += 1;
            self.push(BlitzTokenKind::Memory, start);
        } else {
            self.push(BlitzTokenKind::Memory, start);
            self.error("Expected ']' to close memory reference".to_string(), start, self.pos - start);
        }
    }

    fn operator(&mut self, c: char) {
        let start = self.pos;
        self.pos += 1;
        if matches!(c, '<' | '>') && self.peek() == Some(c) {
            self.pos += 1;
        }
        self.push(BlitzTokenKind::Operator, start);
    }

    // ========================================================================
    // Case rules
    // ========================================================================

    fn is_mnemonic(&self, word: &str) -> bool {
        match instructions::lookup(word) {
            Some(def) => !self.config.case_sensitive || def.mnemonic == word,
            None => false,
        }
    }

    fn is_register(&self, word: &str) -> bool {
        match registers::lookup(word) {
            Some(reg) => !self.config.case_sensitive || reg.name == word,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use BlitzTokenKind::*;

    fn kinds(line: &str) -> Vec<BlitzTokenKind> {
        let mut symbols = SymbolManager::new();
        tokenize_line(line, 1, LexerConfig::blitz(), &mut symbols)
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_label_and_instruction() {
        assert_eq!(
            kinds("L1: add r1,r2,r3"),
            vec![Label, Instruction, Register, Comma, Register, Comma, Register]
        );
    }

    #[test]
    fn test_branch_target_is_label_reference() {
        let mut symbols = SymbolManager::new();
        let tokens = tokenize_line(" jmp L1", 2, LexerConfig::blitz(), &mut symbols);
        assert_eq!(tokens[1].kind, Label);
        assert_eq!((tokens[1].line, tokens[1].column, tokens[1].length), (2, 6, 2));
        let pending: Vec<_> = symbols.pending_references().collect();
        assert_eq!(pending, vec![("L1", &[Location::new(2, 6)][..])]);
    }

    #[test]
    fn test_label_expectation_ends_after_one_token() {
        assert_eq!(kinds("call r1+Table"), vec![Instruction, Register, Operator, Identifier]);
        assert_eq!(kinds("set Table,r1"), vec![Instruction, Identifier, Comma, Register]);
    }

    #[test]
    fn test_mnemonics_and_registers_ignore_case() {
        assert_eq!(kinds("ADD R1,R2,R3"), vec![Instruction, Register, Comma, Register, Comma, Register]);

        let mut symbols = SymbolManager::new();
        let strict = LexerConfig { case_sensitive: true };
        let tokens = tokenize_line("ADD r1,r2,r3", 1, strict, &mut symbols);
        assert_eq!(tokens[0].kind, Identifier);
    }

    #[test]
    fn test_comment_and_string() {
        assert_eq!(
            kinds("msg: .ascii \"Hi!\\n\"  ! greeting"),
            vec![Label, Directive, String, Comment]
        );
        assert_eq!(comment_start("  .ascii \"a!b\" ! c"), Some(15));
        assert_eq!(comment_start("'!'"), None);
    }

    #[test]
    fn test_memory_operand_is_one_token() {
        let mut symbols = SymbolManager::new();
        let tokens = tokenize_line("  load [r14+8],r1", 1, LexerConfig::blitz(), &mut symbols);
        assert_eq!(tokens[1].kind, Memory);
        assert_eq!(tokens[1].text, "[r14+8]");
        assert_eq!(tokens[1].column, 8);
    }

    #[test]
    fn test_numbers() {
        let mut symbols = SymbolManager::new();
        let tokens = tokenize_line(".word 0x1F, 12, 0b101, 1.5e3", 1, LexerConfig::blitz(), &mut symbols);
        let numbers: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == Number)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(numbers, vec!["0x1F", "12", "0b101", "1.5e3"]);
    }

    #[test]
    fn test_constant_line() {
        let mut symbols = SymbolManager::new();
        let tokens = tokenize_line("SIZE = 0x100   ! bytes", 3, LexerConfig::blitz(), &mut symbols);
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![Constant, Operator, Number, Comment]);

        let size = symbols.get_symbol("SIZE").unwrap();
        assert_eq!(size.kind, SymbolKind::Constant);
        assert_eq!(size.definition, Some(Location::new(3, 1)));
        assert_eq!(size.value, Some(SymbolValue::Number(256)));
    }

    #[test]
    fn test_constant_with_expression_records_references() {
        let mut symbols = SymbolManager::new();
        tokenize_line("END = Base + 4", 1, LexerConfig::blitz(), &mut symbols);
        assert_eq!(
            symbols.get_symbol("END").unwrap().value,
            Some(SymbolValue::Text("Base + 4".to_string()))
        );
        assert_eq!(symbols.pending_references().count(), 1);
    }

    #[test]
    fn test_import_and_export_operands() {
        let mut symbols = SymbolManager::new();
        tokenize_line("  .import printf", 1, LexerConfig::blitz(), &mut symbols);
        tokenize_line("  .export main", 2, LexerConfig::blitz(), &mut symbols);
        assert_eq!(symbols.get_symbol("printf").unwrap().kind, SymbolKind::Import);
        let main = symbols.get_symbol("main").unwrap();
        assert_eq!(main.kind, SymbolKind::Export);
        assert_eq!(main.references, vec![Location::new(2, 11)]);
    }

    #[test]
    fn test_unterminated_string_is_reported() {
        let mut symbols = SymbolManager::new();
        let (tokens, diags) = scan_line(".ascii \"oops", 4, LexerConfig::blitz(), &mut symbols);
        assert_eq!(tokens[1].kind, String);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].message, "Unterminated string literal");
        assert_eq!((diags[0].line, diags[0].column), (4, 8));
    }

    #[test]
    fn test_unexpected_character() {
        let mut symbols = SymbolManager::new();
        let (_, diags) = scan_line("add r1,#2,r3", 1, LexerConfig::blitz(), &mut symbols);
        assert_eq!(diags[0].message, "Unexpected character: #");
        assert_eq!(diags[0].column, 8);
    }
}
