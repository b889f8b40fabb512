//! Lexer for the KPL programming language
//!
//! Handles tokenization including:
//! - Keywords and identifiers (case rule configurable via [`LexerConfig`])
//! - Integer (decimal and `0x` hex), double, character and string literals
//! - Builtin operators, plus generic runs of operator characters for user-declared operators
//! - `--` line comments and nesting `/* ... */` block comments, emitted as tokens
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (TokenKind, Token) and comment filtering
//!
//! ## Error recovery
//! A lexical error is recorded and the scanner skips past the next `;` or newline, then resumes. One bad
//! literal costs at most the rest of its line.

pub mod tokens;

pub use tokens::{Token, TokenKind, strip_comments};

use crate::ast::Span;
use crate::diagnostics::{CompileError, errors};
use kpl_core::lang::keywords;
use kpl_core::lang::operators;
use kpl_core::lang::punctuation;
use kpl_core::lang::registry::CaseRule;

/// Per-language lexing options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexerConfig {
    /// Match reserved words exactly (KPL) or ignoring ASCII case (Blitz).
    pub case_sensitive: bool,
}

impl LexerConfig {
    pub fn kpl() -> Self {
        Self { case_sensitive: true }
    }

    pub fn blitz() -> Self {
        Self { case_sensitive: false }
    }

    pub fn case_rule(&self) -> CaseRule {
        if self.case_sensitive {
            CaseRule::Sensitive
        } else {
            CaseRule::Insensitive
        }
    }
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self::kpl()
    }
}

// ============================================================================
// LEXER STATE
// ============================================================================

/// Start of the token currently being scanned.
#[derive(Debug, Clone, Copy)]
struct Mark {
    pos: usize,
    line: usize,
    column: usize,
}

/// Lexer for KPL source code.
///
/// Converts source text into a stream of tokens. Errors are collected on the side; the token stream is always
/// produced and always ends with exactly one `Eof` token.
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
    line: usize,
    column: usize,
    config: LexerConfig,
    tokens: Vec<Token>,
    errors: Vec<CompileError>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for KPL source code.
    pub fn new(source: &'a str) -> Self {
        Self::with_config(source, LexerConfig::kpl())
    }

    pub fn with_config(source: &'a str, config: LexerConfig) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current_pos: 0,
            line: 1,
            column: 1,
            config,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire source.
    ///
    /// The returned stream always ends with an `Eof` token. Check [`Lexer::has_errors`] afterwards.
    pub fn tokenize(&mut self) -> Vec<Token> {
        while !self.is_at_end() {
            self.scan_token();
        }

        let end = self.source.len();
        self.tokens
            .push(Token::new(TokenKind::Eof, "", Span::new(end, end, self.line, self.column)));

        std::mem::take(&mut self.tokens)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[CompileError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<CompileError> {
        self.errors
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn peek_next(&self) -> Option<char> {
        let mut iter = self.source[self.current_pos..].chars();
        iter.next();
        iter.next()
    }

    fn advance(&mut self) -> Option<char> {
        let (pos, c) = self.chars.next()?;
        self.current_pos = pos + c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn mark(&self) -> Mark {
        Mark {
            pos: self.current_pos,
            line: self.line,
            column: self.column,
        }
    }

    fn span_from(&self, mark: Mark) -> Span {
        Span::new(mark.pos, self.current_pos, mark.line, mark.column)
    }

    fn add_token(&mut self, kind: TokenKind, mark: Mark) {
        let lexeme = &self.source[mark.pos..self.current_pos];
        self.tokens.push(Token::new(kind, lexeme, self.span_from(mark)));
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    fn scan_token(&mut self) {
        while let Some(c) = self.peek() {
            if c == ' ' || c == '\t' || c == '\r' || c == '\n' {
                self.advance();
            } else {
                break;
            }
        }

        let mark = self.mark();
        let Some(c) = self.advance() else {
            return;
        };

        let result = match c {
            '-' if self.peek() == Some('-') => {
                self.line_comment(mark);
                Ok(())
            }
            '/' if self.peek() == Some('*') => {
                self.advance();
                self.block_comment(mark)
            }
            '=' => {
                let kind = if self.match_char('=') {
                    operators::OperatorId::EqEq
                } else {
                    operators::OperatorId::Eq
                };
                self.add_token(TokenKind::Operator(kind), mark);
                Ok(())
            }
            '"' => self.scan_string(mark),
            '\'' => self.scan_char(mark),
            '0'..='9' => self.scan_number(mark, c),
            _ if is_ident_start(c) => {
                self.scan_identifier(mark);
                Ok(())
            }
            _ => {
                if let Some(id) = punctuation::from_char(c) {
                    self.add_token(TokenKind::Punctuation(id), mark);
                    Ok(())
                } else if operators::is_operator_char(c) {
                    self.scan_operator(mark);
                    Ok(())
                } else {
                    Err(errors::unexpected_character(c, self.span_from(mark)))
                }
            }
        };

        if let Err(error) = result {
            tracing::debug!(line = error.span.line, message = %error.message, "lexer resync");
            self.errors.push(error);
            self.synchronize();
        }
    }

    /// Skip past the next `;` or newline.
    fn synchronize(&mut self) {
        while let Some(c) = self.advance() {
            if c == ';' || c == '\n' {
                return;
            }
        }
    }

    // ========================================================================
    // Comments
    // ========================================================================

    fn line_comment(&mut self, mark: Mark) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
        let text = self.source[mark.pos..self.current_pos].to_string();
        self.add_token(TokenKind::Comment(text), mark);
    }

    /// Scan a block comment; the opening `/*` is already consumed. Nested openers must each be closed.
    fn block_comment(&mut self, mark: Mark) -> Result<(), CompileError> {
        let mut depth = 1usize;
        while depth > 0 {
            match (self.peek(), self.peek_next()) {
                (None, _) => return Err(errors::unterminated_comment(self.span_from(mark))),
                (Some('/'), Some('*')) => {
                    self.advance();
                    self.advance();
                    depth += 1;
                }
                (Some('*'), Some('/')) => {
                    self.advance();
                    self.advance();
                    depth -= 1;
                }
                _ => {
                    self.advance();
                }
            }
        }
        let text = self.source[mark.pos..self.current_pos].to_string();
        self.add_token(TokenKind::Comment(text), mark);
        Ok(())
    }

    // ========================================================================
    // Operators
    // ========================================================================

    /// Maximal run of operator characters. Stops before a comment opener.
    fn scan_operator(&mut self, mark: Mark) {
        while let Some(c) = self.peek() {
            if !operators::is_operator_char(c) {
                break;
            }
            let next = self.peek_next();
            if (c == '-' && next == Some('-')) || (c == '/' && next == Some('*')) {
                break;
            }
            self.advance();
        }

        let spelling = &self.source[mark.pos..self.current_pos];
        let kind = match operators::from_str(spelling) {
            Some(id) => TokenKind::Operator(id),
            None => TokenKind::CustomOperator(spelling.to_string()),
        };
        self.add_token(kind, mark);
    }

    // ========================================================================
    // Identifier scanning
    // ========================================================================

    fn scan_identifier(&mut self, mark: Mark) {
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                self.advance();
            } else {
                break;
            }
        }

        let spelling = &self.source[mark.pos..self.current_pos];
        let kind = match keywords::lookup(spelling, self.config.case_rule()) {
            Some(id) => TokenKind::Keyword(id),
            None => TokenKind::Ident(spelling.to_string()),
        };
        self.add_token(kind, mark);
    }

    // ========================================================================
    // Numbers
    // ========================================================================

    fn scan_number(&mut self, mark: Mark, first: char) -> Result<(), CompileError> {
        if first == '0'
            && matches!(self.peek(), Some('x' | 'X'))
            && self.peek_next().is_some_and(|c| c.is_ascii_hexdigit())
        {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.advance();
            }
            let digits = &self.source[mark.pos + 2..self.current_pos];
            let value =
                i64::from_str_radix(digits, 16).map_err(|_| errors::integer_out_of_range(self.span_from(mark)))?;
            self.add_token(TokenKind::Int(value), mark);
            return Ok(());
        }

        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        // Only `.` followed by a digit starts a fraction, so `1.` before a field name stays an integer.
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
            if matches!(self.peek(), Some('e' | 'E')) {
                let next = self.peek_next();
                if next.is_some_and(|c| c.is_ascii_digit() || c == '+' || c == '-') {
                    self.advance();
                    if matches!(next, Some('+' | '-')) {
                        self.advance();
                    }
                    while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                        self.advance();
                    }
                }
            }
            let text = &self.source[mark.pos..self.current_pos];
            // A malformed exponent (`1.5e+`) parses as far as the digits allow.
            let value = text.parse::<f64>().unwrap_or_else(|_| {
                text.trim_end_matches(['e', 'E', '+', '-'])
                    .parse::<f64>()
                    .unwrap_or(0.0)
            });
            self.add_token(TokenKind::Double(value), mark);
            return Ok(());
        }

        let text = &self.source[mark.pos..self.current_pos];
        let value = text
            .parse::<i64>()
            .map_err(|_| errors::integer_out_of_range(self.span_from(mark)))?;
        self.add_token(TokenKind::Int(value), mark);
        Ok(())
    }

    // ========================================================================
    // Strings and characters
    // ========================================================================

    fn scan_string(&mut self, mark: Mark) -> Result<(), CompileError> {
        let mut value = String::new();
        loop {
            match self.peek() {
                None => return Err(errors::unterminated_string(self.span_from(mark))),
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    value.push(self.escape_sequence(mark)?);
                }
                Some(_) => {
                    if let Some(c) = self.advance() {
                        value.push(c);
                    }
                }
            }
        }
        self.add_token(TokenKind::String(value), mark);
        Ok(())
    }

    fn scan_char(&mut self, mark: Mark) -> Result<(), CompileError> {
        let value = match self.peek() {
            None => return Err(errors::unterminated_char(self.span_from(mark))),
            Some('\'') => {
                self.advance();
                return Err(errors::empty_char(self.span_from(mark)));
            }
            Some('\\') => {
                self.advance();
                self.escape_sequence(mark)?
            }
            Some(_) => match self.advance() {
                Some(c) => c,
                None => return Err(errors::unterminated_char(self.span_from(mark))),
            },
        };

        if !self.match_char('\'') {
            return Err(errors::unterminated_char(self.span_from(mark)));
        }
        self.add_token(TokenKind::Char(value), mark);
        Ok(())
    }

    /// Decode one escape; the backslash is already consumed.
    fn escape_sequence(&mut self, mark: Mark) -> Result<char, CompileError> {
        let Some(c) = self.advance() else {
            return Err(errors::unterminated_string(self.span_from(mark)));
        };
        let decoded = match c {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '\\' => '\\',
            '\'' => '\'',
            '"' => '"',
            '0' => '\0',
            'x' => {
                let hex: String = [self.peek(), self.peek_next()].into_iter().flatten().collect();
                let value = (hex.len() == 2 && hex.chars().all(|h| h.is_ascii_hexdigit()))
                    .then(|| u8::from_str_radix(&hex, 16).ok())
                    .flatten()
                    .ok_or_else(|| errors::invalid_escape('x', self.span_from(mark)))?;
                self.advance();
                self.advance();
                char::from(value)
            }
            other => return Err(errors::invalid_escape(other, self.span_from(mark))),
        };
        Ok(decoded)
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Check if a character can start an identifier (ASCII-only).
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Check if a character can continue an identifier (ASCII-only).
fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Lex KPL source, failing if any lexical error occurred.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str) -> Result<Vec<Token>, Vec<CompileError>> {
    let (tokens, errors) = lex_with_errors(source);
    if errors.is_empty() { Ok(tokens) } else { Err(errors) }
}

/// Lex KPL source, returning the (always complete) token stream together with any errors.
pub fn lex_with_errors(source: &str) -> (Vec<Token>, Vec<CompileError>) {
    let mut lexer = Lexer::new(source);
    let tokens = lexer.tokenize();
    (tokens, lexer.into_errors())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use kpl_core::lang::keywords::KeywordId;
    use kpl_core::lang::operators::OperatorId;
    use kpl_core::lang::punctuation::PunctuationId;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_keyword_registry_parity() {
        for k in keywords::KEYWORDS {
            let tokens = lex(k.canonical).unwrap_or_else(|errs| panic!("lex({:?}) failed: {:?}", k.canonical, errs));
            assert_eq!(tokens.len(), 2, "expected keyword + EOF for {:?}, got {:?}", k.id, tokens);
            assert!(tokens[0].kind.is_keyword(k.id));
            assert!(matches!(tokens[1].kind, TokenKind::Eof));
        }
    }

    #[test]
    fn test_operator_registry_parity() {
        for o in operators::OPERATORS {
            let tokens = lex(o.spelling).unwrap_or_else(|errs| panic!("lex({:?}) failed: {:?}", o.spelling, errs));
            assert_eq!(tokens.len(), 2, "expected operator + EOF for {:?}, got {:?}", o.spelling, tokens);
            assert!(tokens[0].kind.is_operator(o.id), "{:?} lexed as {:?}", o.spelling, tokens[0].kind);
        }
    }

    #[test]
    fn test_punctuation_registry_parity() {
        for p in punctuation::PUNCTUATION {
            let tokens = lex(p.spelling).unwrap();
            assert!(tokens[0].kind.is_punctuation(p.id), "{:?}", p.spelling);
        }
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        let k = kinds("while While");
        assert_eq!(k[0], TokenKind::Keyword(KeywordId::While));
        assert_eq!(k[1], TokenKind::Ident("While".to_string()));
    }

    #[test]
    fn test_case_insensitive_config() {
        let mut lexer = Lexer::with_config("WHILE", LexerConfig::blitz());
        let tokens = lexer.tokenize();
        assert!(tokens[0].kind.is_keyword(KeywordId::While));
        assert_eq!(tokens[0].lexeme, "WHILE");
    }

    #[test]
    fn test_numbers() {
        let k = kinds("42 0x1F 3.25 1.5e3 7");
        assert_eq!(k[0], TokenKind::Int(42));
        assert_eq!(k[1], TokenKind::Int(31));
        assert_eq!(k[2], TokenKind::Double(3.25));
        assert_eq!(k[3], TokenKind::Double(1500.0));
        assert_eq!(k[4], TokenKind::Int(7));
    }

    #[test]
    fn test_dot_without_digit_is_not_a_fraction() {
        let k = kinds("p.1");
        assert_eq!(k[0], TokenKind::Ident("p".into()));
        let k = kinds("1.x");
        assert_eq!(k[0], TokenKind::Int(1));
        assert_eq!(k[1], TokenKind::Punctuation(PunctuationId::Dot));
        assert_eq!(k[2], TokenKind::Ident("x".into()));
    }

    #[test]
    fn test_integer_out_of_range() {
        let errs = lex("x = 99999999999999999999").unwrap_err();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].message, "Integer literal out of range");
    }

    #[test]
    fn test_strings_and_escapes() {
        let k = kinds(r#""a\tb\n" "\x41\"" '\n' 'z'"#);
        assert_eq!(k[0], TokenKind::String("a\tb\n".into()));
        assert_eq!(k[1], TokenKind::String("A\"".into()));
        assert_eq!(k[2], TokenKind::Char('\n'));
        assert_eq!(k[3], TokenKind::Char('z'));
    }

    #[test]
    fn test_string_lexeme_is_raw() {
        let tokens = lex(r#""a\n""#).unwrap();
        assert_eq!(tokens[0].lexeme, r#""a\n""#);
    }

    #[test]
    fn test_char_errors() {
        let errs = lex("''").unwrap_err();
        assert_eq!(errs[0].message, "Empty character literal");
        let errs = lex("'ab'").unwrap_err();
        assert_eq!(errs[0].message, "Unterminated character literal");
    }

    #[test]
    fn test_invalid_escape() {
        let errs = lex(r#""\q""#).unwrap_err();
        assert_eq!(errs[0].message, "Invalid escape sequence '\\q'");
    }

    #[test]
    fn test_operators() {
        let k = kinds("a <= b == c >>> d <+> e != f");
        assert_eq!(k[1], TokenKind::Operator(OperatorId::LtEq));
        assert_eq!(k[3], TokenKind::Operator(OperatorId::EqEq));
        assert_eq!(k[5], TokenKind::Operator(OperatorId::UShr));
        assert_eq!(k[7], TokenKind::CustomOperator("<+>".into()));
        assert_eq!(k[9], TokenKind::Operator(OperatorId::NotEq));
    }

    #[test]
    fn test_comments_are_tokens() {
        let k = kinds("x -- trailing\n/* a /* nested */ b */ y");
        assert_eq!(k[0], TokenKind::Ident("x".into()));
        assert_eq!(k[1], TokenKind::Comment("-- trailing".into()));
        assert_eq!(k[2], TokenKind::Comment("/* a /* nested */ b */".into()));
        assert_eq!(k[3], TokenKind::Ident("y".into()));
        assert_eq!(k[4], TokenKind::Eof);
    }

    #[test]
    fn test_stray_comment_close() {
        let k = kinds("/* */ */");
        assert_eq!(k[0], TokenKind::Comment("/* */".into()));
        assert_eq!(k[1], TokenKind::CustomOperator("*/".into()));
    }

    #[test]
    fn test_unterminated_block_comment() {
        let errs = lex("/* /* */").unwrap_err();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].message, "Unterminated multiline comment");
    }

    #[test]
    fn test_recovery_skips_to_line_end() {
        let (tokens, errs) = lex_with_errors("a = § b c\nd = 1");
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].to_string(), "[1:5] Error: Unexpected character: §");
        let names: Vec<_> = tokens.iter().map(|t| t.lexeme.as_str()).collect();
        assert_eq!(names, vec!["a", "=", "d", "=", "1", ""]);
    }

    #[test]
    fn test_errors_on_several_lines_are_all_collected() {
        let (tokens, errs) = lex_with_errors("a = §\nb = ''\nc = \"x\\q\"\nd = 1");
        let reported: Vec<_> = errs.iter().map(|e| e.to_string()).collect();
        assert_eq!(
            reported,
            vec![
                "[1:5] Error: Unexpected character: §",
                "[2:5] Error: Empty character literal",
                "[3:5] Error: Invalid escape sequence '\\q'",
            ]
        );
        let names: Vec<_> = tokens.iter().map(|t| t.lexeme.as_str()).collect();
        assert_eq!(names, vec!["a", "=", "b", "=", "c", "=", "d", "=", "1", ""]);
        assert_eq!(tokens[6].line(), 4);
        assert!(lex("a = §\nb = ''").is_err_and(|all| all.len() == 2));
    }

    #[test]
    fn test_recovery_stops_at_semicolon() {
        let (tokens, errs) = lex_with_errors("\"oops\\q; x");
        assert_eq!(errs.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Ident("x".into()));
    }

    #[test]
    fn test_positions() {
        let tokens = lex("code T\n  x = 1").unwrap();
        let pos: Vec<_> = tokens.iter().map(|t| (t.line(), t.column())).collect();
        assert_eq!(pos, vec![(1, 1), (1, 6), (2, 3), (2, 5), (2, 7), (2, 8)]);
    }

    #[test]
    fn test_empty_source() {
        let tokens = lex("").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
    }

    #[test]
    fn test_strip_comments() {
        let tokens = strip_comments(lex("a -- c\nb").unwrap());
        assert_eq!(tokens.len(), 3);
    }
}
