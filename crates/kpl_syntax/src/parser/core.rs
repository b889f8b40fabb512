/// Parser core types and entrypoint.
///
/// This chunk defines the [`Parser`] type and its top-level `parse()` entrypoints.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser` to keep all parser methods in a
///   single module while avoiding a single “god file”.
/// - Backtracking is a plain index reset: the token slice is immutable and the parser only
///   owns `pos`.

/// Parser state.
///
/// ## Notes
/// - The parser expects a stream without comment tokens (see [`lexer::strip_comments`]).
/// - A stream that does not end in `Eof` is copied once and terminated, so every cursor helper can rely on it.
/// - Errors are collected per declaration: a failing declaration is recorded, the parser skips
///   to the next section keyword, and parsing continues.
pub struct Parser<'a> {
    tokens: Cow<'a, [Token]>,
    pos: usize,
    errors: Vec<CompileError>,
}

impl<'a> Parser<'a> {
    /// Create a new parser for a token stream.
    ///
    /// ## Parameters
    /// - `tokens`: Comment-free token stream, normally ending in `Eof`.
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens: terminated(tokens),
            pos: 0,
            errors: Vec::new(),
        }
    }

    /// Parse the entire token stream into a [`Program`].
    ///
    /// ## Errors
    /// Returns every collected [`CompileError`] if any declaration failed to parse.
    pub fn parse(self) -> Result<Program, Vec<CompileError>> {
        let (program, errors) = self.parse_partial();
        if errors.is_empty() { Ok(program) } else { Err(errors) }
    }

    /// Parse as much as possible, returning the best-effort tree together with all errors.
    pub fn parse_partial(mut self) -> (Program, Vec<CompileError>) {
        if self.tokens.is_empty() {
            return (Program::default(), Vec::new());
        }
        let mut units = Vec::new();

        while !self.is_at_end() {
            let start = self.current_span();
            let unit = if self.match_keyword(KeywordId::Header) {
                self.header_file().map(FileUnit::Header)
            } else if self.match_keyword(KeywordId::Code) {
                self.code_file().map(FileUnit::Code)
            } else {
                Err(self.error_here("Expected 'header' or 'code' declaration"))
            };

            match unit {
                Ok(unit) => units.push(Spanned::new(unit, self.span_from(start))),
                Err(e) => {
                    self.errors.push(e);
                    self.synchronize_file();
                }
            }
        }

        let program = Program { file: None, units };
        (program, self.errors)
    }
}

/// Borrow `tokens` when it already ends in `Eof`; otherwise copy it and append one after the last token.
fn terminated(tokens: &[Token]) -> Cow<'_, [Token]> {
    match tokens.last() {
        None => Cow::Borrowed(tokens),
        Some(last) if last.kind == TokenKind::Eof => Cow::Borrowed(tokens),
        Some(last) => {
            let column = last.span.column + last.lexeme.chars().count();
            let span = Span::new(last.span.end, last.span.end, last.span.line, column);
            let mut owned = tokens.to_vec();
            owned.push(Token::new(TokenKind::Eof, "", span));
            Cow::Owned(owned)
        }
    }
}
