/// Parse a token stream into an AST [`Program`].
///
/// This is the main public entrypoint for parsing.
///
/// ## Parameters
/// - `tokens`: Comment-free token stream produced by `kpl_syntax::lexer`.
///
/// ## Errors
/// Returns `Err(Vec<CompileError>)` with every syntax error found; the parser resynchronizes at
/// declaration and statement boundaries, so one call can report several errors.
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn parse(tokens: &[Token]) -> Result<Program, Vec<CompileError>> {
    Parser::new(tokens).parse()
}

/// Parse a token stream, returning the best-effort tree alongside any errors.
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn parse_partial(tokens: &[Token]) -> (Program, Vec<CompileError>) {
    Parser::new(tokens).parse_partial()
}

/// Everything the editor and CLI need from one KPL document.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub program: Program,
    /// Full token stream, comments included.
    pub tokens: Vec<Token>,
    /// Lexical errors first, then syntax errors, each in source order.
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutcome {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Lex and parse `source` in one step, collecting diagnostics instead of failing.
pub fn parse_source(source: &str) -> ParseOutcome {
    let (tokens, lex_errors) = lexer::lex_with_errors(source);
    let code = lexer::strip_comments(tokens.clone());
    let (program, parse_errors) = parse_partial(&code);

    let diagnostics = lex_errors
        .iter()
        .chain(parse_errors.iter())
        .map(|error| error.to_diagnostic(source))
        .collect();

    ParseOutcome {
        program,
        tokens,
        diagnostics,
    }
}
