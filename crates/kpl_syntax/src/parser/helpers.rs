/// Token-stream helpers and error recovery.
///
/// This chunk contains the low-level primitives used throughout parsing:
/// - Peeking/consuming tokens (`peek`, `advance`)
/// - Matching / expecting keywords, operators, and punctuation
/// - Cursor snapshots for speculative parsing (`checkpoint`, `restore`)
/// - Error recovery (`synchronize`, `synchronize_file`)
/// Saved parser position.
#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    pos: usize,
    errors: usize,
}

impl<'a> Parser<'a> {
    // ========================================================================
    // Helpers
    // ========================================================================

    /// Return `true` if the current token is [`TokenKind::Eof`].
    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    /// Return the current token without consuming it.
    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Return the token after the current token without consuming it.
    fn peek_next(&self) -> &Token {
        if self.pos + 1 < self.tokens.len() {
            &self.tokens[self.pos + 1]
        } else {
            &self.tokens[self.tokens.len() - 1]
        }
    }

    /// Return the token `n` positions ahead of the current one (`Eof` past the end).
    fn peek_nth(&self, n: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + n).min(last)]
    }

    /// Return the most recently consumed token (the current one at the start of input).
    fn previous(&self) -> &Token {
        &self.tokens[self.pos.saturating_sub(1).min(self.tokens.len() - 1)]
    }

    /// Advance to the next token and return the token we just consumed.
    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.pos += 1;
        }
        self.previous()
    }

    /// Snapshot the cursor for speculative parsing.
    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            errors: self.errors.len(),
        }
    }

    /// Rewind to `checkpoint`, dropping errors recorded since.
    fn restore(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.pos;
        self.errors.truncate(checkpoint.errors);
    }

    /// Return `true` if the current token is the given keyword.
    fn check_keyword(&self, id: KeywordId) -> bool {
        self.peek().kind.is_keyword(id)
    }

    /// Return `true` if the current token is the given punctuation.
    fn check_punct(&self, id: PunctuationId) -> bool {
        self.peek().kind.is_punctuation(id)
    }

    /// Return `true` if the current token is the given operator.
    fn check_op(&self, id: OperatorId) -> bool {
        self.peek().kind.is_operator(id)
    }

    fn check_ident(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Ident(_))
    }

    /// Identifier immediately followed by `:` (a keyword-message or keyword-method segment).
    fn check_keyword_segment(&self) -> bool {
        self.check_ident() && self.peek_next().kind.is_punctuation(PunctuationId::Colon)
    }

    fn match_keyword(&mut self, id: KeywordId) -> bool {
        if self.check_keyword(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_punct(&mut self, id: PunctuationId) -> bool {
        if self.check_punct(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_op(&mut self, id: OperatorId) -> bool {
        if self.check_op(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, id: KeywordId, msg: &str) -> Result<&Token, CompileError> {
        if self.check_keyword(id) {
            Ok(self.advance())
        } else {
            Err(self.error_here(msg))
        }
    }

    fn expect_punct(&mut self, id: PunctuationId, msg: &str) -> Result<&Token, CompileError> {
        if self.check_punct(id) {
            Ok(self.advance())
        } else {
            Err(self.error_here(msg))
        }
    }

    fn expect_op(&mut self, id: OperatorId, msg: &str) -> Result<&Token, CompileError> {
        if self.check_op(id) {
            Ok(self.advance())
        } else {
            Err(self.error_here(msg))
        }
    }

    /// Syntax error at the current token.
    fn error_here(&self, msg: &str) -> CompileError {
        let token = self.peek();
        let error = CompileError::syntax(msg.to_string(), token.span);
        if matches!(token.kind, TokenKind::Eof) {
            error
        } else {
            error.with_found(token.lexeme.clone())
        }
    }

    fn current_span(&self) -> Span {
        self.peek().span
    }

    /// Span from `start` through the last consumed token.
    fn span_from(&self, start: Span) -> Span {
        if self.pos == 0 {
            return start;
        }
        start.merge(self.previous().span)
    }

    // ========================================================================
    // Error recovery
    // ========================================================================

    /// Return `true` at a token that opens a declaration section or closes a file.
    fn is_new_section(&self) -> bool {
        matches!(
            self.peek().kind.keyword_id(),
            Some(
                KeywordId::Const
                    | KeywordId::Errors
                    | KeywordId::Var
                    | KeywordId::Enum
                    | KeywordId::Type
                    | KeywordId::Functions
                    | KeywordId::Function
                    | KeywordId::Interface
                    | KeywordId::Class
                    | KeywordId::Behavior
                    | KeywordId::EndCode
                    | KeywordId::EndHeader
            )
        )
    }

    /// Return `true` at a keyword that ends a statement list.
    fn is_block_end(&self) -> bool {
        matches!(
            self.peek().kind.keyword_id(),
            Some(
                KeywordId::EndFunction
                    | KeywordId::EndMethod
                    | KeywordId::EndIf
                    | KeywordId::Else
                    | KeywordId::ElseIf
                    | KeywordId::EndWhile
                    | KeywordId::Until
                    | KeywordId::EndFor
                    | KeywordId::EndSwitch
                    | KeywordId::Case
                    | KeywordId::Default
                    | KeywordId::EndTry
                    | KeywordId::Catch
            )
        )
    }

    /// Skip to the next section keyword after a failed declaration that started at `start`.
    fn synchronize(&mut self, start: usize) {
        if self.pos == start {
            self.advance();
        }
        while !self.is_at_end() && !self.is_new_section() {
            self.advance();
        }
        tracing::debug!(pos = self.pos, "parser resync");
    }

    /// Skip the rest of a failed statement: the remainder of its line, stopping early at block
    /// and section keywords.
    fn synchronize_statement(&mut self, start: usize) {
        if self.pos == start {
            self.advance();
        }
        let line = self.previous().span.line;
        while !self.is_at_end() && !self.is_block_end() && !self.is_new_section() && self.peek().span.line == line {
            self.advance();
        }
        tracing::debug!(pos = self.pos, "parser statement resync");
    }

    /// Skip to the next `header` or `code` keyword after a failed file.
    fn synchronize_file(&mut self) {
        self.advance();
        while !self.is_at_end() && !self.check_keyword(KeywordId::Header) && !self.check_keyword(KeywordId::Code) {
            self.advance();
        }
    }
}
