/// Small shared productions: identifiers, identifier lists, argument and parameter lists.
impl<'a> Parser<'a> {
    // ========================================================================
    // Utilities
    // ========================================================================

    /// Consume an identifier and return its spelling.
    fn expect_ident(&mut self, msg: &str) -> Result<Ident, CompileError> {
        if let TokenKind::Ident(name) = &self.peek().kind {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(self.error_here(msg))
        }
    }

    /// `ID {, ID}`
    fn id_list(&mut self) -> Result<Vec<Ident>, CompileError> {
        let mut ids = vec![self.expect_ident("Expected identifier")?];
        while self.match_punct(PunctuationId::Comma) {
            ids.push(self.expect_ident("Expected identifier")?);
        }
        Ok(ids)
    }

    /// `( [Expr {, Expr}] )`
    fn arg_list(&mut self) -> Result<Vec<Spanned<Expr>>, CompileError> {
        self.expect_punct(PunctuationId::LParen, "Expected '(' for argument list")?;
        let mut args = Vec::new();
        if self.match_punct(PunctuationId::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.expr()?);
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        self.expect_punct(PunctuationId::RParen, "Expected ')' after arguments")?;
        Ok(args)
    }

    /// `( [ID {, ID} : Type {, ID {, ID} : Type}] )`
    ///
    /// A group `a, b: int` expands to one [`Parameter`] per name, each with its own copy of the type.
    fn param_list(&mut self) -> Result<Vec<Parameter>, CompileError> {
        self.expect_punct(PunctuationId::LParen, "Expected '(' for parameter list")?;
        let mut params = Vec::new();
        if self.match_punct(PunctuationId::RParen) {
            return Ok(params);
        }
        loop {
            let names = self.id_list()?;
            self.expect_punct(PunctuationId::Colon, "Expected ':' after parameter names")?;
            let ty = self.parse_type()?;
            params.extend(names.into_iter().map(|name| Parameter { name, ty: ty.clone() }));
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        self.expect_punct(PunctuationId::RParen, "Expected ')' after parameters")?;
        Ok(params)
    }
}
