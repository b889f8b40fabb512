/// Type parsing.
///
/// This chunk parses basic types, `ptr to`, `record ... endRecord`, `array [dims] of`,
/// `function (..) returns`, and named types with optional type arguments.
impl<'a> Parser<'a> {
    // ========================================================================
    // Types
    // ========================================================================

    /// Parse a type.
    fn parse_type(&mut self) -> Result<Spanned<Type>, CompileError> {
        let start = self.current_span();

        let basic = match self.peek().kind.keyword_id() {
            Some(KeywordId::Int) => Some(Type::Int),
            Some(KeywordId::Char) => Some(Type::Char),
            Some(KeywordId::Double) => Some(Type::Double),
            Some(KeywordId::Bool) => Some(Type::Bool),
            Some(KeywordId::Void) => Some(Type::Void),
            Some(KeywordId::TypeOfNull) => Some(Type::TypeOfNull),
            Some(KeywordId::AnyType) => Some(Type::AnyType),
            _ => None,
        };
        if let Some(ty) = basic {
            self.advance();
            return Ok(Spanned::new(ty, start));
        }

        let ty = if self.match_keyword(KeywordId::Ptr) {
            self.expect_keyword(KeywordId::To, "Expected 'to' after 'ptr'")?;
            Type::Ptr(Box::new(self.parse_type()?))
        } else if self.match_keyword(KeywordId::Record) {
            let mut fields = Vec::new();
            while !self.is_at_end() && !self.check_keyword(KeywordId::EndRecord) {
                fields.push(self.var_decl()?.node);
            }
            self.expect_keyword(KeywordId::EndRecord, "Expected 'endRecord'")?;
            Type::Record(fields)
        } else if self.match_keyword(KeywordId::Array) {
            let dims = self.array_dims()?;
            self.expect_keyword(KeywordId::Of, "Expected 'of' in array type")?;
            let elem = self.parse_type()?;
            Type::Array {
                dims,
                elem: Box::new(elem),
            }
        } else if self.match_keyword(KeywordId::Function) {
            self.expect_punct(PunctuationId::LParen, "Expected '(' in function type")?;
            let mut params = Vec::new();
            if !self.check_punct(PunctuationId::RParen) {
                loop {
                    params.push(self.parse_type()?);
                    if !self.match_punct(PunctuationId::Comma) {
                        break;
                    }
                }
            }
            self.expect_punct(PunctuationId::RParen, "Expected ')' after function parameters")?;
            let ret = self.returns_clause()?.map(Box::new);
            Type::Function { params, ret }
        } else {
            Type::Named(self.named_type()?)
        };

        Ok(Spanned::new(ty, self.span_from(start)))
    }

    /// Optional `[d1, *, ...]`; `*` marks a dynamic dimension.
    fn array_dims(&mut self) -> Result<Vec<Option<Spanned<Expr>>>, CompileError> {
        let mut dims = Vec::new();
        if !self.match_punct(PunctuationId::LBracket) {
            return Ok(dims);
        }
        loop {
            if self.match_op(OperatorId::Star) {
                dims.push(None);
            } else {
                dims.push(Some(self.expr()?));
            }
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        self.expect_punct(PunctuationId::RBracket, "Expected ']' after array dimensions")?;
        Ok(dims)
    }

    /// `ID [ '[' Type {, Type} ']' ]`
    fn named_type(&mut self) -> Result<NamedType, CompileError> {
        let name = self.expect_ident("Expected type name")?;
        let mut args = Vec::new();
        if self.match_punct(PunctuationId::LBracket) {
            loop {
                args.push(self.parse_type()?);
                if !self.match_punct(PunctuationId::Comma) {
                    break;
                }
            }
            self.expect_punct(PunctuationId::RBracket, "Expected ']' after type arguments")?;
        }
        Ok(NamedType { name, args })
    }

    fn named_type_list(&mut self) -> Result<Vec<NamedType>, CompileError> {
        let mut types = vec![self.named_type()?];
        while self.match_punct(PunctuationId::Comma) {
            types.push(self.named_type()?);
        }
        Ok(types)
    }

    /// Optional `returns Type`.
    fn returns_clause(&mut self) -> Result<Option<Spanned<Type>>, CompileError> {
        if self.match_keyword(KeywordId::Returns) {
            Ok(Some(self.parse_type()?))
        } else {
            Ok(None)
        }
    }
}
