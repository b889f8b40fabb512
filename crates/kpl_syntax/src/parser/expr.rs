/// Expression parsing (precedence ladder).
///
/// Lowest to highest: keyword message, custom infix operator, `||`, `&&`, `|`, `^`, `&`,
/// equality, relational, shift, additive, multiplicative, unary prefix, postfix, primary.
/// Every binary level is left-associative.

type ExprResult = Result<Spanned<Expr>, CompileError>;

const EQUALITY_OPS: &[(OperatorId, BinaryOp)] = &[(OperatorId::EqEq, BinaryOp::Eq), (OperatorId::NotEq, BinaryOp::NotEq)];

const RELATIONAL_OPS: &[(OperatorId, BinaryOp)] = &[
    (OperatorId::Lt, BinaryOp::Lt),
    (OperatorId::LtEq, BinaryOp::LtEq),
    (OperatorId::Gt, BinaryOp::Gt),
    (OperatorId::GtEq, BinaryOp::GtEq),
];

const SHIFT_OPS: &[(OperatorId, BinaryOp)] = &[
    (OperatorId::Shl, BinaryOp::Shl),
    (OperatorId::Shr, BinaryOp::Shr),
    (OperatorId::UShr, BinaryOp::UShr),
];

const ADDITIVE_OPS: &[(OperatorId, BinaryOp)] = &[(OperatorId::Plus, BinaryOp::Add), (OperatorId::Minus, BinaryOp::Sub)];

impl<'a> Parser<'a> {
    // ========================================================================
    // Expressions
    // ========================================================================

    /// Full expression: `Expr2 { ID : Expr2 }`.
    ///
    /// An identifier immediately followed by `:` starts a keyword message; all segments are kept in order.
    fn expr(&mut self) -> ExprResult {
        let start = self.current_span();
        let receiver = self.expr2()?;
        if !self.check_keyword_segment() {
            return Ok(receiver);
        }

        let mut segments = Vec::new();
        while self.check_keyword_segment() {
            let keyword = self.expect_ident("Expected message name")?;
            self.advance();
            let arg = self.expr2()?;
            segments.push(MessageSegment { keyword, arg });
        }
        let message = MessageExpr {
            receiver: Box::new(receiver),
            segments,
        };
        Ok(Spanned::new(Expr::Message(message), self.span_from(start)))
    }

    /// User-defined infix operators (`a <+> b`).
    fn expr2(&mut self) -> ExprResult {
        let mut left = self.logical_or()?;
        while let TokenKind::CustomOperator(op) = &self.peek().kind {
            let op = BinaryOp::Custom(op.clone());
            self.advance();
            let right = self.logical_or()?;
            left = binary(left, op, right);
        }
        Ok(left)
    }

    fn logical_or(&mut self) -> ExprResult {
        self.binary_left(Self::logical_and, &[(OperatorId::PipePipe, BinaryOp::Or)])
    }

    fn logical_and(&mut self) -> ExprResult {
        self.binary_left(Self::bit_or, &[(OperatorId::AmpAmp, BinaryOp::And)])
    }

    fn bit_or(&mut self) -> ExprResult {
        self.binary_left(Self::bit_xor, &[(OperatorId::Pipe, BinaryOp::BitOr)])
    }

    fn bit_xor(&mut self) -> ExprResult {
        self.binary_left(Self::bit_and, &[(OperatorId::Caret, BinaryOp::BitXor)])
    }

    fn bit_and(&mut self) -> ExprResult {
        self.binary_left(Self::equality, &[(OperatorId::Amp, BinaryOp::BitAnd)])
    }

    fn equality(&mut self) -> ExprResult {
        self.binary_left(Self::relational, EQUALITY_OPS)
    }

    fn relational(&mut self) -> ExprResult {
        self.binary_left(Self::shift, RELATIONAL_OPS)
    }

    fn shift(&mut self) -> ExprResult {
        self.binary_left(Self::additive, SHIFT_OPS)
    }

    fn additive(&mut self) -> ExprResult {
        self.binary_left(Self::multiplicative, ADDITIVE_OPS)
    }

    /// `*` only multiplies when it sits on the same line as the previous token; at the start of a
    /// line it begins a dereference statement instead.
    fn multiplicative(&mut self) -> ExprResult {
        let mut left = self.unary()?;
        loop {
            let op = if self.check_op(OperatorId::Star) && self.peek().span.line == self.previous().span.line {
                BinaryOp::Mul
            } else if self.check_op(OperatorId::Slash) {
                BinaryOp::Div
            } else if self.check_op(OperatorId::Percent) {
                BinaryOp::Mod
            } else {
                break;
            };
            self.advance();
            let right = self.unary()?;
            left = binary(left, op, right);
        }
        Ok(left)
    }

    /// Prefix `!`, `-`, `*`, `&` (right-recursive).
    fn unary(&mut self) -> ExprResult {
        let op = match self.peek().kind.operator_id() {
            Some(OperatorId::Bang) => UnaryOp::Not,
            Some(OperatorId::Minus) => UnaryOp::Neg,
            Some(OperatorId::Star) => UnaryOp::Deref,
            Some(OperatorId::Amp) => UnaryOp::AddrOf,
            _ => return self.postfix(),
        };
        let start = self.current_span();
        self.advance();
        let operand = self.unary()?;
        let span = start.merge(operand.span);
        Ok(Spanned::new(Expr::Unary(op, Box::new(operand)), span))
    }

    /// Field access, method call, indexing, casts and type checks after a primary.
    fn postfix(&mut self) -> ExprResult {
        let start = self.current_span();
        let mut expr = self.primary()?;

        loop {
            let node = if self.match_punct(PunctuationId::Dot) {
                let name = self.expect_ident("Expected identifier after '.'")?;
                if self.check_punct(PunctuationId::LParen) {
                    let callee_span = self.span_from(start);
                    let callee = Spanned::new(Expr::Field(Box::new(expr), name), callee_span);
                    let args = self.arg_list()?;
                    Expr::Call(CallExpr {
                        callee: Box::new(callee),
                        args,
                    })
                } else {
                    Expr::Field(Box::new(expr), name)
                }
            } else if self.match_keyword(KeywordId::AsPtrTo) {
                let ty = self.parse_type()?;
                Expr::AsPtrTo(Box::new(expr), ty)
            } else if self.match_keyword(KeywordId::AsInteger) {
                Expr::AsInteger(Box::new(expr))
            } else if self.match_keyword(KeywordId::ArraySize) {
                Expr::ArraySize(Box::new(expr))
            } else if self.check_keyword(KeywordId::IsInstanceOf) || self.check_keyword(KeywordId::IsKindOf) {
                let kind = if self.match_keyword(KeywordId::IsInstanceOf) {
                    TypeCheckKind::IsInstanceOf
                } else {
                    self.advance();
                    TypeCheckKind::IsKindOf
                };
                let ty = self.parse_type()?;
                Expr::TypeCheck {
                    kind,
                    expr: Box::new(expr),
                    ty,
                }
            } else if self.match_punct(PunctuationId::LBracket) {
                let mut indices = vec![self.expr()?];
                while self.match_punct(PunctuationId::Comma) {
                    indices.push(self.expr()?);
                }
                self.expect_punct(PunctuationId::RBracket, "Expected ']' after array indices")?;
                Expr::Index(Box::new(expr), indices)
            } else {
                break;
            };
            expr = Spanned::new(node, self.span_from(start));
        }

        Ok(expr)
    }

    fn primary(&mut self) -> ExprResult {
        let start = self.current_span();

        if self.match_punct(PunctuationId::LParen) {
            let inner = self.expr()?;
            self.expect_punct(PunctuationId::RParen, "Expected ')' after expression")?;
            return Ok(Spanned::new(inner.node, self.span_from(start)));
        }

        let literal = match &self.peek().kind {
            TokenKind::Int(v) => Some(Expr::Int(*v)),
            TokenKind::Double(v) => Some(Expr::Double(*v)),
            TokenKind::Char(c) => Some(Expr::Char(*c)),
            TokenKind::String(s) => Some(Expr::String(s.clone())),
            TokenKind::Keyword(KeywordId::Null) => Some(Expr::Null),
            TokenKind::Keyword(KeywordId::True) => Some(Expr::Bool(true)),
            TokenKind::Keyword(KeywordId::False) => Some(Expr::Bool(false)),
            TokenKind::Keyword(KeywordId::SelfKw) => Some(Expr::SelfRef),
            TokenKind::Keyword(KeywordId::Super) => Some(Expr::Super),
            _ => None,
        };
        if let Some(node) = literal {
            self.advance();
            return Ok(Spanned::new(node, start));
        }

        if let TokenKind::Ident(name) = &self.peek().kind {
            let name = name.clone();
            self.advance();
            if !self.check_punct(PunctuationId::LParen) {
                return Ok(Spanned::new(Expr::Ident(name), start));
            }
            let callee = Spanned::new(Expr::Ident(name), start);
            let args = self.arg_list()?;
            let call = CallExpr {
                callee: Box::new(callee),
                args,
            };
            return Ok(Spanned::new(Expr::Call(call), self.span_from(start)));
        }

        let node = if self.match_keyword(KeywordId::Function) {
            Expr::Function(Box::new(self.function_decl(false)?))
        } else if self.match_keyword(KeywordId::New) {
            Expr::Constructor(self.constructor(AllocKind::New)?)
        } else if self.match_keyword(KeywordId::Alloc) {
            Expr::Constructor(self.constructor(AllocKind::Alloc)?)
        } else if self.match_keyword(KeywordId::SizeOf) {
            Expr::SizeOf(self.parse_type()?)
        } else {
            return Err(self.error_here("Expected expression"));
        };
        Ok(Spanned::new(node, self.span_from(start)))
    }

    // ========================================================================
    // Constructors
    // ========================================================================

    /// `Type [ { field = Expr, ... } | { [Expr of] Expr, ... } ]` after `new` / `alloc`.
    ///
    /// The initializer form is chosen by scanning past `{`: an `=` before the first `,` or `}` at the
    /// same nesting depth means field initializers.
    fn constructor(&mut self, kind: AllocKind) -> Result<ConstructorExpr, CompileError> {
        let ty = self.parse_type()?;
        if !self.check_punct(PunctuationId::LBrace) {
            return Ok(ConstructorExpr { kind, ty, init: None });
        }

        let is_fields = self.brace_init_has_fields();
        self.advance();

        let init = if is_fields {
            let mut fields = Vec::new();
            loop {
                let field = self.expect_ident("Expected field name")?;
                self.expect_op(OperatorId::Eq, "Expected '=' after field name")?;
                let value = self.expr()?;
                fields.push(FieldInit { field, value });
                if !self.match_punct(PunctuationId::Comma) {
                    break;
                }
            }
            self.expect_punct(PunctuationId::RBrace, "Expected '}' after field initializers")?;
            ConstructorInit::Fields(fields)
        } else {
            let mut items = Vec::new();
            loop {
                let first = self.expr()?;
                let item = if self.match_keyword(KeywordId::Of) {
                    ArrayInit {
                        count: Some(first),
                        value: self.expr()?,
                    }
                } else {
                    ArrayInit {
                        count: None,
                        value: first,
                    }
                };
                items.push(item);
                if !self.match_punct(PunctuationId::Comma) {
                    break;
                }
            }
            self.expect_punct(PunctuationId::RBrace, "Expected '}' after array initializers")?;
            ConstructorInit::Array(items)
        };

        Ok(ConstructorExpr {
            kind,
            ty,
            init: Some(init),
        })
    }

    /// Lookahead from the current `{`; does not move the cursor.
    fn brace_init_has_fields(&self) -> bool {
        let mut depth = 0usize;
        for token in self.tokens.get(self.pos + 1..).unwrap_or_default() {
            match &token.kind {
                TokenKind::Eof => return false,
                TokenKind::Operator(OperatorId::Eq) if depth == 0 => return true,
                TokenKind::Punctuation(PunctuationId::LParen | PunctuationId::LBracket | PunctuationId::LBrace) => {
                    depth += 1;
                }
                TokenKind::Punctuation(PunctuationId::RParen | PunctuationId::RBracket | PunctuationId::RBrace) => {
                    if depth == 0 {
                        return false;
                    }
                    depth -= 1;
                }
                TokenKind::Punctuation(PunctuationId::Comma) if depth == 0 => return false,
                _ => {}
            }
        }
        false
    }

    /// One left-associative binary level over `table`.
    fn binary_left(&mut self, operand: fn(&mut Self) -> ExprResult, table: &[(OperatorId, BinaryOp)]) -> ExprResult {
        let mut left = operand(self)?;
        loop {
            let Some(op) = table.iter().find(|(id, _)| self.check_op(*id)).map(|(_, op)| op.clone()) else {
                break;
            };
            self.advance();
            let right = operand(self)?;
            left = binary(left, op, right);
        }
        Ok(left)
    }
}

fn binary(left: Spanned<Expr>, op: BinaryOp, right: Spanned<Expr>) -> Spanned<Expr> {
    let span = left.span.merge(right.span);
    Spanned::new(Expr::Binary(Box::new(left), op, Box::new(right)), span)
}
