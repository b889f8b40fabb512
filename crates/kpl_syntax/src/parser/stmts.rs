/// Statement parsing.
///
/// This chunk parses statement lists and every statement form, including the speculative
/// `LValue = Expr` parse that disambiguates assignments from call and message statements.
impl<'a> Parser<'a> {
    // ========================================================================
    // Statements
    // ========================================================================

    /// Parse statements until a block-closing keyword.
    ///
    /// A failing statement is recorded and skipped; the list keeps going from the next line.
    fn stmt_list(&mut self) -> Vec<Spanned<Statement>> {
        let mut statements = Vec::new();
        while !self.is_at_end() && !self.is_block_end() && !self.is_new_section() {
            let start = self.pos;
            match self.statement() {
                Ok(stmt) => statements.push(stmt),
                Err(e) => {
                    self.errors.push(e);
                    self.synchronize_statement(start);
                }
            }
        }
        statements
    }

    fn statement(&mut self) -> Result<Spanned<Statement>, CompileError> {
        let start = self.current_span();
        let stmt = self.statement_kind()?;
        Ok(Spanned::new(stmt, self.span_from(start)))
    }

    fn statement_kind(&mut self) -> Result<Statement, CompileError> {
        match self.peek().kind.keyword_id() {
            Some(KeywordId::If) => {
                self.advance();
                self.if_stmt()
            }
            Some(KeywordId::While) => {
                self.advance();
                let cond = self.expr()?;
                let body = self.stmt_list();
                self.expect_keyword(KeywordId::EndWhile, "Expected 'endWhile'")?;
                Ok(Statement::While { cond, body })
            }
            Some(KeywordId::Do) => {
                self.advance();
                let body = self.stmt_list();
                self.expect_keyword(KeywordId::Until, "Expected 'until'")?;
                let cond = self.expr()?;
                Ok(Statement::DoUntil { body, cond })
            }
            Some(KeywordId::For) => {
                self.advance();
                self.for_stmt()
            }
            Some(KeywordId::Switch) => {
                self.advance();
                self.switch_stmt()
            }
            Some(KeywordId::Try) => {
                self.advance();
                self.try_stmt()
            }
            Some(KeywordId::Throw) => {
                self.advance();
                let error = self.expect_ident("Expected error name")?;
                let args = self.arg_list()?;
                Ok(Statement::Throw { error, args })
            }
            Some(KeywordId::Free) => {
                self.advance();
                Ok(Statement::Free(self.expr()?))
            }
            Some(KeywordId::Debug) => {
                self.advance();
                Ok(Statement::Debug)
            }
            Some(KeywordId::Break) => {
                self.advance();
                Ok(Statement::Break)
            }
            Some(KeywordId::Continue) => {
                self.advance();
                Ok(Statement::Continue)
            }
            Some(KeywordId::Return) => {
                self.advance();
                if self.is_at_end() || self.is_block_end() || self.is_new_section() {
                    Ok(Statement::Return(None))
                } else {
                    Ok(Statement::Return(Some(self.expr()?)))
                }
            }
            _ => self.expression_statement(),
        }
    }

    /// Assignment, call or message statement.
    fn expression_statement(&mut self) -> Result<Statement, CompileError> {
        if self.check_op(OperatorId::Star) || self.check_ident() || self.check_punct(PunctuationId::LParen) {
            let saved = self.checkpoint();
            if let Ok(target) = self.lvalue() {
                if self.match_op(OperatorId::Eq) {
                    let value = self.expr()?;
                    return Ok(Statement::Assignment { target, value });
                }
            }
            self.restore(saved);
        }

        let expr = self.expr()?;

        if self.check_op(OperatorId::Eq) {
            let target = self.expression_to_lvalue(expr)?;
            self.advance();
            let value = self.expr()?;
            return Ok(Statement::Assignment { target, value });
        }

        match expr.node {
            Expr::Call(call) => Ok(Statement::Call(call)),
            Expr::Message(message) => Ok(Statement::Message(message)),
            _ => Err(self.error_here("Expression not properly used in statement context")),
        }
    }

    /// `if Expr stmts {elseIf Expr stmts} [else stmts] endIf`
    fn if_stmt(&mut self) -> Result<Statement, CompileError> {
        let cond = self.expr()?;
        let then_block = self.stmt_list();

        let mut else_ifs = Vec::new();
        while self.match_keyword(KeywordId::ElseIf) {
            let cond = self.expr()?;
            let body = self.stmt_list();
            else_ifs.push(ElseIf { cond, body });
        }

        let else_block = if self.match_keyword(KeywordId::Else) {
            Some(self.stmt_list())
        } else {
            None
        };

        self.expect_keyword(KeywordId::EndIf, "Expected 'endIf'")?;
        Ok(Statement::If {
            cond,
            then_block,
            else_ifs,
            else_block,
        })
    }

    /// `for LValue = Expr to Expr [by Expr] stmts endFor` or `for (init; cond; update) stmts endFor`
    fn for_stmt(&mut self) -> Result<Statement, CompileError> {
        let kind = if self.match_punct(PunctuationId::LParen) {
            let init = if self.check_punct(PunctuationId::Semicolon) {
                None
            } else {
                Some(Box::new(self.statement()?))
            };
            self.expect_punct(PunctuationId::Semicolon, "Expected ';' after for loop initialization")?;

            let cond = if self.check_punct(PunctuationId::Semicolon) {
                None
            } else {
                Some(self.expr()?)
            };
            self.expect_punct(PunctuationId::Semicolon, "Expected ';' after for loop condition")?;

            let update = if self.check_punct(PunctuationId::RParen) {
                None
            } else {
                Some(Box::new(self.statement()?))
            };
            self.expect_punct(PunctuationId::RParen, "Expected ')' after for clauses")?;

            ForKind::CStyle { init, cond, update }
        } else {
            let var = self.lvalue()?;
            self.expect_op(OperatorId::Eq, "Expected '=' after for loop variable")?;
            let start = self.expr()?;
            self.expect_keyword(KeywordId::To, "Expected 'to' in for loop range")?;
            let end = self.expr()?;
            let step = if self.match_keyword(KeywordId::By) {
                Some(self.expr()?)
            } else {
                None
            };
            ForKind::Range { var, start, end, step }
        };

        let body = self.stmt_list();
        self.expect_keyword(KeywordId::EndFor, "Expected 'endFor'")?;
        Ok(Statement::For { kind, body })
    }

    /// `switch Expr {case Expr: stmts} [default: stmts] endSwitch`
    fn switch_stmt(&mut self) -> Result<Statement, CompileError> {
        let scrutinee = self.expr()?;
        let mut cases = Vec::new();
        let mut default = None;

        while !self.is_at_end() && !self.check_keyword(KeywordId::EndSwitch) {
            if self.match_keyword(KeywordId::Case) {
                let value = self.expr()?;
                self.expect_punct(PunctuationId::Colon, "Expected ':' after case condition")?;
                let body = self.stmt_list();
                cases.push(SwitchCase { value, body });
            } else if self.match_keyword(KeywordId::Default) {
                self.expect_punct(PunctuationId::Colon, "Expected ':' after default")?;
                default = Some(self.stmt_list());
            } else {
                return Err(self.error_here("Expected 'case' or 'default' in switch statement"));
            }
        }

        self.expect_keyword(KeywordId::EndSwitch, "Expected 'endSwitch'")?;
        Ok(Statement::Switch {
            scrutinee,
            cases,
            default,
        })
    }

    /// `try stmts {catch ID ParmList : stmts} endTry`
    fn try_stmt(&mut self) -> Result<Statement, CompileError> {
        let body = self.stmt_list();
        let mut catches = Vec::new();
        while self.match_keyword(KeywordId::Catch) {
            let error = self.expect_ident("Expected error name")?;
            let params = self.param_list()?;
            self.expect_punct(PunctuationId::Colon, "Expected ':' after catch parameters")?;
            let body = self.stmt_list();
            catches.push(CatchClause { error, params, body });
        }
        self.expect_keyword(KeywordId::EndTry, "Expected 'endTry'")?;
        Ok(Statement::Try { body, catches })
    }

    // ========================================================================
    // LValues
    // ========================================================================

    /// `* Expr` or an expression that names a storage location.
    fn lvalue(&mut self) -> Result<Spanned<LValue>, CompileError> {
        let start = self.current_span();
        if self.match_op(OperatorId::Star) {
            let expr = self.expr()?;
            return Ok(Spanned::new(LValue::Deref(Box::new(expr)), self.span_from(start)));
        }
        let expr = self.expr()?;
        self.expression_to_lvalue(expr)
    }

    fn expression_to_lvalue(&self, expr: Spanned<Expr>) -> Result<Spanned<LValue>, CompileError> {
        let span = expr.span;
        let lvalue = match expr.node {
            Expr::Ident(name) => LValue::Ident(name),
            Expr::Index(array, indices) => LValue::Index { array, indices },
            Expr::Field(object, field) => LValue::Field { object, field },
            Expr::Unary(UnaryOp::Deref, operand) => LValue::Deref(operand),
            Expr::Unary(op, _) => {
                return Err(self.error_here(&format!(
                    "Unary operator '{op}' cannot be used in left-hand side of assignment"
                )));
            }
            _ => return Err(self.error_here("Invalid left-hand side in assignment")),
        };
        Ok(Spanned::new(lvalue, span))
    }
}
