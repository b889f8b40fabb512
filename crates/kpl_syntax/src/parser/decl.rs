/// Files and declaration sections.
///
/// This chunk parses `header`/`code` files, `uses` clauses and every declaration section
/// (`const`, `errors`, `var`, `enum`, `type`, `functions`, `function`, `interface`, `class`,
/// `behavior`), plus method prototypes and method bodies.

/// Which kind of file a declaration section appears in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    Header,
    Code,
}

impl FileKind {
    fn expected_declaration(self) -> &'static str {
        match self {
            FileKind::Header => "Expected declaration (const, errors, var, enum, type, functions, interface, or class)",
            FileKind::Code => {
                "Expected declaration (const, errors, var, enum, type, function, interface, class, or behavior)"
            }
        }
    }
}

impl<'a> Parser<'a> {
    // ========================================================================
    // Files
    // ========================================================================

    /// `header ID [uses ...] { decl } endHeader` (the `header` keyword is already consumed).
    fn header_file(&mut self) -> Result<HeaderFile, CompileError> {
        let name = self.expect_ident("Expected header name")?;
        let uses = if self.match_keyword(KeywordId::Uses) {
            self.uses_clause()?
        } else {
            Vec::new()
        };
        let declarations = self.declarations_until(KeywordId::EndHeader, FileKind::Header);
        if let Err(e) = self.expect_keyword(KeywordId::EndHeader, "Expected 'endHeader'") {
            self.errors.push(e);
        }
        Ok(HeaderFile {
            name,
            uses,
            declarations,
        })
    }

    /// `code ID { decl } endCode` (the `code` keyword is already consumed).
    fn code_file(&mut self) -> Result<CodeFile, CompileError> {
        let name = self.expect_ident("Expected code file name")?;
        let declarations = self.declarations_until(KeywordId::EndCode, FileKind::Code);
        if let Err(e) = self.expect_keyword(KeywordId::EndCode, "Expected 'endCode'") {
            self.errors.push(e);
        }
        Ok(CodeFile { name, declarations })
    }

    /// Parse declaration sections until `end`, recovering at section keywords.
    fn declarations_until(&mut self, end: KeywordId, file: FileKind) -> Vec<Spanned<Declaration>> {
        let mut declarations = Vec::new();
        while !self.is_at_end() && !self.check_keyword(end) {
            let start = self.pos;
            match self.declaration_section(file) {
                Ok(section) => declarations.extend(section),
                Err(e) => {
                    self.errors.push(e);
                    self.synchronize(start);
                }
            }
        }
        declarations
    }

    /// Dispatch on the section keyword. Header files take `functions` prototypes; code files take
    /// `function` bodies and `behavior` blocks.
    fn declaration_section(&mut self, file: FileKind) -> Result<Vec<Spanned<Declaration>>, CompileError> {
        let keyword = self.peek().kind.keyword_id();
        match (keyword, file) {
            (Some(KeywordId::Const), _) => {
                self.advance();
                self.constants()
            }
            (Some(KeywordId::Errors), _) => {
                self.advance();
                self.error_decls()
            }
            (Some(KeywordId::Var), _) => {
                self.advance();
                let vars = self.var_decls()?;
                Ok(vars
                    .into_iter()
                    .map(|v| Spanned::new(Declaration::Var(v.node), v.span))
                    .collect())
            }
            (Some(KeywordId::Enum), _) => {
                self.advance();
                Ok(vec![self.enum_decl()?])
            }
            (Some(KeywordId::Type), _) => {
                self.advance();
                self.type_decls()
            }
            (Some(KeywordId::Functions), FileKind::Header) => {
                self.advance();
                self.function_protos()
            }
            (Some(KeywordId::Function), FileKind::Code) => {
                let start = self.current_span();
                self.advance();
                let function = self.function_decl(true)?;
                Ok(vec![Spanned::new(Declaration::Function(function), self.span_from(start))])
            }
            (Some(KeywordId::Interface), _) => {
                let start = self.current_span();
                self.advance();
                let interface = self.interface_decl()?;
                Ok(vec![Spanned::new(Declaration::Interface(interface), self.span_from(start))])
            }
            (Some(KeywordId::Class), _) => {
                let start = self.current_span();
                self.advance();
                let class = self.class_decl()?;
                Ok(vec![Spanned::new(Declaration::Class(class), self.span_from(start))])
            }
            (Some(KeywordId::Behavior), FileKind::Code) => {
                let start = self.current_span();
                self.advance();
                let behavior = self.behavior_decl()?;
                Ok(vec![Spanned::new(Declaration::Behavior(behavior), self.span_from(start))])
            }
            _ => Err(self.error_here(file.expected_declaration())),
        }
    }

    // ========================================================================
    // Uses
    // ========================================================================

    /// `uses pkg [renaming a to b, ...], pkg2 ...`
    fn uses_clause(&mut self) -> Result<Vec<UsesItem>, CompileError> {
        let mut items = vec![self.uses_item()?];
        while self.match_punct(PunctuationId::Comma) {
            items.push(self.uses_item()?);
        }
        Ok(items)
    }

    fn uses_item(&mut self) -> Result<UsesItem, CompileError> {
        let package = match &self.peek().kind {
            TokenKind::String(path) => PackageName::String(path.clone()),
            TokenKind::Ident(name) => PackageName::Ident(name.clone()),
            _ => return Err(self.error_here("Expected package name or string literal")),
        };
        self.advance();

        let mut renamings = Vec::new();
        if self.match_keyword(KeywordId::Renaming) {
            loop {
                let from = self.expect_ident("Expected original name")?;
                self.expect_keyword(KeywordId::To, "Expected 'to'")?;
                let to = self.expect_ident("Expected new name")?;
                renamings.push(Renaming { from, to });
                // A comma followed by `ID to` continues the renaming list; otherwise it separates packages.
                let continues = self.check_punct(PunctuationId::Comma)
                    && matches!(self.peek_next().kind, TokenKind::Ident(_))
                    && self.peek_nth(2).kind.is_keyword(KeywordId::To);
                if !continues {
                    break;
                }
                self.advance();
            }
        }
        Ok(UsesItem { package, renamings })
    }

    // ========================================================================
    // Sections
    // ========================================================================

    /// `const ID = Expr { ID = Expr }`
    fn constants(&mut self) -> Result<Vec<Spanned<Declaration>>, CompileError> {
        let mut decls = Vec::new();
        loop {
            let start = self.current_span();
            let name = self.expect_ident("Expected constant name")?;
            self.expect_op(OperatorId::Eq, "Expected '=' after constant name")?;
            let value = self.expr()?;
            decls.push(Spanned::new(
                Declaration::Constant(ConstantDecl { name, value }),
                self.span_from(start),
            ));
            if !(self.check_ident() && self.peek_next().kind.is_operator(OperatorId::Eq)) {
                break;
            }
        }
        Ok(decls)
    }

    /// `errors ID ParmList { ID ParmList }`
    fn error_decls(&mut self) -> Result<Vec<Spanned<Declaration>>, CompileError> {
        let mut decls = Vec::new();
        loop {
            let start = self.current_span();
            let name = self.expect_ident("Expected error name")?;
            let params = self.param_list()?;
            decls.push(Spanned::new(
                Declaration::Error(ErrorDecl { name, params }),
                self.span_from(start),
            ));
            if self.is_at_end() || self.is_new_section() {
                break;
            }
        }
        Ok(decls)
    }

    /// `ID {, ID} : Type [= Expr2]`
    fn var_decl(&mut self) -> Result<Spanned<VarDecl>, CompileError> {
        let start = self.current_span();
        let names = self.id_list()?;
        self.expect_punct(PunctuationId::Colon, "Expected ':' after variable name(s)")?;
        let ty = self.parse_type()?;
        let init = if self.match_op(OperatorId::Eq) {
            Some(self.expr2()?)
        } else {
            None
        };
        Ok(Spanned::new(VarDecl { names, ty, init }, self.span_from(start)))
    }

    /// One or more variable declarations; continues while the next tokens look like `ID ,` or `ID :`.
    fn var_decls(&mut self) -> Result<Vec<Spanned<VarDecl>>, CompileError> {
        let mut decls = vec![self.var_decl()?];
        while self.check_ident()
            && (self.peek_next().kind.is_punctuation(PunctuationId::Comma)
                || self.peek_next().kind.is_punctuation(PunctuationId::Colon))
        {
            decls.push(self.var_decl()?);
        }
        Ok(decls)
    }

    /// Optional `var` section of a function or method body.
    fn local_vars(&mut self) -> Result<Vec<VarDecl>, CompileError> {
        if !self.match_keyword(KeywordId::Var) {
            return Ok(Vec::new());
        }
        Ok(self.var_decls()?.into_iter().map(|v| v.node).collect())
    }

    /// `enum ID [= Expr] {, ID}`
    fn enum_decl(&mut self) -> Result<Spanned<Declaration>, CompileError> {
        let start = self.current_span();
        let first = self.expect_ident("Expected enum name")?;
        let start_value = if self.match_op(OperatorId::Eq) {
            Some(self.expr()?)
        } else {
            None
        };
        let mut members = vec![first];
        if self.match_punct(PunctuationId::Comma) {
            members.extend(self.id_list()?);
        }
        Ok(Spanned::new(
            Declaration::Enum(EnumDecl {
                members,
                start: start_value,
            }),
            self.span_from(start),
        ))
    }

    /// `type ID = Type { ID = Type }`
    fn type_decls(&mut self) -> Result<Vec<Spanned<Declaration>>, CompileError> {
        let mut decls = Vec::new();
        loop {
            let start = self.current_span();
            let name = self.expect_ident("Expected type name")?;
            self.expect_op(OperatorId::Eq, "Expected '=' after type name")?;
            let ty = self.parse_type()?;
            decls.push(Spanned::new(
                Declaration::Type(TypeDecl { name, ty }),
                self.span_from(start),
            ));
            if self.is_at_end() || self.is_new_section() {
                break;
            }
        }
        Ok(decls)
    }

    /// `functions [external] FunProto { [external] FunProto }`
    fn function_protos(&mut self) -> Result<Vec<Spanned<Declaration>>, CompileError> {
        let mut decls = Vec::new();
        loop {
            let start = self.current_span();
            let external = self.match_keyword(KeywordId::External);
            let name = self.expect_ident("Expected function name")?;
            let params = self.param_list()?;
            let return_type = self.returns_clause()?;
            decls.push(Spanned::new(
                Declaration::FunctionProto(FunctionProto {
                    name,
                    params,
                    return_type,
                    external,
                }),
                self.span_from(start),
            ));
            if self.is_at_end() || self.is_new_section() {
                break;
            }
        }
        Ok(decls)
    }

    /// Function body after the `function` keyword. `named` is false for function literals.
    fn function_decl(&mut self, named: bool) -> Result<FunctionDecl, CompileError> {
        let name = if named {
            Some(self.expect_ident("Expected function name")?)
        } else {
            None
        };
        let params = self.param_list()?;
        let return_type = self.returns_clause()?;
        let locals = self.local_vars()?;
        let body = self.stmt_list();
        self.expect_keyword(KeywordId::EndFunction, "Expected 'endFunction'")?;
        Ok(FunctionDecl {
            name,
            params,
            return_type,
            locals,
            body,
        })
    }

    // ========================================================================
    // Interfaces, classes, behaviors
    // ========================================================================

    fn interface_decl(&mut self) -> Result<InterfaceDecl, CompileError> {
        let name = self.expect_ident("Expected interface name")?;
        let type_params = self.type_params()?;
        let extends = if self.match_keyword(KeywordId::Extends) {
            self.named_type_list()?
        } else {
            Vec::new()
        };
        let mut messages = Vec::new();
        if self.match_keyword(KeywordId::Messages) {
            while !self.is_at_end() && !self.check_keyword(KeywordId::EndInterface) {
                messages.push(self.method_proto()?);
            }
        }
        self.expect_keyword(KeywordId::EndInterface, "Expected 'endInterface'")?;
        Ok(InterfaceDecl {
            name,
            type_params,
            extends,
            messages,
        })
    }

    fn class_decl(&mut self) -> Result<ClassDecl, CompileError> {
        let name = self.expect_ident("Expected class name")?;
        let type_params = self.type_params()?;
        let implements = if self.match_keyword(KeywordId::Implements) {
            self.named_type_list()?
        } else {
            Vec::new()
        };
        let superclass = if self.match_keyword(KeywordId::Superclass) {
            Some(self.named_type()?)
        } else {
            None
        };

        let mut fields = Vec::new();
        if self.match_keyword(KeywordId::Fields) {
            while !self.is_at_end() && !self.check_keyword(KeywordId::Methods) && !self.check_keyword(KeywordId::EndClass)
            {
                fields.extend(self.var_decls()?.into_iter().map(|v| v.node));
            }
        }

        let mut methods = Vec::new();
        if self.match_keyword(KeywordId::Methods) {
            while !self.is_at_end() && !self.check_keyword(KeywordId::EndClass) {
                methods.push(self.method_proto()?);
            }
        }

        self.expect_keyword(KeywordId::EndClass, "Expected 'endClass'")?;
        Ok(ClassDecl {
            name,
            type_params,
            implements,
            superclass,
            fields,
            methods,
        })
    }

    fn behavior_decl(&mut self) -> Result<BehaviorDecl, CompileError> {
        let name = self.expect_ident("Expected behavior name")?;
        let mut methods = Vec::new();
        while !self.is_at_end() && !self.check_keyword(KeywordId::EndBehavior) {
            let start = self.current_span();
            if !self.match_keyword(KeywordId::Method) {
                return Err(self.error_here("Expected method declaration"));
            }
            let method = self.method_decl()?;
            methods.push(Spanned::new(method, self.span_from(start)));
        }
        self.expect_keyword(KeywordId::EndBehavior, "Expected 'endBehavior'")?;
        Ok(BehaviorDecl { name, methods })
    }

    /// `[ID: Type, ...]` after an interface or class name. Absent brackets yield no parameters.
    fn type_params(&mut self) -> Result<Vec<TypeParam>, CompileError> {
        let mut params = Vec::new();
        if !self.match_punct(PunctuationId::LBracket) {
            return Ok(params);
        }
        while !self.is_at_end() && !self.check_punct(PunctuationId::RBracket) {
            if !params.is_empty() {
                self.expect_punct(PunctuationId::Comma, "Expected ',' between type parameters")?;
            }
            let name = self.expect_ident("Expected type parameter name")?;
            self.expect_punct(PunctuationId::Colon, "Expected ':' after type parameter name")?;
            let constraint = self.parse_type()?;
            params.push(TypeParam { name, constraint });
        }
        self.expect_punct(PunctuationId::RBracket, "Expected ']' after type parameters")?;
        Ok(params)
    }

    // ========================================================================
    // Methods
    // ========================================================================

    /// Method prototype: infix, prefix, keyword (`at: (i: int) put: (v: T)`) or normal.
    fn method_proto(&mut self) -> Result<Spanned<MethodProto>, CompileError> {
        let start = self.current_span();

        let proto = if self.match_keyword(KeywordId::Infix) {
            let selector = self.operator_spelling("Expected operator for infix method")?;
            self.expect_punct(PunctuationId::LParen, "Expected '('")?;
            let param = self.single_param()?;
            self.expect_punct(PunctuationId::RParen, "Expected ')'")?;
            self.expect_keyword(KeywordId::Returns, "Expected 'returns'")?;
            let return_type = self.parse_type()?;
            MethodProto {
                kind: MethodKind::Infix,
                selector,
                params: vec![param],
                return_type: Some(return_type),
            }
        } else if self.match_keyword(KeywordId::Prefix) {
            let selector = self.operator_spelling("Expected operator for prefix method")?;
            self.expect_punct(PunctuationId::LParen, "Expected '('")?;
            self.expect_punct(PunctuationId::RParen, "Expected ')'")?;
            self.expect_keyword(KeywordId::Returns, "Expected 'returns'")?;
            let return_type = self.parse_type()?;
            MethodProto {
                kind: MethodKind::Prefix,
                selector,
                params: Vec::new(),
                return_type: Some(return_type),
            }
        } else if self.check_keyword_segment() {
            let mut selector = String::new();
            let mut params = Vec::new();
            while self.check_keyword_segment() {
                let segment = self.expect_ident("Expected method name")?;
                self.advance();
                selector.push_str(&segment);
                selector.push(':');
                self.expect_punct(PunctuationId::LParen, "Expected '('")?;
                params.push(self.single_param()?);
                self.expect_punct(PunctuationId::RParen, "Expected ')'")?;
            }
            MethodProto {
                kind: MethodKind::Keyword,
                selector,
                params,
                return_type: self.returns_clause()?,
            }
        } else if self.check_ident() {
            let selector = self.expect_ident("Expected method name")?;
            let params = self.param_list()?;
            MethodProto {
                kind: MethodKind::Normal,
                selector,
                params,
                return_type: self.returns_clause()?,
            }
        } else {
            return Err(self.error_here("Expected method prototype"));
        };

        Ok(Spanned::new(proto, self.span_from(start)))
    }

    /// `method MethProto [var ...] stmts endMethod` (the `method` keyword is already consumed).
    fn method_decl(&mut self) -> Result<MethodDecl, CompileError> {
        let proto = self.method_proto()?;
        let locals = self.local_vars()?;
        let body = self.stmt_list();
        self.expect_keyword(KeywordId::EndMethod, "Expected 'endMethod'")?;
        Ok(MethodDecl { proto, locals, body })
    }

    /// `ID : Type` inside the parentheses of an infix or keyword method segment.
    fn single_param(&mut self) -> Result<Parameter, CompileError> {
        let name = self.expect_ident("Expected parameter name")?;
        self.expect_punct(PunctuationId::Colon, "Expected ':'")?;
        let ty = self.parse_type()?;
        Ok(Parameter { name, ty })
    }

    /// Operator token naming an infix/prefix method: any built-in operator or a custom run.
    fn operator_spelling(&mut self, msg: &str) -> Result<String, CompileError> {
        let is_operator = match &self.peek().kind {
            TokenKind::Operator(id) => *id != OperatorId::Eq,
            TokenKind::CustomOperator(_) => true,
            _ => false,
        };
        if !is_operator {
            return Err(self.error_here(msg));
        }
        Ok(self.advance().lexeme.clone())
    }
}
