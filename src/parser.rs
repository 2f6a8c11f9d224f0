use {
    crate::{
        config::ParseOptions,
        error::{Diagnostic, DiagnosticKind, SyntaxError},
        expr::{
            Assignment, BinaryExpr, BinaryOp, CallExpr, Expr, Identifier, Literal, UnaryExpr,
            UnaryOp,
        },
        literal::LiteralValue,
        stmt::{
            Block, ExpressionStatement, FunctionDecl, IfStatement, IngredientDecl, Program, Stmt,
            TasteStatement, WhileStatement,
        },
        token::{Span, Token, TokenKind},
        token_stream::TokenStream,
    },
    culpa::{throw, throws},
};

/// Keywords that start a statement; recovery stops in front of them.
const STATEMENT_KEYWORDS: &[&str] = &["ingredient", "recipe", "if", "while", "taste"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Associativity {
    Left,
    Right,
}

/// Operators that may follow an operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Infix {
    Assign,
    Binary(BinaryOp),
}

impl Infix {
    fn from_token(token: &Token) -> Option<Self> {
        if token.kind != TokenKind::Operator {
            return None;
        }
        if token.lexeme == "=" {
            return Some(Infix::Assign);
        }
        BinaryOp::from_lexeme(&token.lexeme).map(Infix::Binary)
    }

    fn precedence(self) -> u8 {
        match self {
            Infix::Assign => 1,
            Infix::Binary(op) => match op {
                BinaryOp::Or => 2,
                BinaryOp::And => 3,
                BinaryOp::Equal | BinaryOp::NotEqual => 4,
                BinaryOp::Less
                | BinaryOp::LessEqual
                | BinaryOp::Greater
                | BinaryOp::GreaterEqual => 5,
                BinaryOp::Add | BinaryOp::Subtract => 6,
                BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Remainder => 7,
            },
        }
    }

    fn associativity(self) -> Associativity {
        match self {
            Infix::Assign => Associativity::Right,
            Infix::Binary(_) => Associativity::Left,
        }
    }
}

pub struct Parser {
    tokens: TokenStream,
    options: ParseOptions,
    diagnostics: Vec<Diagnostic>,
    depth: usize,
}

/// Recursive descent parser for the Cook grammar:
/// ```text
/// program     → declaration* EOF ;
/// declaration → ingredient
///             | recipe
///             | ";"
///             | statement ;
/// ingredient  → "ingredient" IDENTIFIER ( "=" expression )? ";" ;
/// recipe      → "recipe" IDENTIFIER "(" parameters? ")" block ;
/// parameters  → IDENTIFIER ( "," IDENTIFIER )* ;
/// statement   → ifStmt
///             | whileStmt
///             | tasteStmt
///             | block
///             | exprStmt ;
/// ifStmt      → "if" "(" expression ")" statement ( "else" statement )? ;
/// whileStmt   → "while" "(" expression ")" statement ;
/// tasteStmt   → "taste" expression ";" ;
/// block       → "{" declaration* "}" ;
/// exprStmt    → expression ";" ;
/// expression  → unary ( INFIX unary )* ;      (precedence climbing)
/// unary       → ( "!" | "-" ) unary
///             | call ;
/// call        → primary ( "(" arguments? ")" )* ;
/// primary     → INTEGER | FLOAT | STRING | IDENTIFIER
///             | "(" expression ")" ;
/// ```
/// Infix operators from loosest to tightest: `=` (right-associative), `||`,
/// `&&`, `== !=`, `< <= > >=`, `+ -`, `* / %`.
impl Parser {
    pub fn new(tokens: impl IntoIterator<Item = Token>) -> Self {
        Self::with_options(tokens, ParseOptions::default())
    }

    pub fn with_options(tokens: impl IntoIterator<Item = Token>, options: ParseOptions) -> Self {
        Self {
            tokens: TokenStream::new(tokens),
            options,
            diagnostics: vec![],
            depth: 0,
        }
    }

    /// Parse the whole stream. Never fails: errors end up in the diagnostics.
    pub fn parse(mut self) -> (Program, Vec<Diagnostic>) {
        let program = self.program();
        tracing::debug!(
            statements = program.statements.len(),
            diagnostics = self.diagnostics.len(),
            "parsed program"
        );
        (program, self.diagnostics)
    }

    fn program(&mut self) -> Program {
        let mut statements = vec![];
        while !self.tokens.is_at_end() {
            if self.options.is_aborted() {
                self.diagnostics.push(Diagnostic::error(
                    DiagnosticKind::Cancelled,
                    "parsing cancelled",
                    &self.tokens.peek().position,
                ));
                break;
            }

            let start = self.tokens.mark();
            match self.declaration_with_recovery() {
                Ok(Some(stmt)) => statements.push(stmt),
                Ok(None) => {}
                Err(error) => {
                    // Nothing of this statement survives.
                    self.depth = 0;
                    self.report(&error);
                    self.tokens.reset(start);
                    self.skip_statement();
                }
            }
            if self.tokens.mark() == start {
                self.tokens.advance();
            }
        }
        Program {
            statements,
            span: Span::new((1, 1), self.tokens.peek().start()),
        }
    }

    /// Parse one declaration, recovering from ordinary syntax errors in place.
    /// Only fatal errors are passed up.
    #[throws(SyntaxError)]
    fn declaration_with_recovery(&mut self) -> Option<Stmt> {
        let depth = self.depth;
        match self.declaration() {
            Ok(stmt) => stmt,
            Err(error) if error.is_fatal() => throw!(error),
            Err(error) => {
                self.depth = depth;
                self.report(&error);
                self.synchronize();
                None
            }
        }
    }

    #[throws(SyntaxError)]
    fn declaration(&mut self) -> Option<Stmt> {
        if self.check_keyword("ingredient") {
            return Some(self.ingredient_declaration()?);
        }
        if self.check_keyword("recipe") {
            return Some(self.recipe_declaration()?);
        }
        if self.check_punctuation(";") {
            let semicolon = self.tokens.advance();
            self.diagnostics.push(Diagnostic::warning(
                DiagnosticKind::Syntax,
                "empty statement",
                &semicolon.position,
            ));
            return None;
        }
        Some(self.statement()?)
    }

    #[throws(SyntaxError)]
    fn ingredient_declaration(&mut self) -> Stmt {
        let keyword = self.tokens.advance();
        let name = self.identifier("ingredient name after `ingredient`")?;
        let initializer = if self.match_operator("=") {
            Some(self.expression()?)
        } else {
            None
        };
        self.consume_punctuation(";", "`;` after ingredient declaration")?;
        Stmt::Ingredient(IngredientDecl {
            name,
            initializer,
            span: self.span_from(&keyword),
        })
    }

    #[throws(SyntaxError)]
    fn recipe_declaration(&mut self) -> Stmt {
        let keyword = self.tokens.advance();
        self.descend()?;
        let name = self.identifier("recipe name after `recipe`")?;
        self.consume_punctuation("(", "`(` after recipe name")?;
        let mut params = vec![];
        if !self.check_punctuation(")") {
            loop {
                params.push(self.identifier("parameter name")?);
                if !self.match_punctuation(",") {
                    break;
                }
            }
        }
        self.consume_punctuation(")", "`)` after parameters")?;
        let body = self.block("`{` before recipe body")?;
        self.ascend();
        Stmt::Function(FunctionDecl {
            name,
            params,
            body,
            span: self.span_from(&keyword),
        })
    }

    #[throws(SyntaxError)]
    fn statement(&mut self) -> Stmt {
        self.descend()?;
        let stmt = if self.check_keyword("if") {
            self.if_statement()?
        } else if self.check_keyword("while") {
            self.while_statement()?
        } else if self.check_keyword("taste") {
            self.taste_statement()?
        } else if self.check_punctuation("{") {
            Stmt::Block(self.block("`{`")?)
        } else if self.check_punctuation("}") {
            throw!(self.unexpected("statement"));
        } else {
            self.expression_statement()?
        };
        self.ascend();
        stmt
    }

    #[throws(SyntaxError)]
    fn if_statement(&mut self) -> Stmt {
        let keyword = self.tokens.advance();
        self.consume_punctuation("(", "`(` after `if`")?;
        let cond = self.expression()?;
        self.consume_punctuation(")", "`)` after if condition")?;
        let then_branch = Box::new(self.statement()?);
        let else_branch = if self.match_keyword("else") {
            Some(Box::new(self.statement()?))
        } else {
            None
        };
        Stmt::If(IfStatement {
            cond,
            then_branch,
            else_branch,
            span: self.span_from(&keyword),
        })
    }

    #[throws(SyntaxError)]
    fn while_statement(&mut self) -> Stmt {
        let keyword = self.tokens.advance();
        self.consume_punctuation("(", "`(` after `while`")?;
        let cond = self.expression()?;
        self.consume_punctuation(")", "`)` after while condition")?;
        let body = Box::new(self.statement()?);
        Stmt::While(WhileStatement {
            cond,
            body,
            span: self.span_from(&keyword),
        })
    }

    #[throws(SyntaxError)]
    fn taste_statement(&mut self) -> Stmt {
        let keyword = self.tokens.advance();
        let expr = self.expression()?;
        self.consume_punctuation(";", "`;` after taste statement")?;
        Stmt::Taste(TasteStatement {
            expr,
            span: self.span_from(&keyword),
        })
    }

    // Shared by block statements and recipe bodies.
    #[throws(SyntaxError)]
    fn block(&mut self, expected: &str) -> Block {
        let open = self.consume_punctuation("{", expected)?;
        let mut statements = vec![];
        while !self.check_punctuation("}") && !self.tokens.is_at_end() {
            if let Some(stmt) = self.declaration_with_recovery()? {
                statements.push(stmt);
            }
        }
        self.consume_punctuation("}", "`}` after block")?;
        Block {
            statements,
            span: self.span_from(&open),
        }
    }

    #[throws(SyntaxError)]
    fn expression_statement(&mut self) -> Stmt {
        let expr = self.expression()?;
        self.consume_punctuation(";", "`;` after expression")?;
        Stmt::Expression(ExpressionStatement {
            span: expr.span().to(Span::of(self.tokens.previous())),
            expr,
        })
    }

    #[throws(SyntaxError)]
    fn expression(&mut self) -> Expr {
        self.infix(0)?
    }

    /// Precedence climbing: keep folding operators that bind at least as
    /// tightly as `min_precedence` into the left operand.
    #[throws(SyntaxError)]
    fn infix(&mut self, min_precedence: u8) -> Expr {
        self.descend()?;
        let mut left = self.unary()?;

        while let Some(infix) = Infix::from_token(self.tokens.peek()) {
            let precedence = infix.precedence();
            if precedence < min_precedence {
                break;
            }
            let operator = self.tokens.advance();
            let next_min = match infix.associativity() {
                Associativity::Left => precedence + 1,
                Associativity::Right => precedence,
            };
            let right = self.infix(next_min)?;
            let span = left.span().to(right.span());

            left = match (infix, left) {
                (Infix::Assign, Expr::Identifier(target)) => Expr::Assign(Assignment {
                    target,
                    value: Box::new(right),
                    span,
                }),
                (Infix::Assign, _) => throw!(SyntaxError::InvalidAssignmentTarget(operator)),
                (Infix::Binary(op), left) => Expr::Binary(BinaryExpr {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                    span,
                }),
            };
        }

        self.ascend();
        left
    }

    #[throws(SyntaxError)]
    fn unary(&mut self) -> Expr {
        let op = match self.tokens.peek() {
            token if token.kind == TokenKind::Operator => UnaryOp::from_lexeme(&token.lexeme),
            _ => None,
        };
        let Some(op) = op else {
            return self.call()?;
        };

        let operator = self.tokens.advance();
        self.descend()?;
        let operand = self.unary()?;
        self.ascend();
        Expr::Unary(UnaryExpr {
            op,
            span: Span::of(&operator).to(operand.span()),
            operand: Box::new(operand),
        })
    }

    #[throws(SyntaxError)]
    fn call(&mut self) -> Expr {
        let mut expr = self.primary()?;
        while self.match_punctuation("(") {
            expr = self.finish_call(expr)?;
        }
        expr
    }

    #[throws(SyntaxError)]
    fn finish_call(&mut self, callee: Expr) -> Expr {
        let mut args = vec![];
        if !self.check_punctuation(")") {
            loop {
                if args.len() == self.options.max_arguments {
                    // Reported, but the call is still well-formed.
                    let error = SyntaxError::TooManyArguments {
                        token: self.tokens.peek().clone(),
                        limit: self.options.max_arguments,
                    };
                    self.report(&error);
                }
                args.push(self.expression()?);
                if !self.match_punctuation(",") {
                    break;
                }
            }
        }
        self.consume_punctuation(")", "`)` after arguments")?;
        Expr::Call(CallExpr {
            span: callee.span().to(Span::of(self.tokens.previous())),
            callee: Box::new(callee),
            args,
        })
    }

    #[throws(SyntaxError)]
    fn primary(&mut self) -> Expr {
        let token = self.tokens.peek().clone();
        match token.kind {
            TokenKind::IntegerLiteral | TokenKind::FloatLiteral | TokenKind::StringLiteral => {
                self.tokens.advance();
                match LiteralValue::from_token(&token) {
                    Some(value) => Expr::Literal(Literal {
                        value,
                        span: Span::of(&token),
                    }),
                    None => throw!(SyntaxError::Unexpected {
                        expected: "a well-formed literal".into(),
                        found: token,
                    }),
                }
            }
            TokenKind::Identifier => {
                self.tokens.advance();
                Expr::Identifier(Identifier {
                    span: Span::of(&token),
                    name: token.lexeme,
                })
            }
            TokenKind::Punctuation if token.lexeme == "(" => {
                self.tokens.advance();
                let expr = self.expression()?;
                let close = self.consume_punctuation(")", "`)` after expression")?;
                // No node of its own, but the parentheses belong to the span.
                expr.with_span(Span::of(&token).to(Span::of(&close)))
            }
            _ => throw!(self.unexpected("expression")),
        }
    }

    #[throws(SyntaxError)]
    fn identifier(&mut self, expected: &str) -> Identifier {
        if self.tokens.peek().kind != TokenKind::Identifier {
            throw!(self.unexpected(expected));
        }
        let token = self.tokens.advance();
        Identifier {
            span: Span::of(&token),
            name: token.lexeme,
        }
    }

    #[throws(SyntaxError)]
    fn consume_punctuation(&mut self, punctuation: &str, expected: &str) -> Token {
        if self.check_punctuation(punctuation) {
            return self.tokens.advance();
        }
        throw!(self.unexpected(expected));
    }

    fn unexpected(&self, expected: &str) -> SyntaxError {
        let found = self.tokens.peek().clone();
        if found.kind == TokenKind::Invalid {
            return SyntaxError::AtInvalidToken(found);
        }
        SyntaxError::Unexpected {
            expected: expected.to_string(),
            found,
        }
    }

    fn check_keyword(&self, keyword: &str) -> bool {
        self.tokens.peek().is_keyword(keyword)
    }

    fn check_punctuation(&self, punctuation: &str) -> bool {
        self.tokens.peek().is_punctuation(punctuation)
    }

    fn match_keyword(&mut self, keyword: &str) -> bool {
        let matched = self.check_keyword(keyword);
        if matched {
            self.tokens.advance();
        }
        matched
    }

    fn match_punctuation(&mut self, punctuation: &str) -> bool {
        let matched = self.check_punctuation(punctuation);
        if matched {
            self.tokens.advance();
        }
        matched
    }

    fn match_operator(&mut self, operator: &str) -> bool {
        let matched = self.tokens.peek().is_operator(operator);
        if matched {
            self.tokens.advance();
        }
        matched
    }

    fn span_from(&self, start: &Token) -> Span {
        Span::of(start).to(Span::of(self.tokens.previous()))
    }

    #[throws(SyntaxError)]
    fn descend(&mut self) {
        self.depth += 1;
        if self.depth > self.options.max_depth {
            throw!(SyntaxError::NestingTooDeep {
                token: self.tokens.peek().clone(),
                limit: self.options.max_depth,
            });
        }
    }

    fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn report(&mut self, error: &SyntaxError) {
        if let Some(diagnostic) = error.to_diagnostic() {
            tracing::trace!(%diagnostic, "syntax error");
            self.diagnostics.push(diagnostic);
        }
    }

    /// Synchronize parser stream to the next statement boundary.
    fn synchronize(&mut self) {
        while !self.tokens.is_at_end() {
            let token = self.tokens.peek();
            if token.is_punctuation("}") {
                return;
            }
            let keyword = token.kind == TokenKind::Keyword;
            if keyword && STATEMENT_KEYWORDS.contains(&token.lexeme.as_str()) {
                return;
            }
            let skipped = self.tokens.advance();
            tracing::trace!(token = %skipped, "synchronizing");
            if skipped.is_punctuation(";") {
                return;
            }
        }
    }

    /// Skip one whole statement with brackets kept balanced.
    fn skip_statement(&mut self) {
        let mut depth = 0usize;
        while !self.tokens.is_at_end() {
            let token = self.tokens.advance();
            let at_boundary = if token.is_punctuation("(") || token.is_punctuation("{") {
                depth += 1;
                false
            } else if token.is_punctuation(")") {
                depth = depth.saturating_sub(1);
                false
            } else if token.is_punctuation("}") {
                depth = depth.saturating_sub(1);
                depth == 0
            } else {
                depth == 0 && token.is_punctuation(";")
            };
            if at_boundary && !self.check_keyword("else") {
                return;
            }
        }
    }
}

/// Parse a token sequence (comments are ignored) into a program.
pub fn parse(tokens: impl IntoIterator<Item = Token>) -> (Program, Vec<Diagnostic>) {
    Parser::new(tokens).parse()
}

pub fn parse_with_options(
    tokens: impl IntoIterator<Item = Token>,
    options: ParseOptions,
) -> (Program, Vec<Diagnostic>) {
    Parser::with_options(tokens, options).parse()
}
