use {
    crate::{
        config::AbortSignal,
        cursor::Cursor,
        error::{Diagnostic, DiagnosticKind, LexicalError},
        token::{SourcePosition, Token, TokenKind},
    },
    maplit::hashset,
    std::collections::HashSet,
};

/// Multi- and single-character operators, longest first so the first match wins.
pub const OPERATORS: &[&str] = &[
    "==", "!=", "<=", ">=", "&&", "||", "+", "-", "*", "/", "%", "=", "!", "<", ">",
];

pub const PUNCTUATION: &[char] = &['(', ')', '{', '}', ',', ';'];

trait IsIdentifier {
    fn is_identifier_start(&self) -> bool;
    fn is_identifier(&self) -> bool;
}

impl IsIdentifier for char {
    fn is_identifier_start(&self) -> bool {
        self.is_ascii_alphabetic() || *self == '_'
    }

    fn is_identifier(&self) -> bool {
        self.is_ascii_alphanumeric() || *self == '_'
    }
}

// Anything that would glue onto a numeric literal.
fn continues_number(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

/// Current scanner state for iterating over the source input.
///
/// Tokens are produced on demand through [`Iterator`]; the sequence always
/// ends with exactly one `EOF` token.
pub struct Scanner<'src> {
    cursor: Cursor<'src>,
    start: Cursor<'src>,
    keywords: HashSet<&'static str>,
    diagnostics: Vec<Diagnostic>,
    abort: Option<AbortSignal>,
    finished: bool,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str) -> Self {
        Self::resume(Cursor::new(source))
    }

    /// Continue scanning from a cursor captured at a token boundary.
    pub fn resume(cursor: Cursor<'src>) -> Self {
        Self {
            cursor,
            start: cursor,
            keywords: hashset! {
                "cook",
                "cookbook",
                "else",
                "if",
                "ingredient",
                "recipe",
                "taste",
                "while",
            },
            diagnostics: vec![],
            abort: None,
            finished: false,
        }
    }

    pub fn with_abort(mut self, abort: AbortSignal) -> Self {
        self.abort = Some(abort);
        self
    }

    /// Position the next token will be scanned from.
    pub fn cursor(&self) -> Cursor<'src> {
        self.cursor
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn scan_token(&mut self) -> Token {
        self.skip_whitespace();
        self.start = self.cursor;

        // A scan that has reached the end is complete, abort or not.
        let Some(c) = self.cursor.peek() else {
            return self.make_token(TokenKind::EOF);
        };

        if self.abort.as_ref().is_some_and(AbortSignal::is_aborted) {
            let eof = self.make_token(TokenKind::EOF);
            self.diagnostics.push(Diagnostic::error(
                DiagnosticKind::Cancelled,
                "tokenization cancelled",
                &eof.position,
            ));
            self.finished = true;
            return eof;
        }

        match c {
            '/' if self.cursor.peek_at(1) == Some('/') => self.line_comment(),
            '/' if self.cursor.peek_at(1) == Some('*') => self.block_comment(),
            '"' => self.string(),
            d if d.is_ascii_digit() => self.number(),
            d if d.is_identifier_start() => self.identifier(),
            p if PUNCTUATION.contains(&p) => {
                self.cursor.advance();
                self.make_token(TokenKind::Punctuation)
            }
            _ => self.operator(),
        }
    }

    fn skip_whitespace(&mut self) {
        self.cursor.eat_while(|c| c.is_ascii_whitespace());
    }

    fn line_comment(&mut self) -> Token {
        self.cursor.eat_while(|c| c != '\n');
        self.make_token(TokenKind::Comment)
    }

    fn block_comment(&mut self) -> Token {
        // The opening /*.
        self.cursor.advance();
        self.cursor.advance();
        loop {
            match self.cursor.advance() {
                None => return self.error_token(LexicalError::UnterminatedBlockComment),
                Some('*') if self.cursor.matches('/') => {
                    return self.make_token(TokenKind::Comment);
                }
                Some(_) => {}
            }
        }
    }

    fn string(&mut self) -> Token {
        // The opening ".
        self.cursor.advance();
        let mut bad_escape = None;
        loop {
            match self.cursor.peek() {
                None | Some('\n') => return self.error_token(LexicalError::UnterminatedString),
                Some('"') => {
                    self.cursor.advance();
                    break;
                }
                Some('\\') => {
                    self.cursor.advance();
                    match self.cursor.peek() {
                        Some('n' | 't' | '\\' | '"') => {
                            self.cursor.advance();
                        }
                        // Let the outer loop report the unterminated string.
                        None | Some('\n') => {}
                        Some(other) => {
                            bad_escape.get_or_insert(other);
                            self.cursor.advance();
                        }
                    }
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
        match bad_escape {
            Some(c) => self.error_token(LexicalError::UnknownEscape(c)),
            None => self.make_token(TokenKind::StringLiteral),
        }
    }

    fn number(&mut self) -> Token {
        let mut kind = TokenKind::IntegerLiteral;
        self.cursor.eat_while(|c| c.is_ascii_digit());

        let fraction = self.cursor.peek_at(1).is_some_and(|c| c.is_ascii_digit());
        if self.cursor.peek() == Some('.') && fraction {
            self.cursor.advance();
            self.cursor.eat_while(|c| c.is_ascii_digit());
            kind = TokenKind::FloatLiteral;
        }

        if matches!(self.cursor.peek(), Some('e' | 'E')) {
            let digits_at = match self.cursor.peek_at(1) {
                Some('+' | '-') => 2,
                _ => 1,
            };
            if self.cursor.peek_at(digits_at).is_some_and(|c| c.is_ascii_digit()) {
                for _ in 0..digits_at {
                    self.cursor.advance();
                }
                self.cursor.eat_while(|c| c.is_ascii_digit());
                kind = TokenKind::FloatLiteral;
            }
        }

        // Swallow the whole malformed run so it yields one diagnostic.
        if self.cursor.peek().is_some_and(continues_number) {
            self.cursor.eat_while(continues_number);
            let lexeme = self.lexeme().to_string();
            return self.error_token(LexicalError::MalformedNumber(lexeme));
        }

        if kind == TokenKind::IntegerLiteral && self.lexeme().parse::<i64>().is_err() {
            let lexeme = self.lexeme().to_string();
            return self.error_token(LexicalError::IntegerOutOfRange(lexeme));
        }

        self.make_token(kind)
    }

    fn identifier(&mut self) -> Token {
        self.cursor.eat_while(|c| c.is_identifier());

        if self.keywords.contains(self.lexeme()) {
            self.make_token(TokenKind::Keyword)
        } else {
            self.make_token(TokenKind::Identifier)
        }
    }

    fn operator(&mut self) -> Token {
        let rest = self.cursor.rest();
        match OPERATORS.iter().find(|op| rest.starts_with(*op)) {
            Some(op) => {
                for _ in op.chars() {
                    self.cursor.advance();
                }
                self.make_token(TokenKind::Operator)
            }
            None => {
                let c = self.cursor.advance().unwrap_or_default();
                self.error_token(LexicalError::UnexpectedCharacter(c))
            }
        }
    }

    fn lexeme(&self) -> &'src str {
        self.cursor.since(&self.start)
    }

    fn current_location(&self) -> SourcePosition {
        SourcePosition {
            line: self.start.line(),
            column: self.start.column(),
            span: self.start.offset()..self.cursor.offset(),
        }
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.lexeme(), self.current_location())
    }

    fn error_token(&mut self, error: LexicalError) -> Token {
        let token = self.make_token(TokenKind::Invalid);
        tracing::trace!(position = %token.position, "lexical error: {error}");
        self.diagnostics.push((error, &token.position).into());
        token
    }
}

impl Iterator for Scanner<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.scan_token();
        if token.kind == TokenKind::EOF {
            self.finished = true;
        }
        Some(token)
    }
}

/// Scan a whole compilation unit. Comment tokens are included.
pub fn tokenize(source: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    scan_all(Scanner::new(source))
}

/// Like [`tokenize`], stopping early once `abort` is raised.
pub fn tokenize_with_abort(source: &str, abort: AbortSignal) -> (Vec<Token>, Vec<Diagnostic>) {
    scan_all(Scanner::new(source).with_abort(abort))
}

fn scan_all(mut scanner: Scanner<'_>) -> (Vec<Token>, Vec<Diagnostic>) {
    let tokens: Vec<Token> = scanner.by_ref().collect();
    let diagnostics = scanner.into_diagnostics();
    tracing::debug!(
        tokens = tokens.len(),
        diagnostics = diagnostics.len(),
        "tokenized source"
    );
    (tokens, diagnostics)
}
