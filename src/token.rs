/// Token classes produced by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    Keyword,
    IntegerLiteral,
    FloatLiteral,
    StringLiteral,
    Operator,
    Punctuation,
    // Kept for tooling, filtered out before parsing.
    Comment,
    EOF,
    // Malformed lexeme, always paired with a diagnostic.
    Invalid,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Keyword => "keyword",
            TokenKind::IntegerLiteral => "integer literal",
            TokenKind::FloatLiteral => "float literal",
            TokenKind::StringLiteral => "string literal",
            TokenKind::Operator => "operator",
            TokenKind::Punctuation => "punctuation",
            TokenKind::Comment => "comment",
            TokenKind::EOF => "end of input",
            TokenKind::Invalid => "invalid token",
        };
        f.write_str(name)
    }
}

/// Where a token starts: 1-based line and column plus its byte range.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
    pub span: std::ops::Range<usize>,
}

impl std::fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}:{}]", self.line, self.column)
    }
}

/// Source range of an AST node, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
}

impl Span {
    pub fn new(start: (usize, usize), end: (usize, usize)) -> Self {
        Self {
            start_line: start.0,
            start_col: start.1,
            end_line: end.0,
            end_col: end.1,
        }
    }

    /// Span covering exactly one token.
    pub fn of(token: &Token) -> Self {
        Self::new(token.start(), token.end())
    }

    /// Span from the start of `self` to the end of `other`.
    pub fn to(self, other: Span) -> Self {
        Self {
            end_line: other.end_line,
            end_col: other.end_col,
            ..self
        }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.start_line, self.start_col, self.end_line, self.end_col
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub position: SourcePosition,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::EOF => write!(f, "end of input"),
            _ => write!(f, "`{}`", self.lexeme),
        }
    }
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, position: SourcePosition) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            position,
        }
    }

    /// Zero-width end marker at the given position.
    pub fn eof(line: usize, column: usize, offset: usize) -> Self {
        Self::new(
            TokenKind::EOF,
            "",
            SourcePosition {
                line,
                column,
                span: offset..offset,
            },
        )
    }

    pub fn line(&self) -> usize {
        self.position.line
    }

    pub fn column(&self) -> usize {
        self.position.column
    }

    /// Length of the lexeme in characters.
    pub fn span_length(&self) -> usize {
        self.lexeme.chars().count()
    }

    pub fn start(&self) -> (usize, usize) {
        (self.position.line, self.position.column)
    }

    /// Line and column just past the last character of the lexeme.
    pub fn end(&self) -> (usize, usize) {
        self.lexeme
            .chars()
            .fold(self.start(), |(line, column), c| match c {
                '\n' => (line + 1, 1),
                _ => (line, column + 1),
            })
    }

    pub fn is(&self, kind: TokenKind, lexeme: &str) -> bool {
        self.kind == kind && self.lexeme == lexeme
    }

    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.is(TokenKind::Keyword, keyword)
    }

    pub fn is_operator(&self, operator: &str) -> bool {
        self.is(TokenKind::Operator, operator)
    }

    pub fn is_punctuation(&self, punctuation: &str) -> bool {
        self.is(TokenKind::Punctuation, punctuation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(kind: TokenKind, lexeme: &str, line: usize, column: usize) -> Token {
        Token::new(
            kind,
            lexeme,
            SourcePosition {
                line,
                column,
                span: 0..lexeme.len(),
            },
        )
    }

    #[test]
    fn end_walks_over_newlines() {
        let comment = token(TokenKind::Comment, "/* a\nbc */", 3, 5);
        assert_eq!(comment.start(), (3, 5));
        assert_eq!(comment.end(), (4, 6));
        assert_eq!(comment.span_length(), 10);
    }

    #[test]
    fn span_length_counts_chars_not_bytes() {
        let string = token(TokenKind::StringLiteral, "\"né\"", 1, 1);
        assert_eq!(string.span_length(), 4);
        assert_eq!(string.end(), (1, 5));
    }

    #[test]
    fn display_names_the_lexeme() {
        assert_eq!(token(TokenKind::Operator, "==", 1, 1).to_string(), "`==`");
        assert_eq!(Token::eof(2, 1, 10).to_string(), "end of input");
    }

    #[test]
    fn spans_join() {
        let left = Span::of(&token(TokenKind::Identifier, "abc", 1, 1));
        let right = Span::of(&token(TokenKind::Punctuation, ";", 2, 4));
        assert_eq!(left.to(right), Span::new((1, 1), (2, 5)));
        assert_eq!(left.to(right).to_string(), "1:1-2:5");
    }
}
