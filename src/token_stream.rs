use crate::token::{Token, TokenKind};

/// Saved position in a [`TokenStream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark(usize);

/// Parser-side cursor over scanned tokens.
///
/// Comments are dropped on construction and the sequence is guaranteed to end
/// with a single `EOF` token, so `peek` always has something to return.
pub struct TokenStream {
    tokens: Vec<Token>,
    current: usize,
}

impl TokenStream {
    pub fn new(tokens: impl IntoIterator<Item = Token>) -> Self {
        let mut tokens: Vec<Token> = tokens
            .into_iter()
            .filter(|t| t.kind != TokenKind::Comment)
            .collect();

        match tokens.iter().position(|t| t.kind == TokenKind::EOF) {
            Some(eof) => tokens.truncate(eof + 1),
            None => {
                let eof = match tokens.last() {
                    Some(last) => {
                        let (line, column) = last.end();
                        Token::eof(line, column, last.position.span.end)
                    }
                    None => Token::eof(1, 1, 0),
                };
                tokens.push(eof);
            }
        }

        Self { tokens, current: 0 }
    }

    pub fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    /// Look `k` tokens ahead; anything past the end is the EOF token.
    pub fn peek_at(&self, k: usize) -> &Token {
        let index = (self.current + k).min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    /// Most recently consumed token (the first token before anything is consumed).
    pub fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    /// Consume and return the current token. Never moves past EOF.
    pub fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    pub fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::EOF
    }

    pub fn mark(&self) -> Mark {
        Mark(self.current)
    }

    pub fn reset(&mut self, mark: Mark) {
        self.current = mark.0.min(self.tokens.len() - 1);
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::scanner::tokenize};

    fn stream(source: &str) -> TokenStream {
        TokenStream::new(tokenize(source).0)
    }

    #[test]
    fn comments_are_filtered() {
        let mut tokens = stream("a /* skip */ b // tail");
        assert_eq!(tokens.advance().lexeme, "a");
        assert_eq!(tokens.advance().lexeme, "b");
        assert!(tokens.is_at_end());
    }

    #[test]
    fn peek_ahead_clamps_to_eof() {
        let tokens = stream("x = 1");
        assert_eq!(tokens.peek().lexeme, "x");
        assert_eq!(tokens.peek_at(1).lexeme, "=");
        assert_eq!(tokens.peek_at(2).lexeme, "1");
        assert_eq!(tokens.peek_at(3).kind, TokenKind::EOF);
        assert_eq!(tokens.peek_at(50).kind, TokenKind::EOF);
    }

    #[test]
    fn advance_stops_at_eof() {
        let mut tokens = stream("x");
        tokens.advance();
        assert_eq!(tokens.advance().kind, TokenKind::EOF);
        assert_eq!(tokens.advance().kind, TokenKind::EOF);
        assert_eq!(tokens.previous().lexeme, "x");
    }

    #[test]
    fn mark_and_reset_backtrack() {
        let mut tokens = stream("a b c");
        tokens.advance();
        let mark = tokens.mark();
        tokens.advance();
        tokens.advance();
        assert!(tokens.is_at_end());
        tokens.reset(mark);
        assert_eq!(tokens.peek().lexeme, "b");
        assert_eq!(tokens.mark(), mark);
    }

    #[test]
    fn missing_eof_is_synthesized() {
        let (mut scanned, _) = tokenize("ab\n cd");
        scanned.pop();
        let tokens = TokenStream::new(scanned);
        let eof = tokens.peek_at(10);
        assert_eq!(eof.kind, TokenKind::EOF);
        assert_eq!(eof.start(), (2, 4));

        let empty = TokenStream::new(vec![]);
        assert_eq!(empty.peek(), &Token::eof(1, 1, 0));
    }

    #[test]
    fn tokens_after_eof_are_ignored() {
        let (mut scanned, _) = tokenize("a");
        scanned.extend(tokenize("b").0);
        let mut tokens = TokenStream::new(scanned);
        tokens.advance();
        assert!(tokens.is_at_end());
    }
}
