use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Integer,
    Float,
    String,
}

/// Value of a literal, decoded from its lexeme.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Int(i64),
    Float(f64),
    Str(String),
}

impl std::fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LiteralValue::Int(n) => write!(f, "{n}"),
            LiteralValue::Float(n) => write!(f, "{n:?}"),
            LiteralValue::Str(s) => write!(f, "{s:?}"),
        }
    }
}

impl LiteralValue {
    pub fn kind(&self) -> LiteralKind {
        match self {
            LiteralValue::Int(_) => LiteralKind::Integer,
            LiteralValue::Float(_) => LiteralKind::Float,
            LiteralValue::Str(_) => LiteralKind::String,
        }
    }

    /// Decode a literal token. Only well-formed literal tokens produce a value.
    pub fn from_token(token: &Token) -> Option<Self> {
        match token.kind {
            TokenKind::IntegerLiteral => token.lexeme.parse().ok().map(LiteralValue::Int),
            TokenKind::FloatLiteral => token.lexeme.parse().ok().map(LiteralValue::Float),
            TokenKind::StringLiteral => {
                let body = token.lexeme.strip_prefix('"')?.strip_suffix('"')?;
                Some(LiteralValue::Str(unescape(body)))
            }
            _ => None,
        }
    }
}

// The scanner has already rejected unknown escapes.
fn unescape(body: &str) -> String {
    let mut value = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => value.push('\n'),
            Some('t') => value.push('\t'),
            Some(other) => value.push(other),
            None => {}
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use {super::*, crate::token::SourcePosition};

    fn literal(kind: TokenKind, lexeme: &str) -> Option<LiteralValue> {
        let position = SourcePosition {
            line: 1,
            column: 1,
            span: 0..lexeme.len(),
        };
        LiteralValue::from_token(&Token::new(kind, lexeme, position))
    }

    #[test]
    fn decodes_numbers() {
        assert_eq!(literal(TokenKind::IntegerLiteral, "42"), Some(LiteralValue::Int(42)));
        assert_eq!(literal(TokenKind::FloatLiteral, "2.5e2"), Some(LiteralValue::Float(250.0)));
    }

    #[test]
    fn decodes_string_escapes() {
        assert_eq!(
            literal(TokenKind::StringLiteral, r#""a\n\t\\\"b""#),
            Some(LiteralValue::Str("a\n\t\\\"b".into()))
        );
    }

    #[test]
    fn non_literals_have_no_value() {
        assert_eq!(literal(TokenKind::Identifier, "x"), None);
        assert_eq!(literal(TokenKind::Invalid, "1.2.3"), None);
    }

    #[test]
    fn display() {
        assert_eq!(LiteralValue::Float(1.0).to_string(), "1.0");
        assert_eq!(LiteralValue::Str("hi\n".into()).to_string(), r#""hi\n""#);
        assert_eq!(LiteralValue::Int(7).kind(), LiteralKind::Integer);
    }
}
