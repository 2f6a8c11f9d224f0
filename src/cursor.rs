/// Position-tracking view over an immutable source buffer.
///
/// The cursor is a plain value: copying it captures a restart point that a
/// new scanner can resume from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor<'src> {
    source: &'src str, // Utf8 source
    offset: usize,     // Byte position inside the utf8 source
    line: usize,       // 1-based
    column: usize,     // 1-based, counted in chars
}

impl<'src> Cursor<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn is_at_end(&self) -> bool {
        self.offset >= self.source.len()
    }

    /// Unconsumed part of the source.
    pub fn rest(&self) -> &'src str {
        &self.source[self.offset..]
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Look `offset` chars ahead without moving; `peek_at(0)` is `peek()`.
    pub fn peek_at(&self, offset: usize) -> Option<char> {
        self.rest().chars().nth(offset)
    }

    /// Consume one char, keeping line and column in step.
    pub fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.offset += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Return true and advance if the next character is the expected one.
    pub fn matches(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn eat_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&predicate) {
            self.advance();
        }
    }

    /// Source text between an earlier cursor and this one.
    pub fn since(&self, start: &Cursor<'src>) -> &'src str {
        &self.source[start.offset..self.offset]
    }
}
