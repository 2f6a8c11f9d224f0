use {
    crate::token::{SourcePosition, Token},
    miette::{LabeledSpan, MietteDiagnostic, NamedSource, Report},
    thiserror::Error,
};

/// Malformed lexemes. The scanner turns each into an `Invalid` token and keeps going.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexicalError {
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated block comment")]
    UnterminatedBlockComment,
    #[error("malformed numeric literal `{0}`")]
    MalformedNumber(String),
    #[error("integer literal `{0}` does not fit in 64 bits")]
    IntegerOutOfRange(String),
    #[error("unknown escape sequence `\\{0}` in string literal")]
    UnknownEscape(char),
    #[error("unexpected character `{0}`")]
    UnexpectedCharacter(char),
}

/// Grammar violations raised by parser productions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyntaxError {
    #[error("expected {expected}, found {found}")]
    Unexpected { expected: String, found: Token },
    #[error("invalid assignment target, expected an identifier before {0}")]
    InvalidAssignmentTarget(Token),
    #[error("too many arguments, expected at most {limit}")]
    TooManyArguments { token: Token, limit: usize },
    #[error("nesting exceeds the limit of {limit} levels")]
    NestingTooDeep { token: Token, limit: usize },
    // The scanner has already reported this token.
    #[error("invalid token {0}")]
    AtInvalidToken(Token),
}

impl SyntaxError {
    pub fn token(&self) -> &Token {
        match self {
            SyntaxError::Unexpected { found, .. } => found,
            SyntaxError::InvalidAssignmentTarget(token)
            | SyntaxError::TooManyArguments { token, .. }
            | SyntaxError::NestingTooDeep { token, .. }
            | SyntaxError::AtInvalidToken(token) => token,
        }
    }

    /// Fatal errors abandon the whole top-level statement.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SyntaxError::NestingTooDeep { .. })
    }

    /// None when the error was already reported during scanning.
    pub fn to_diagnostic(&self) -> Option<Diagnostic> {
        let kind = match self {
            SyntaxError::AtInvalidToken(_) => return None,
            SyntaxError::NestingTooDeep { .. } => DiagnosticKind::InternalLimit,
            _ => DiagnosticKind::Syntax,
        };
        Some(Diagnostic::error(
            kind,
            self.to_string(),
            &self.token().position,
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// Which phase produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    Lexical,
    Syntax,
    InternalLimit,
    Cancelled,
}

/// A positioned message for the caller. Rendered as `line:column: severity: message`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub span: std::ops::Range<usize>,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: {}: {}",
            self.line, self.column, self.severity, self.message
        )
    }
}

impl From<(LexicalError, &SourcePosition)> for Diagnostic {
    fn from((error, position): (LexicalError, &SourcePosition)) -> Self {
        Diagnostic::error(DiagnosticKind::Lexical, error.to_string(), position)
    }
}

impl Diagnostic {
    pub fn error(kind: DiagnosticKind, message: impl Into<String>, at: &SourcePosition) -> Self {
        Self::new(Severity::Error, kind, message, at)
    }

    pub fn warning(kind: DiagnosticKind, message: impl Into<String>, at: &SourcePosition) -> Self {
        Self::new(Severity::Warning, kind, message, at)
    }

    fn new(
        severity: Severity,
        kind: DiagnosticKind,
        message: impl Into<String>,
        at: &SourcePosition,
    ) -> Self {
        Self {
            severity,
            kind,
            message: message.into(),
            line: at.line,
            column: at.column,
            span: at.span.clone(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Fancy report pointing into `source`, for terminal output.
    pub fn to_report(&self, name: &str, source: &str) -> Report {
        let severity = match self.severity {
            Severity::Error => miette::Severity::Error,
            Severity::Warning => miette::Severity::Warning,
        };
        let label = match self.kind {
            DiagnosticKind::Lexical => "while scanning",
            DiagnosticKind::Syntax => "here",
            DiagnosticKind::InternalLimit => "too deep",
            DiagnosticKind::Cancelled => "stopped here",
        };
        let diag = MietteDiagnostic::new(self.message.clone())
            .with_severity(severity)
            .with_label(LabeledSpan::at(self.span.clone(), label));

        Report::new(diag).with_source_code(NamedSource::new(name, source.to_string()))
    }
}

/// True if any diagnostic should block later phases.
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}
