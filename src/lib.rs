//! Front end for the Cook recipe language: a lazy scanner producing
//! positioned tokens and a recovering recursive descent parser producing
//! a spanned AST. Neither phase stops at the first error; both collect
//! [`Diagnostic`]s and keep going.

pub mod ast_printer;
pub mod config;
pub mod cursor;
pub mod error;
pub mod expr;
pub mod literal;
pub mod parser;
pub mod scanner;
pub mod stmt;
pub mod token;
pub mod token_stream;

pub use {
    ast_printer::AstPrinter,
    config::{AbortSignal, ParseOptions},
    error::{has_errors, Diagnostic, DiagnosticKind, Severity},
    parser::{parse, parse_with_options, Parser},
    scanner::{tokenize, tokenize_with_abort, Scanner},
    stmt::Program,
    token::{SourcePosition, Span, Token, TokenKind},
};

/// Scan and parse `source` in one go. Lexical diagnostics come first.
pub fn parse_source(source: &str, options: ParseOptions) -> (Program, Vec<Diagnostic>) {
    let (tokens, mut diagnostics) = match &options.abort {
        Some(abort) => tokenize_with_abort(source, abort.clone()),
        None => tokenize(source),
    };
    let (program, syntax) = parse_with_options(tokens, options);
    diagnostics.extend(syntax);
    (program, diagnostics)
}
