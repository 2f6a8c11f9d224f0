use {
    cook::{
        config::DEFAULT_MAX_DEPTH,
        cursor::Cursor,
        parse, parse_source, parse_with_options, tokenize, tokenize_with_abort, AbortSignal,
        AstPrinter, DiagnosticKind, ParseOptions, Scanner, Severity, Span, Token, TokenKind,
    },
    expect_test::{expect, Expect},
};

fn check_program(source: &str, expect: Expect) {
    let (program, diagnostics) = parse_source(source, ParseOptions::default());
    let mut lines = vec![AstPrinter::new().print_program(&program)];
    lines.retain(|line| !line.is_empty());
    lines.extend(diagnostics.iter().map(ToString::to_string));
    expect.assert_eq(&lines.join("\n"));
}

fn kinds(source: &str) -> Vec<(TokenKind, String)> {
    tokenize(source)
        .0
        .into_iter()
        .map(|t| (t.kind, t.lexeme))
        .collect()
}

#[test]
fn empty_input() {
    let (tokens, diagnostics) = tokenize("");
    assert_eq!(tokens, vec![Token::eof(1, 1, 0)]);
    assert!(diagnostics.is_empty());

    let (program, diagnostics) = parse(tokens);
    assert!(program.statements.is_empty());
    assert!(diagnostics.is_empty());
    assert_eq!(program.span, Span::new((1, 1), (1, 1)));
}

#[test]
fn whitespace_only_input_ends_at_the_last_position() {
    let (tokens, _) = tokenize("  \n\t\n   ");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::EOF);
    assert_eq!(tokens[0].start(), (3, 4));
    assert_eq!(tokens[0].position.span, 8..8);
}

#[test]
fn positions_on_later_lines() {
    let (tokens, _) = tokenize("ingredient x = 1;\n  taste x;");
    let taste = &tokens[5];
    assert!(taste.is_keyword("taste"));
    assert_eq!(taste.start(), (2, 3));
    assert_eq!(taste.position.span, 20..25);
    assert_eq!(taste.span_length(), 5);
}

#[test]
fn maximal_munch() {
    assert_eq!(
        kinds("a<=b==c!d"),
        vec![
            (TokenKind::Identifier, "a".into()),
            (TokenKind::Operator, "<=".into()),
            (TokenKind::Identifier, "b".into()),
            (TokenKind::Operator, "==".into()),
            (TokenKind::Identifier, "c".into()),
            (TokenKind::Operator, "!".into()),
            (TokenKind::Identifier, "d".into()),
            (TokenKind::EOF, "".into()),
        ]
    );
    assert_eq!(kinds("===")[0], (TokenKind::Operator, "==".into()));
    assert_eq!(kinds("===")[1], (TokenKind::Operator, "=".into()));
}

#[test]
fn determinism() {
    let source = "recipe mix(a, b) { taste a + b * 2; }\nmix(1, \"x\"); @";
    assert_eq!(tokenize(source), tokenize(source));
    assert_eq!(
        parse_source(source, ParseOptions::default()),
        parse_source(source, ParseOptions::default())
    );
}

#[test]
fn precedence() {
    check_program("1 + 2 * 3;", expect!["(expr (+ 1 (* 2 3)))"]);
    check_program(
        "x = !a || b && c != 2 % 3 - 1;",
        expect!["(expr (= x (|| (! a) (&& b (!= c (- (% 2 3) 1))))))"],
    );
}

#[test]
fn recovery_keeps_the_next_statement() {
    let source = "ingredient = 1;\ningredient sugar = 2;";
    let (program, diagnostics) = parse_source(source, ParseOptions::default());
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::Syntax);

    let (alone, none) = parse_source("ingredient sugar = 2;", ParseOptions::default());
    assert!(none.is_empty());
    // Spans differ by line, so compare the printed shape.
    assert_eq!(
        AstPrinter::new().print_stmt(program.statements.last().expect("recovered")),
        AstPrinter::new().print_stmt(&alone.statements[0])
    );
}

#[test]
fn lexical_and_syntax_errors_together() {
    check_program(
        "ingredient pan = 12abc;\ntaste \"hot\\q\";\ntaste pan;",
        expect![[r#"
            (taste pan)
            1:18: error: malformed numeric literal `12abc`
            2:7: error: unknown escape sequence `\q` in string literal"#]],
    );
}

#[test]
fn a_full_recipe() {
    check_program(
        r#"
        // Pancakes.
        ingredient eggs = 2;
        ingredient milk = 0.5;
        recipe batter(eggs, milk) {
            ingredient bowl = eggs * 3;
            /* whisk until smooth */
            while (bowl > 0) {
                bowl = bowl - 1;
            }
            if (milk >= 0.5 && !lumpy(bowl)) taste "smooth"; else taste "lumpy";
        }
        taste batter(eggs, milk);
        "#,
        expect![[r#"
            (ingredient eggs 2)
            (ingredient milk 0.5)
            (recipe batter (eggs milk) (block (ingredient bowl (* eggs 3)) (while (> bowl 0) (block (expr (= bowl (- bowl 1))))) (if (&& (>= milk 0.5) (! (call lumpy bowl))) (taste "smooth") (taste "lumpy"))))
            (taste (call batter eggs milk))"#]],
    );
}

#[test]
fn unterminated_constructs() {
    check_program(
        "taste \"never closed\ntaste 1;\n/* open",
        expect![[r#"
            (taste 1)
            1:7: error: unterminated string literal
            3:1: error: unterminated block comment"#]],
    );
}

#[test]
fn deep_nesting_yields_one_internal_limit_diagnostic() {
    let depth = DEFAULT_MAX_DEPTH * 10;
    let source = format!(
        "taste 1;\ntaste {}x{};\ntaste 2;",
        "-(".repeat(depth),
        ")".repeat(depth)
    );
    let (program, diagnostics) = parse_source(&source, ParseOptions::default());
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::InternalLimit);
    assert_eq!(diagnostics[0].line, 2);
    assert_eq!(
        AstPrinter::new().print_program(&program),
        "(taste 1)\n(taste 2)"
    );
}

#[test]
fn deep_if_chains_are_skipped_whole() {
    let options = ParseOptions::default().with_max_depth(4);
    let source = "if (a) if (b) if (c) if (d) if (e) x; else y; else z;\ntaste ok;";
    let (program, diagnostics) = parse_with_options(tokenize(source).0, options);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::InternalLimit);
    assert_eq!(AstPrinter::new().print_program(&program), "(taste ok)");
}

#[test]
fn empty_statements_warn_but_do_not_fail() {
    let (program, diagnostics) = parse_source(";;taste 1;", ParseOptions::default());
    assert_eq!(program.statements.len(), 1);
    assert_eq!(diagnostics.len(), 2);
    assert!(diagnostics.iter().all(|d| d.severity == Severity::Warning));
    assert!(!cook::has_errors(&diagnostics));
}

#[test]
fn scanner_is_lazy_and_resumable() {
    let source = "taste a; taste b;";
    let mut scanner = Scanner::new(source);
    let first: Vec<Token> = scanner.by_ref().take(3).collect();
    assert_eq!(first.last().map(|t| t.lexeme.as_str()), Some(";"));

    let restart: Cursor = scanner.cursor();
    let rest: Vec<Token> = Scanner::resume(restart).collect();
    let (all, _) = tokenize(source);
    assert_eq!(rest, all[3..]);
}

#[test]
fn scanning_cancelled_before_start() {
    let abort = AbortSignal::new();
    abort.abort();
    let (tokens, diagnostics) = tokenize_with_abort("taste 1;", abort);
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::EOF);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::Cancelled);
}

#[test]
fn scanning_cancelled_midway_keeps_the_prefix() {
    let abort = AbortSignal::new();
    let mut scanner = Scanner::new("taste 1; taste 2;").with_abort(abort.clone());
    let mut tokens = vec![];
    while let Some(token) = scanner.next() {
        if token.is_punctuation(";") {
            abort.abort();
        }
        tokens.push(token);
    }
    let lexemes: Vec<&str> = tokens.iter().map(|t| t.lexeme.as_str()).collect();
    assert_eq!(lexemes, vec!["taste", "1", ";", ""]);
    assert_eq!(tokens[3].start(), (1, 10));
    assert_eq!(scanner.diagnostics().len(), 1);
}

#[test]
fn parsing_cancelled() {
    let abort = AbortSignal::new();
    abort.abort();
    let options = ParseOptions::default().with_abort(abort);
    let (program, diagnostics) = parse_source("taste 1;", options);
    assert!(program.statements.is_empty());
    assert!(diagnostics
        .iter()
        .all(|d| d.kind == DiagnosticKind::Cancelled));
    assert!(!diagnostics.is_empty());
}
