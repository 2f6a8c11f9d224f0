use {
    anyhow::{anyhow, Result},
    argh::FromArgs,
    cook::{has_errors, parse_source, tokenize, AstPrinter, Diagnostic, ParseOptions},
    liso::{liso, OutputOnly, Response},
    std::sync::OnceLock,
    tracing_subscriber::EnvFilter,
};

const APP_NAME: &str = env!("CARGO_PKG_NAME");
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Check a cook script or run a REPL.
#[derive(FromArgs)]
struct Args {
    /// print version information
    #[argh(switch, short = 'v')]
    version: bool,

    /// print the token stream
    #[argh(switch, short = 't')]
    tokens: bool,

    /// print the syntax tree
    #[argh(switch, short = 'a')]
    ast: bool,

    /// maximum nesting depth accepted by the parser
    #[argh(option, default = "cook::config::DEFAULT_MAX_DEPTH")]
    max_depth: usize,

    /// log scanner and parser events to stderr
    #[argh(switch)]
    verbose: bool,

    /// script file
    #[argh(positional)]
    script: Vec<String>,
}

fn main() -> Result<()> {
    let args: Args = argh::from_env();

    if args.version {
        println!("{} {}", APP_NAME, APP_VERSION);
        return Ok(());
    }

    if args.script.len() > 1 {
        return Err(anyhow!("Usage: cook [script file]"));
    }

    if args.verbose || std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cook=trace")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .unicode(true)
                .color(false) // liso doesn't handle color codes well..
                .context_lines(3)
                .build(),
        )
    }))?;

    match args.script.first() {
        Some(script) => run_script(&args, script),
        None => run_repl(&args),
    }
}

static OUT: OnceLock<OutputOnly> = OnceLock::new();

fn run_repl(args: &Args) -> Result<()> {
    let mut io = liso::InputOutput::new();
    let _ = OUT.set(io.clone_output());

    io.prompt(liso!(fg = green, bold, "> ", reset), true, false);
    loop {
        match io.read_blocking() {
            Response::Input(line) => {
                let source = line.as_str();
                io.echoln(liso!(fg = green, dim, "> ", fg = none, source));
                // Each line is a program of its own; errors don't end the session.
                let output = run(args, "<repl>", source, true);
                for line in output.lines {
                    wrapln(line);
                }
                for diagnostic in &output.diagnostics {
                    report(diagnostic, "<repl>", source);
                }
            }
            Response::Discarded(line) => {
                io.echoln(liso!(bold + dim, "X ", -bold, line));
            }
            Response::Dead | Response::Quit | Response::Finish => break,
            _ => {}
        }
    }
    Ok(())
}

fn run_script(args: &Args, script: &str) -> Result<()> {
    let contents = std::fs::read_to_string(script)?;
    let output = run(args, script, &contents, args.ast);
    for line in &output.lines {
        println!("{line}");
    }
    for diagnostic in &output.diagnostics {
        eprintln!("{:?}", diagnostic.to_report(script, &contents));
    }
    if has_errors(&output.diagnostics) {
        return Err(anyhow!("{script}: found errors"));
    }
    Ok(())
}

struct Output {
    lines: Vec<String>,
    diagnostics: Vec<Diagnostic>,
}

fn run(args: &Args, name: &str, source: &str, print_ast: bool) -> Output {
    let mut lines = vec![];
    if args.tokens {
        let (tokens, _) = tokenize(source);
        lines.extend(
            tokens
                .iter()
                .map(|t| format!("{} {:?} {}", t.position, t.kind, t.lexeme)),
        );
    }

    let options = ParseOptions::default().with_max_depth(args.max_depth);
    let (program, diagnostics) = parse_source(source, options);
    tracing::debug!(script = name, diagnostics = diagnostics.len(), "checked");

    if print_ast {
        let printed = AstPrinter::new().print_program(&program);
        lines.extend(printed.lines().map(String::from));
    }
    Output { lines, diagnostics }
}

pub fn wrapln(args: impl AsRef<str>) {
    if let Some(out) = OUT.get() {
        out.wrapln(liso!(fg = blue, args.as_ref(), fg = none));
    }
}

fn report(diagnostic: &Diagnostic, name: &str, source: &str) {
    let Some(out) = OUT.get() else {
        return;
    };
    let rendered = format!("{:?}", diagnostic.to_report(name, source));
    if diagnostic.is_error() {
        out.println(liso!(fg = red, bold, rendered, fg = none));
    } else {
        out.println(liso!(fg = yellow, rendered, fg = none));
    }
}
