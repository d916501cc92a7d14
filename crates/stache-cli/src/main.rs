use clap::{Parser, Subcommand};
use stache_runtime::{Engine, Object, Template, Value};
use std::path::Path;

#[derive(Parser)]
#[command(name = "stache")]
#[command(about = "Render stache templates")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a template to stdout
    Render {
        /// Template file
        path: String,

        /// JSON file whose top-level object is the render context
        #[arg(long, short)]
        context: Option<String>,

        /// Global variable as NAME=JSON (repeatable)
        #[arg(long = "global", short, value_parser = parse_global)]
        globals: Vec<(String, Value)>,
    },

    /// Check a template for parse errors without rendering it
    Check {
        /// Template file
        path: String,
    },

    /// Print the token stream of a template
    Tokens {
        /// Template file
        path: String,

        /// Emit JSON instead of one token per line
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Render {
            path,
            context,
            globals,
        } => cmd_render(&path, context.as_deref(), globals),
        Command::Check { path } => cmd_check(&path),
        Command::Tokens { path, json } => cmd_tokens(&path, json),
    }
}

/// Log to stderr, filtered by `RUST_LOG`. Silent when it is unset.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(1);
}

fn read_source(path: &str) -> String {
    let p = Path::new(path);
    if !p.exists() {
        fail(format!("file not found: {path}"));
    }
    match std::fs::read_to_string(p) {
        Ok(source) => source,
        Err(e) => fail(format!("reading {path}: {e}")),
    }
}

/// Parse a `--global` argument of the form `NAME=JSON`.
///
/// A value that is not valid JSON is taken as a plain string, so
/// `--global site=docs` works without quoting.
fn parse_global(arg: &str) -> Result<(String, Value), String> {
    let (name, raw) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=JSON, got '{arg}'"))?;
    let value = match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(json) => Value::from_json(json),
        Err(_) => Value::from(raw),
    };
    Ok((name.to_string(), value))
}

fn load_context(path: &str) -> Result<Object, String> {
    let source = read_source(path);
    let json: serde_json::Value =
        serde_json::from_str(&source).map_err(|e| format!("{path}: {e}"))?;
    Object::from_json(json).map_err(|e| format!("{path}: {e}"))
}

fn build_engine(globals: Vec<(String, Value)>) -> Result<Engine, String> {
    globals
        .into_iter()
        .try_fold(Engine::new(), |engine, (name, value)| {
            engine.with_global(&name, value)
        })
        .map_err(|e| e.to_string())
}

fn cmd_render(path: &str, context: Option<&str>, globals: Vec<(String, Value)>) {
    let source = read_source(path);

    let template = match Template::compile(&source) {
        Ok(template) => template,
        Err(e) => fail(format!("{path}: {e}")),
    };
    let engine = build_engine(globals).unwrap_or_else(|e| fail(e));
    let context = context.map(load_context).transpose().unwrap_or_else(|e| fail(e));
    tracing::debug!(path, globals = engine.globals().len(), "rendering");

    let runtime = match tokio::runtime::Builder::new_current_thread().build() {
        Ok(runtime) => runtime,
        Err(e) => fail(format!("starting runtime: {e}")),
    };

    match runtime.block_on(engine.render(&template, context.as_ref())) {
        Ok(output) => print!("{output}"),
        Err(e) => fail(format!("{path}: {e}")),
    }
}

fn cmd_check(path: &str) {
    let source = read_source(path);

    if let Err(e) = Template::compile(&source) {
        fail(format!("{path}: {e}"));
    }

    eprintln!("OK: {path}");
}

fn cmd_tokens(path: &str, json: bool) {
    let source = read_source(path);
    let tokens = stache_lexer::tokenize(&source);

    if json {
        match serde_json::to_string_pretty(&tokens) {
            Ok(text) => println!("{text}"),
            Err(e) => fail(e),
        }
        return;
    }

    for token in &tokens {
        println!(
            "{}:{}\t{:?}\t{:?}",
            token.location.line, token.location.column, token.kind, token.value
        );
    }
}
