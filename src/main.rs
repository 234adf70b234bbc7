//! Command-line front end: tokenize, parse or draw a MiniLua source file.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use minilua::{parse_str, tokenize, Diagnostics, DotRender};

/// Lexer and parser for MiniLua
#[derive(Parser, Debug)]
#[command(name = "minilua", version, long_about = None)]
struct Cli {
    /// What to do with the file
    #[arg(value_enum, ignore_case = true, allow_hyphen_values = true)]
    mode: Mode,

    /// MiniLua source file
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Where `show-ast` writes the DOT file [default: FILE with a .dot extension]
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

/// Each mode also answers to the older single-dash spellings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Print each token with its line
    #[value(aliases = ["token", "t", "0", "-tokenize", "-token", "-t"])]
    Tokenize,
    /// Print the syntax tree
    #[value(aliases = ["parserize", "p", "1", "-parserize", "-parse", "-p"])]
    Parse,
    /// Write the syntax tree as a Graphviz DOT file
    #[value(aliases = ["showast", "sast", "s", "2", "-showast", "-sast", "-s"])]
    ShowAst,
    /// Run the program (not implemented)
    #[value(aliases = ["runlua", "r", "3", "-runlua", "-run", "-r"])]
    Run,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("{}: {}", .path.display(), .source)]
    Io { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Syntax(#[from] minilua::Error),
    #[error("found {0} lexical error(s)")]
    Lexical(usize),
    #[error("run mode is not implemented")]
    NotImplemented,
}

fn main() -> ExitCode {
    // Logs go to stderr so they never mix with tokens or trees on stdout
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .try_init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("minilua: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    tracing::info!(mode = ?cli.mode, file = %cli.file.display(), "starting");
    if cli.mode == Mode::Run {
        return Err(CliError::NotImplemented);
    }

    let source = fs::read_to_string(&cli.file).map_err(|source| CliError::Io {
        path: cli.file.clone(),
        source,
    })?;

    let mut diagnostics = Diagnostics::new();
    let result = match cli.mode {
        Mode::Tokenize => {
            for token in tokenize(&source, &mut diagnostics) {
                println!("{}", token);
            }
            Ok(())
        }
        Mode::Parse => parse_str(&source, &mut diagnostics)
            .map(|program| println!("{:#?}", program))
            .map_err(CliError::from),
        Mode::ShowAst => show_ast(cli, &source, &mut diagnostics),
        Mode::Run => Err(CliError::NotImplemented),
    };

    for diagnostic in &diagnostics {
        eprintln!("{}", diagnostic);
    }
    result?;
    if diagnostics.is_empty() {
        Ok(())
    } else {
        Err(CliError::Lexical(diagnostics.count()))
    }
}

fn show_ast(cli: &Cli, source: &str, diagnostics: &mut Diagnostics) -> Result<(), CliError> {
    let program = parse_str(source, diagnostics)?;
    let dot = DotRender::render(&program);
    let path = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.file.with_extension("dot"));
    fs::write(&path, dot).map_err(|source| CliError::Io {
        path: path.clone(),
        source,
    })?;
    println!("{}", path.display());
    Ok(())
}
