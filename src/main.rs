//! AutoLang Compiler CLI
//!
//! Main entry point for the `alc` command.

use autolang::{ast, lexer, Reporter, SourceFile};
use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "alc")]
#[command(author = "AutoLang-Dev <contact@autolang.dev>")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "The AutoLang programming language compiler", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an AutoLang source file and report diagnostics
    Parse {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Show the parsed AST structure
        #[arg(long)]
        show_ast: bool,

        /// Emit the parse result in a machine-readable form
        #[arg(long, value_enum)]
        emit: Option<EmitType>,
    },

    /// Dump the token stream of a source file
    Tokens {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show information about the compiler
    Info,
}

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum EmitType {
    /// Abstract Syntax Tree (JSON)
    Ast,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Parse {
            input,
            show_ast,
            emit,
        } => {
            let file = read_source(&input)?;
            let result = autolang::parse_file(&file);

            if show_ast {
                println!("{}", ast::print::dump(&result.unit));
            }
            if emit == Some(EmitType::Ast) {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&result.unit).into_diagnostic()?
                );
            }

            if result.diagnostics.is_empty() {
                Ok(())
            } else {
                let mut reporter = Reporter::new(file);
                reporter.extend(result.diagnostics);
                reporter.emit_all();
                Err(miette::miette!(
                    "parsing failed with {} error(s)",
                    reporter.error_count()
                ))
            }
        }

        Commands::Tokens { input } => {
            let file = read_source(&input)?;
            let (tokens, errors) = lexer::lex(&file);
            for token in &tokens {
                println!(
                    "{:>5}..{:<5} {:?} {:?}",
                    token.span.start, token.span.end, token.kind, token.text
                );
            }
            if errors.is_empty() {
                Ok(())
            } else {
                let mut reporter = Reporter::new(file);
                reporter.extend(errors);
                reporter.emit_all();
                Err(miette::miette!(
                    "lexing produced {} error(s)",
                    reporter.error_count()
                ))
            }
        }

        Commands::Info => {
            println!("AutoLang compiler v{}", autolang::VERSION);
            println!("An expression-oriented systems language front end");
            Ok(())
        }
    }
}

fn read_source(path: &std::path::Path) -> Result<SourceFile> {
    let content = std::fs::read_to_string(path).into_diagnostic()?;
    Ok(SourceFile::new(path.display().to_string(), content))
}
