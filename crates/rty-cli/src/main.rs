//! # rty CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rty_cli::check::{run_check, CheckArgs};
use rty_cli::keywords::{run_keywords, KeywordsArgs};
use rty_cli::validate::{run_validate, ValidateArgs};

/// rty: schema-driven validation for YAML documents.
///
/// Compiles schemas written in the rty type-expression language and
/// validates documents against them, filling in defaults.
#[derive(Parser, Debug)]
#[command(name = "rty", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a document against a schema and print the built values.
    Validate(ValidateArgs),

    /// Compile a schema and print its field tree.
    Check(CheckArgs),

    /// List the reserved configuration keywords of each field kind.
    Keywords(KeywordsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("rty CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args),
        Commands::Check(args) => run_check(&args),
        Commands::Keywords(args) => run_keywords(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
