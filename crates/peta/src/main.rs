//! Peta CLI - book content assembly.
//!
//! Provides commands for:
//! - `books`: Assemble every book into a JSON array
//! - `book`: Assemble a single book
//! - `toctree`: Print a document's toctree order
//! - `resolve`: Resolve a snippet reference against the snippet index

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BookArgs, BooksArgs, ResolveArgs, ToctreeArgs};
use output::Output;

/// Peta - book content assembly.
#[derive(Parser)]
#[command(name = "peta", version, about)]
struct Cli {
    /// Enable verbose output (info-level logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble all books and write them as JSON.
    Books(BooksArgs),
    /// Assemble one book and write it as JSON.
    Book(BookArgs),
    /// Print the section order declared by a document's toctrees.
    Toctree(ToctreeArgs),
    /// Resolve a snippet reference.
    Resolve(ResolveArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Books(args) => args.execute(),
        Commands::Book(args) => args.execute(),
        Commands::Toctree(args) => args.execute(),
        Commands::Resolve(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
