//! CLI command implementations.

pub(crate) mod book;
pub(crate) mod books;
pub(crate) mod resolve;
pub(crate) mod toctree;

use std::path::PathBuf;

use clap::Args;
use peta_config::{CliSettings, Config};
use peta_content::BookAssembler;
use peta_storage::FsStorage;

pub(crate) use book::BookArgs;
pub(crate) use books::BooksArgs;
pub(crate) use resolve::ResolveArgs;
pub(crate) use toctree::ToctreeArgs;

use crate::error::CliError;

/// Options shared by the assembly commands.
#[derive(Args)]
pub(crate) struct AssemblyArgs {
    /// Path to configuration file (default: auto-discover peta.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Content directory holding the books directory (overrides config).
    #[arg(long, env = "PETA_CONTENT_DIR")]
    content_dir: Option<PathBuf>,

    /// Write JSON to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit compact JSON.
    #[arg(long)]
    compact: bool,
}

impl AssemblyArgs {
    fn load_config(&self) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            content_dir: self.content_dir.clone(),
            pretty: self.compact.then_some(false),
            ..CliSettings::default()
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}

/// Build an assembler over the configured books directory.
fn assembler(config: &Config) -> BookAssembler<FsStorage> {
    let content = &config.content_resolved;
    BookAssembler::new(FsStorage::with_layout(
        content.books_root(),
        content.root_document.as_str(),
        content.extension.as_str(),
    ))
}
