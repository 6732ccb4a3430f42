//! `peta toctree` command implementation.

use std::path::PathBuf;

use clap::Args;
use peta_content::extract_order;

use crate::error::CliError;
use crate::output::write_lines;

/// Arguments for the toctree command.
#[derive(Args)]
pub(crate) struct ToctreeArgs {
    /// Document to scan for toctree blocks.
    file: PathBuf,
}

impl ToctreeArgs {
    /// Print the declared section order, one id per line.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let raw = std::fs::read_to_string(&self.file)?;
        write_lines(extract_order(&raw))
    }
}
