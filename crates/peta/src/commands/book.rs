//! `peta book` command implementation.

use clap::Args;
use peta_storage::Storage;

use super::{AssemblyArgs, assembler};
use crate::error::CliError;
use crate::output::{Output, write_json};

/// Arguments for the book command.
#[derive(Args)]
pub(crate) struct BookArgs {
    /// Book folder name.
    id: String,

    #[command(flatten)]
    common: AssemblyArgs,
}

impl BookArgs {
    /// Assemble one book and write it as a JSON object.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.common.load_config()?;
        let assembler = assembler(&config);

        if !assembler.storage().books()?.contains(&self.id) {
            return Err(CliError::BookNotFound(self.id));
        }

        let book = assembler.try_assemble(&self.id)?;
        write_json(&book, config.output.pretty, self.common.output.as_deref())?;

        output.success(&format!(
            "Assembled \"{}\" with {} section(s)",
            book.title,
            book.sections.len()
        ));
        Ok(())
    }
}
