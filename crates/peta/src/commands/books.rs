//! `peta books` command implementation.

use clap::Args;

use super::{AssemblyArgs, assembler};
use crate::error::CliError;
use crate::output::{Output, write_json};

/// Arguments for the books command.
#[derive(Args)]
pub(crate) struct BooksArgs {
    #[command(flatten)]
    common: AssemblyArgs,
}

impl BooksArgs {
    /// Assemble every book and write them as a JSON array.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.common.load_config()?;
        let assembler = assembler(&config);

        output.info(&format!(
            "Books: {}",
            config.content_resolved.books_root().display()
        ));

        let books = assembler.assemble_all();
        write_json(&books, config.output.pretty, self.common.output.as_deref())?;

        output.success(&format!("Assembled {} book(s)", books.len()));
        Ok(())
    }
}
