//! `peta resolve` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use peta_config::{CliSettings, Config};
use peta_content::{ContentError, Resolution, Snippet, load_snippet_index, resolve};

use crate::error::CliError;
use crate::output::{Output, write_lines};

/// Arguments for the resolve command.
#[derive(Args)]
pub(crate) struct ResolveArgs {
    /// Snippet reference: an id, a title or a slug.
    reference: String,

    /// Snippet index JSON file (overrides config).
    #[arg(long, env = "PETA_SNIPPET_INDEX")]
    snippet_index: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover peta.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl ResolveArgs {
    /// Resolve the reference and print `id`, display title and matched rule.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let cli_settings = CliSettings {
            snippet_index: self.snippet_index.clone(),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let (snippets, loaded) = load_index(&config.snippets_resolved.index_path)?;

        match resolve(&self.reference, &snippets, loaded) {
            Resolution::Found { snippet, rule } => write_lines([format!(
                "{}\t{}\t{rule}",
                snippet.id,
                snippet.display_title()
            )]),
            Resolution::Loading => {
                output.warning(&format!("Loading {}...", self.reference));
                Ok(())
            }
            Resolution::NotFound => Err(CliError::SnippetNotFound(self.reference)),
        }
    }
}

/// Load the snippet index. A missing index file means it isn't built yet.
fn load_index(path: &Path) -> Result<(Vec<Snippet>, bool), CliError> {
    match load_snippet_index(path) {
        Ok(snippets) => Ok((snippets, true)),
        Err(ContentError::SnippetIndexNotFound(_)) => {
            tracing::info!(path = %path.display(), "Snippet index not built yet");
            Ok((Vec::new(), false))
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_missing_index_is_not_loaded() {
        let (snippets, loaded) = load_index(Path::new("/nonexistent/index.json")).unwrap();

        assert!(snippets.is_empty());
        assert!(!loaded);
    }

    #[test]
    fn test_existing_index_is_loaded() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("index.json");
        std::fs::write(&path, r#"{"items": [{"id": "fib-1", "title": "Fibonacci"}]}"#).unwrap();

        let (snippets, loaded) = load_index(&path).unwrap();

        assert!(loaded);
        assert_eq!(snippets.len(), 1);
        assert!(matches!(
            resolve("fibonacci", &snippets, loaded),
            Resolution::Found { .. }
        ));
    }

    #[test]
    fn test_invalid_index_is_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("index.json");
        std::fs::write(&path, "not json").unwrap();

        let err = load_index(&path).unwrap_err();

        assert!(matches!(err, CliError::Content(ContentError::Json { .. })));
    }
}
