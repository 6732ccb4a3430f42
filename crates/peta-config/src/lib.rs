//! Configuration management for Peta.
//!
//! Parses `peta.toml` with serde and discovers it in the current directory or
//! any parent. Relative paths resolve against the config file's directory.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `content.content_dir`
//! - `content.books_dir`
//! - `snippets.index_path`

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "peta.toml";

const DEFAULT_CONTENT_DIR: &str = "_content";
const DEFAULT_BOOKS_DIR: &str = "books";
const DEFAULT_ROOT_DOCUMENT: &str = "index";
const DEFAULT_EXTENSION: &str = "rst";
const DEFAULT_SNIPPET_INDEX: &str = "_build/data/snippets-index.json";

/// CLI settings that override configuration file values.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the content directory. The books directory stays relative to it.
    pub content_dir: Option<PathBuf>,
    /// Override the snippet index file.
    pub snippet_index: Option<PathBuf>,
    /// Override JSON pretty printing.
    pub pretty: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Content layout as parsed from TOML.
    content: ContentConfigRaw,
    /// Snippet index location as parsed from TOML.
    snippets: SnippetsConfigRaw,
    /// Output formatting.
    pub output: OutputConfig,

    /// Resolved content configuration (set after loading).
    #[serde(skip)]
    pub content_resolved: ContentConfig,
    /// Resolved snippet configuration (set after loading).
    #[serde(skip)]
    pub snippets_resolved: SnippetsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    content_dir: Option<String>,
    books_dir: Option<String>,
    root_document: Option<String>,
    extension: Option<String>,
}

/// Resolved content layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentConfig {
    /// Content directory.
    pub content_dir: PathBuf,
    /// Books directory, relative to `content_dir` unless absolute.
    pub books_dir: PathBuf,
    /// File stem of each book's root document.
    pub root_document: String,
    /// Document extension without the leading dot.
    pub extension: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from(DEFAULT_CONTENT_DIR),
            books_dir: PathBuf::from(DEFAULT_BOOKS_DIR),
            root_document: DEFAULT_ROOT_DOCUMENT.to_owned(),
            extension: DEFAULT_EXTENSION.to_owned(),
        }
    }
}

impl ContentConfig {
    /// Directory holding one folder per book.
    #[must_use]
    pub fn books_root(&self) -> PathBuf {
        self.content_dir.join(&self.books_dir)
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SnippetsConfigRaw {
    index_path: Option<String>,
}

/// Resolved snippet configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SnippetsConfig {
    /// Snippet index JSON file.
    pub index_path: PathBuf,
}

/// Output configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`content.content_dir`").
        field: String,
        /// Error message (e.g., "${`PETA_CONTENT`} not set").
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a value to be a bare file name component.
fn require_no_separator(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.contains(['/', '\\']) {
        return Err(ConfigError::Validation(format!(
            "{field} cannot contain a path separator"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `peta.toml` in the current directory and its parents, falling back
    /// to defaults relative to the current directory.
    ///
    /// CLI settings are applied after loading and path resolution.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, or if reading,
    /// parsing, expansion or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(content_dir) = &settings.content_dir {
            self.content_resolved.content_dir.clone_from(content_dir);
        }
        if let Some(snippet_index) = &settings.snippet_index {
            self.snippets_resolved.index_path.clone_from(snippet_index);
        }
        if let Some(pretty) = settings.pretty {
            self.output.pretty = pretty;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            content: ContentConfigRaw::default(),
            snippets: SnippetsConfigRaw::default(),
            output: OutputConfig::default(),
            content_resolved: ContentConfig {
                content_dir: base.join(DEFAULT_CONTENT_DIR),
                ..ContentConfig::default()
            },
            snippets_resolved: SnippetsConfig {
                index_path: base.join(DEFAULT_SNIPPET_INDEX),
            },
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand before resolving so variables can hold absolute paths
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if `root_document` or `extension`
    /// is empty, contains a path separator, or the extension starts with `.`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let content = &self.content_resolved;

        require_non_empty(&content.root_document, "content.root_document")?;
        require_no_separator(&content.root_document, "content.root_document")?;

        require_non_empty(&content.extension, "content.extension")?;
        require_no_separator(&content.extension, "content.extension")?;
        if content.extension.starts_with('.') {
            return Err(ConfigError::Validation(
                "content.extension must not start with '.'".to_owned(),
            ));
        }

        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref dir) = self.content.content_dir {
            self.content.content_dir = Some(expand::expand_env(dir, "content.content_dir")?);
        }
        if let Some(ref dir) = self.content.books_dir {
            self.content.books_dir = Some(expand::expand_env(dir, "content.books_dir")?);
        }
        if let Some(ref path) = self.snippets.index_path {
            self.snippets.index_path = Some(expand::expand_env(path, "snippets.index_path")?);
        }
        Ok(())
    }

    /// Resolve relative paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let content = &self.content;
        self.content_resolved = ContentConfig {
            content_dir: config_dir.join(content.content_dir.as_deref().unwrap_or(DEFAULT_CONTENT_DIR)),
            books_dir: PathBuf::from(content.books_dir.as_deref().unwrap_or(DEFAULT_BOOKS_DIR)),
            root_document: content
                .root_document
                .clone()
                .unwrap_or_else(|| DEFAULT_ROOT_DOCUMENT.to_owned()),
            extension: content
                .extension
                .clone()
                .unwrap_or_else(|| DEFAULT_EXTENSION.to_owned()),
        };

        self.snippets_resolved = SnippetsConfig {
            index_path: config_dir.join(
                self.snippets
                    .index_path
                    .as_deref()
                    .unwrap_or(DEFAULT_SNIPPET_INDEX),
            ),
        };
    }
}
