//! Configuration management for cmdtree.
//!
//! Handles loading the tokenizer options and the list of definition roots from a
//! TOML file.

use crate::error::{CommandTreeError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for cmdtree.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Prefix, quoting and named-argument settings.
    #[serde(default)]
    pub parser: ParserOptions,

    /// Directories that hold command definitions.
    #[serde(default)]
    pub sources: Vec<PathBuf>,
}

/// Options consumed by the tokenizer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParserOptions {
    /// Prefix every command input must start with.
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Whether quoted spans are kept together as one argument.
    #[serde(default = "default_use_quotes")]
    pub use_quotes: bool,

    /// Character that opens and closes a quoted span.
    #[serde(default = "default_quote_char")]
    pub quote_char: char,

    /// Marker that introduces a named argument (`-x`, `--key=value`).
    #[serde(default = "default_named_separator")]
    pub named_separator: String,
}

fn default_prefix() -> String {
    "!".to_string()
}

fn default_use_quotes() -> bool {
    true
}

fn default_quote_char() -> char {
    '"'
}

fn default_named_separator() -> String {
    "-".to_string()
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            use_quotes: default_use_quotes(),
            quote_char: default_quote_char(),
            named_separator: default_named_separator(),
        }
    }
}

impl ParserOptions {
    /// Checks that the options can drive a tokenizer.
    pub fn validate(&self) -> Result<()> {
        if self.prefix.is_empty() {
            return Err(CommandTreeError::config("prefix must not be empty"));
        }
        if self.named_separator.is_empty() {
            return Err(CommandTreeError::config(
                "named separator must not be empty",
            ));
        }
        if self.quote_char.is_whitespace() {
            return Err(CommandTreeError::config(
                "quote character must not be whitespace",
            ));
        }
        Ok(())
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cmdtree")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| CommandTreeError::config(format!("Failed to read config file: {e}")))?;

        let config = Self::parse_toml(&content, path)?;
        config.parser.validate()?;
        Ok(config.resolve_sources(path))
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            CommandTreeError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }

    /// Makes relative source directories relative to the config file.
    fn resolve_sources(mut self, path: &Path) -> Self {
        if let Some(base) = path.parent() {
            self.sources = self
                .sources
                .into_iter()
                .map(|dir| if dir.is_relative() { base.join(dir) } else { dir })
                .collect();
        }
        self
    }
}
