//! Command-line argument parsing for cmdtree.

use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;

/// Output format for resolution results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One line per input.
    #[default]
    Text,
    /// One JSON object per input.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!(
                "Invalid output format: {s}. Expected: text or json"
            )),
        }
    }
}

/// Resolve prefixed command input against a tree of command definitions.
#[derive(Parser, Debug)]
#[command(name = "cmdtree")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Inputs to resolve (e.g. "!role add mods"); reads stdin lines when omitted
    #[arg(value_name = "INPUT")]
    pub inputs: Vec<String>,

    /// Definition directory (repeatable); replaces the config file's sources
    #[arg(short = 'd', long = "dir", value_name = "DIR")]
    pub dirs: Vec<PathBuf>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Command prefix
    #[arg(short = 'p', long, value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Treat quote characters literally
    #[arg(long)]
    pub no_quotes: bool,

    /// Quote character
    #[arg(long, value_name = "CHAR")]
    pub quote_char: Option<char>,

    /// Named argument separator
    #[arg(long, value_name = "SEP")]
    pub separator: Option<String>,

    /// Print the command tree before resolving
    #[arg(long)]
    pub tree: bool,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    pub output: String,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Applies command-line overrides on top of the file configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if !self.dirs.is_empty() {
            config.sources = self.dirs.clone();
        }
        if let Some(prefix) = &self.prefix {
            config.parser.prefix = prefix.clone();
        }
        if self.no_quotes {
            config.parser.use_quotes = false;
        }
        if let Some(quote_char) = self.quote_char {
            config.parser.quote_char = quote_char;
        }
        if let Some(separator) = &self.separator {
            config.parser.named_separator = separator.clone();
        }
    }

    /// Parses the output format from the --output argument.
    pub fn parse_output_format(&self) -> std::result::Result<OutputFormat, String> {
        self.output.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let cli = Cli::try_parse_from(["cmdtree", "!ping"]).unwrap();
        assert_eq!(cli.inputs, vec!["!ping".to_string()]);
        assert!(cli.dirs.is_empty());
        assert!(!cli.tree);
        assert_eq!(cli.parse_output_format(), Ok(OutputFormat::Text));
    }

    #[test]
    fn test_parse_all_flags() {
        let cli = Cli::try_parse_from([
            "cmdtree",
            "-d",
            "commands",
            "--dir",
            "extra",
            "--prefix",
            "?",
            "--no-quotes",
            "--quote-char",
            "'",
            "--separator",
            "+",
            "--tree",
            "--output",
            "json",
            "?ping",
        ])
        .unwrap();

        assert_eq!(
            cli.dirs,
            vec![PathBuf::from("commands"), PathBuf::from("extra")]
        );
        assert_eq!(cli.parse_output_format(), Ok(OutputFormat::Json));

        let mut config = Config::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.parser.prefix, "?");
        assert!(!config.parser.use_quotes);
        assert_eq!(config.parser.quote_char, '\'');
        assert_eq!(config.parser.named_separator, "+");
        assert_eq!(config.sources.len(), 2);
    }

    #[test]
    fn test_overrides_keep_config_sources_without_dirs() {
        let cli = Cli::try_parse_from(["cmdtree"]).unwrap();
        let mut config = Config {
            sources: vec![PathBuf::from("/srv/commands")],
            ..Default::default()
        };
        cli.apply_overrides(&mut config);
        assert_eq!(config.sources, vec![PathBuf::from("/srv/commands")]);
    }

    #[test]
    fn test_invalid_output_format() {
        let cli = Cli::try_parse_from(["cmdtree", "--output", "yaml"]).unwrap();
        assert!(cli.parse_output_format().is_err());
    }

    #[test]
    fn test_config_path_default() {
        let cli = Cli::try_parse_from(["cmdtree"]).unwrap();
        assert_eq!(cli.config_path(), Config::default_path());
    }
}
