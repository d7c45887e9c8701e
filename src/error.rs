//! Error types for cmdtree.
//!
//! Construction-time failures (bad definitions, sibling collisions) and runtime
//! resolution failures share one enum so callers can match on a single type.

use thiserror::Error;

/// Main error type for registry construction and command resolution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandTreeError {
    /// A definition is missing a required field or is otherwise malformed.
    #[error("Invalid definition '{source_name}': {reason}")]
    InvalidDefinition { source_name: String, reason: String },

    /// Two sibling commands share a canonical name.
    #[error("Duplicate command '{name}' under {scope}")]
    DuplicateCommand { scope: String, name: String },

    /// Two sibling commands declare the same alias.
    #[error("Duplicate alias '{alias}' under {scope}")]
    DuplicateAlias { scope: String, alias: String },

    /// The leading token matched neither a command name nor an alias.
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    /// The resolved command has no handler to run.
    #[error("Command '{0}' has no handler")]
    NotInvocable(String),

    /// A definition source could not be read.
    #[error("Source error: {0}")]
    Source(String),

    /// Configuration errors (invalid config file, empty prefix, etc.)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CommandTreeError {
    /// Creates an invalid definition error for the named source.
    pub fn invalid_definition(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDefinition {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Creates a duplicate command error.
    pub fn duplicate_command(scope: impl Into<String>, name: impl Into<String>) -> Self {
        Self::DuplicateCommand {
            scope: scope.into(),
            name: name.into(),
        }
    }

    /// Creates a duplicate alias error.
    pub fn duplicate_alias(scope: impl Into<String>, alias: impl Into<String>) -> Self {
        Self::DuplicateAlias {
            scope: scope.into(),
            alias: alias.into(),
        }
    }

    /// Creates a command not found error for the given token.
    pub fn not_found(token: impl Into<String>) -> Self {
        Self::CommandNotFound(token.into())
    }

    /// Creates a source error with the given message.
    pub fn source_error(msg: impl Into<String>) -> Self {
        Self::Source(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns true for errors raised while building the registry.
    pub fn is_construction(&self) -> bool {
        matches!(
            self,
            Self::InvalidDefinition { .. }
                | Self::DuplicateCommand { .. }
                | Self::DuplicateAlias { .. }
                | Self::Source(_)
        )
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidDefinition { .. } => "Definition Error",
            Self::DuplicateCommand { .. } | Self::DuplicateAlias { .. } => "Duplicate Error",
            Self::CommandNotFound(_) => "Resolution Error",
            Self::NotInvocable(_) => "Invocation Error",
            Self::Source(_) => "Source Error",
            Self::Config(_) => "Configuration Error",
        }
    }
}

/// Result type alias using CommandTreeError.
pub type Result<T> = std::result::Result<T, CommandTreeError>;
