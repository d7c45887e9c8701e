//! cmdtree - hierarchical command registry and resolver for prefixed chat commands.
//!
//! Commands are declared as TOML definitions (or in code), built into a tree of
//! commands and subcommands with per-level aliases, and resolved by walking the
//! leading tokens of an input like `!role add mods --color=red` down that tree.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;

pub use commands::{CommandDef, CommandRouter, Invocation};
pub use config::{Config, ParserOptions};
pub use error::{CommandTreeError, Result};
