//! Presentation-independent summary of one resolution.
//!
//! The binary prints these as text or JSON; embedders can reuse them for logs
//! or replies.

use serde::Serialize;

use super::router::Invocation;
use super::tokenizer::Args;
use crate::error::{CommandTreeError, Result};

/// What happened to one input line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolution {
    /// The input lacked the prefix.
    NotACommand { input: String },
    /// The leading token is not a known command or alias.
    NotFound { input: String, token: String },
    /// The input resolved to a command chain.
    Resolved {
        input: String,
        /// Canonical names, root first.
        chain: Vec<String>,
        args: Args,
        invocable: bool,
        delay: u64,
    },
}

impl Resolution {
    /// Summarises the result of [`CommandRouter::command`](super::CommandRouter::command).
    pub fn from_result(input: &str, result: &Result<Option<Invocation>>) -> Self {
        let input = input.to_string();
        match result {
            Ok(None) => Self::NotACommand { input },
            Ok(Some(inv)) => Self::Resolved {
                input,
                chain: inv.cmds.iter().map(|c| c.name.clone()).collect(),
                args: inv.args.clone(),
                invocable: inv.cmd.is_invocable(),
                delay: inv.cmd.delay,
            },
            Err(CommandTreeError::CommandNotFound(token)) => Self::NotFound {
                input,
                token: token.clone(),
            },
            Err(other) => Self::NotFound {
                input,
                token: other.to_string(),
            },
        }
    }

    /// Returns true for a resolved input.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }

    /// One-line human readable form.
    pub fn to_text(&self) -> String {
        match self {
            Self::NotACommand { input } => format!("{input}: not a command"),
            Self::NotFound { input, token } => format!("{input}: command not found: {token}"),
            Self::Resolved {
                input, chain, args, ..
            } => {
                let mut line = format!("{input}: {}", chain.join(" > "));
                if !args.positional.is_empty() {
                    line.push_str(&format!(" | args: {}", args.positional.join(" ")));
                }
                if !args.named.is_empty() {
                    let named = args
                        .named
                        .iter()
                        .map(|(k, v)| match v.as_str() {
                            Some(value) => format!("{k}={value}"),
                            None => k.clone(),
                        })
                        .collect::<Vec<_>>()
                        .join(" ");
                    line.push_str(&format!(" | named: {named}"));
                }
                line
            }
        }
    }
}
