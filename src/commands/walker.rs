//! Greedy descent from a root command into its subcommands.

use std::sync::Arc;

use super::registry::Command;

/// Outcome of walking a token sequence down the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Descent {
    /// Matched commands, root first. Never empty.
    pub chain: Vec<Arc<Command>>,
    /// Tokens from the first unmatched one onwards.
    pub remaining: Vec<String>,
}

impl Descent {
    /// Deepest matched command.
    pub fn terminal(&self) -> &Arc<Command> {
        // chain always starts with the root
        &self.chain[self.chain.len() - 1]
    }

    /// Number of tokens consumed as subcommand selectors.
    pub fn depth(&self) -> usize {
        self.chain.len() - 1
    }
}

/// Walks `tokens` down from `root`, one subcommand per leading token.
///
/// Stops at the first token that is neither a subcommand name nor a subcommand
/// alias of the current node, or when the current node has no subcommands.
/// Consumed tokens are never given back.
pub fn descend(root: &Arc<Command>, tokens: &[String]) -> Descent {
    let mut chain = vec![Arc::clone(root)];
    let mut consumed = 0;

    while let Some(token) = tokens.get(consumed) {
        let cursor = &chain[chain.len() - 1];
        if cursor.subcommands.is_empty() {
            break;
        }
        let Some(next) = cursor.subcommand(token) else {
            break;
        };
        let next = Arc::clone(next);
        chain.push(next);
        consumed += 1;
    }

    Descent {
        chain,
        remaining: tokens[consumed..].to_vec(),
    }
}
