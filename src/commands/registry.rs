//! Command registry: the resolved command tree and its alias index.
//!
//! [`build`] turns a list of [`CommandDef`]s into a [`CommandMap`] of fully
//! validated [`Command`] nodes plus an [`AliasMap`] for the same level. Every
//! node keeps the alias index for its own children, so resolution works the
//! same way at any depth.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::definitions::{CommandDef, Handler, Permissions};
use crate::error::{CommandTreeError, Result};

/// Alias index for one tree level, keyed by alias string.
pub type AliasMap = HashMap<String, Alias>;

/// Entry in an alias index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alias {
    /// Canonical name of the command this alias points to.
    pub name: String,
    /// Alias index of that command's subcommands.
    pub subaliases: AliasMap,
}

/// A validated node in the command tree.
#[derive(Clone)]
pub struct Command {
    pub name: String,
    pub usage: String,
    pub description: String,
    pub aliases: Vec<String>,
    /// Cooldown hint, enforced elsewhere.
    pub delay: u64,
    pub permissions: Permissions,
    /// Present only on commands meant to be invoked directly.
    pub handler: Option<Handler>,
    pub subcommands: CommandMap,
    /// Alias index over `subcommands`.
    pub subaliases: AliasMap,
}

impl Command {
    /// Returns true if this command has a handler.
    pub fn is_invocable(&self) -> bool {
        self.handler.is_some()
    }

    /// Resolves a token against this command's subcommands.
    pub fn subcommand(&self, token: &str) -> Option<&Arc<Command>> {
        resolve(token, &self.subcommands, &self.subaliases)
    }

    /// Number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self
            .subcommands
            .iter()
            .map(|c| c.node_count())
            .sum::<usize>()
    }
}

impl PartialEq for Command {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.usage == other.usage
            && self.description == other.description
            && self.aliases == other.aliases
            && self.delay == other.delay
            && self.permissions == other.permissions
            && self.handler.is_some() == other.handler.is_some()
            && self.subcommands == other.subcommands
            && self.subaliases == other.subaliases
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("usage", &self.usage)
            .field("description", &self.description)
            .field("aliases", &self.aliases)
            .field("delay", &self.delay)
            .field("permissions", &self.permissions)
            .field("handler", &self.handler.is_some())
            .field("subcommands", &self.subcommands)
            .finish()
    }
}

/// Commands keyed by canonical name, iterated in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandMap {
    entries: Vec<Arc<Command>>,
    index: HashMap<String, usize>,
}

impl CommandMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a command. Returns it back if the name is already taken.
    fn insert(&mut self, command: Command) -> std::result::Result<(), Command> {
        if self.index.contains_key(&command.name) {
            return Err(command);
        }
        self.index.insert(command.name.clone(), self.entries.len());
        self.entries.push(Arc::new(command));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Command>> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonical names in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|c| c.name.as_str())
    }

    /// Commands in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Command>> {
        self.entries.iter()
    }
}

/// Resolves `token` at one tree level.
///
/// A canonical name always wins over an alias with the same spelling.
pub fn resolve<'a>(
    token: &str,
    commands: &'a CommandMap,
    aliases: &AliasMap,
) -> Option<&'a Arc<Command>> {
    if token.is_empty() {
        return None;
    }
    if let Some(command) = commands.get(token) {
        return Some(command);
    }
    aliases
        .get(token)
        .and_then(|alias| commands.get(&alias.name))
}

/// Builds the command map and alias index for a list of root definitions.
///
/// The first invalid or colliding definition aborts the whole build.
pub fn build(defs: &[CommandDef]) -> Result<(CommandMap, AliasMap)> {
    build_level(defs, &[])
}

fn build_level(defs: &[CommandDef], parents: &[&str]) -> Result<(CommandMap, AliasMap)> {
    let mut commands = CommandMap::new();
    let mut aliases = AliasMap::new();

    for def in defs {
        let command = build_command(def, parents)?;

        if commands.contains_key(&command.name) {
            return Err(CommandTreeError::duplicate_command(
                scope_label(parents),
                &command.name,
            ));
        }

        for alias in &command.aliases {
            if aliases.contains_key(alias) {
                return Err(CommandTreeError::duplicate_alias(
                    scope_label(parents),
                    alias,
                ));
            }
            aliases.insert(
                alias.clone(),
                Alias {
                    name: command.name.clone(),
                    subaliases: command.subaliases.clone(),
                },
            );
        }

        commands.insert(command).map_err(|c| {
            CommandTreeError::duplicate_command(scope_label(parents), c.name)
        })?;
    }

    Ok((commands, aliases))
}

fn build_command(def: &CommandDef, parents: &[&str]) -> Result<Command> {
    let label = def.source_label();
    let invalid = |reason: &str| CommandTreeError::invalid_definition(&label, reason);

    if def.name.is_empty() {
        return Err(invalid("missing field 'name'"));
    }
    if def.name.chars().any(char::is_whitespace) {
        return Err(invalid("name must not contain whitespace"));
    }

    let usage = def
        .usage
        .clone()
        .ok_or_else(|| invalid("missing field 'usage'"))?;
    let description = def
        .description
        .clone()
        .ok_or_else(|| invalid("missing field 'description'"))?;
    let aliases = def
        .aliases
        .clone()
        .ok_or_else(|| invalid("missing field 'aliases'"))?;
    let delay = def.delay.ok_or_else(|| invalid("missing field 'delay'"))?;

    if aliases
        .iter()
        .any(|a| a.is_empty() || a.chars().any(char::is_whitespace))
    {
        return Err(invalid("aliases must be non-empty single words"));
    }

    let mut path = parents.to_vec();
    path.push(def.name.as_str());
    let (subcommands, subaliases) = build_level(&def.builder, &path)?;

    Ok(Command {
        name: def.name.clone(),
        usage,
        description,
        aliases,
        delay,
        permissions: def.permissions(),
        handler: def.handler.clone(),
        subcommands,
        subaliases,
    })
}

fn scope_label(parents: &[&str]) -> String {
    if parents.is_empty() {
        "<root>".to_string()
    } else {
        parents.join(" ")
    }
}

/// The root command tree and alias index, immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    commands: CommandMap,
    aliases: AliasMap,
}

impl Registry {
    /// Builds a registry from root definitions.
    pub fn from_definitions(defs: &[CommandDef]) -> Result<Self> {
        let (commands, aliases) = build(defs)?;
        let registry = Self { commands, aliases };
        debug!(
            roots = registry.commands.len(),
            nodes = registry.node_count(),
            aliases = registry.aliases.len(),
            "Command registry built"
        );
        Ok(registry)
    }

    pub fn commands(&self) -> &CommandMap {
        &self.commands
    }

    pub fn aliases(&self) -> &AliasMap {
        &self.aliases
    }

    /// Resolves a root-level token by name, then by alias.
    pub fn resolve(&self, token: &str) -> Option<&Arc<Command>> {
        resolve(token, &self.commands, &self.aliases)
    }

    /// Finds a command by its space-separated canonical path.
    pub fn find(&self, path: &str) -> Option<&Arc<Command>> {
        let mut names = path.split_whitespace();
        let mut current = self.commands.get(names.next()?)?;
        for name in names {
            current = current.subcommands.get(name)?;
        }
        Some(current)
    }

    /// Total number of commands at every depth.
    pub fn node_count(&self) -> usize {
        self.commands.iter().map(|c| c.node_count()).sum()
    }
}
