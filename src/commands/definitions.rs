//! Command definitions as they come out of a definition source.
//!
//! A [`CommandDef`] is the raw, unvalidated description of one command. The
//! required metadata fields are optional here so a missing field can be
//! reported by the registry builder instead of failing deserialization.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use super::tokenizer::Args;
use crate::error::{CommandTreeError, Result};

/// Opaque caller identity handed to handlers (a guild member, a user id, ...).
pub type Caller = dyn Any + Send + Sync;

/// Executable body of a command: `(caller, parsed args, extra args) -> output`.
pub type Handler = Arc<dyn Fn(&Caller, &Args, Option<&Value>) -> anyhow::Result<Value> + Send + Sync>;

/// Handlers keyed by space-separated command path (`"role add"`).
pub type HandlerTable = BTreeMap<String, Handler>;

/// Gating hints carried for an external permission check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Permissions {
    pub admin_only: bool,
    pub moder_only: bool,
    pub owner_only: bool,
}

impl Permissions {
    /// Returns true when no flag is set.
    pub fn is_public(&self) -> bool {
        !(self.admin_only || self.moder_only || self.owner_only)
    }

    /// Names of the flags that are set, for display.
    pub fn labels(&self) -> Vec<&'static str> {
        [
            (self.admin_only, "admin"),
            (self.moder_only, "moderator"),
            (self.owner_only, "owner"),
        ]
        .into_iter()
        .filter_map(|(set, label)| set.then_some(label))
        .collect()
    }
}

/// Definition of a command, possibly with nested subcommand definitions.
#[derive(Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandDef {
    /// Canonical name. File-backed definitions take it from the file stem.
    #[serde(default)]
    pub name: String,
    /// Usage string shown in help.
    pub usage: Option<String>,
    /// Short description shown in help.
    pub description: Option<String>,
    /// Alternative names, in declaration order.
    pub aliases: Option<Vec<String>>,
    /// Cooldown hint for an external rate limiter.
    pub delay: Option<u64>,
    #[serde(default, alias = "adminOnly")]
    pub admin_only: bool,
    #[serde(default, alias = "moderOnly")]
    pub moder_only: bool,
    #[serde(default, alias = "ownerOnly")]
    pub owner_only: bool,
    /// Inline subcommand definitions.
    #[serde(default, alias = "subcommands")]
    pub builder: Vec<CommandDef>,
    #[serde(skip)]
    pub handler: Option<Handler>,
    /// File the definition was read from, if any.
    #[serde(skip)]
    pub origin: Option<PathBuf>,
}

impl fmt::Debug for CommandDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDef")
            .field("name", &self.name)
            .field("usage", &self.usage)
            .field("description", &self.description)
            .field("aliases", &self.aliases)
            .field("delay", &self.delay)
            .field("permissions", &self.permissions())
            .field("builder", &self.builder)
            .field("handler", &self.handler.is_some())
            .field("origin", &self.origin)
            .finish()
    }
}

impl CommandDef {
    /// Creates an empty definition with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = Some(aliases.into_iter().map(Into::into).collect());
        self
    }

    pub fn delay(mut self, delay: u64) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn admin_only(mut self) -> Self {
        self.admin_only = true;
        self
    }

    pub fn moder_only(mut self) -> Self {
        self.moder_only = true;
        self
    }

    pub fn owner_only(mut self) -> Self {
        self.owner_only = true;
        self
    }

    /// Gating flags as one value.
    pub fn permissions(&self) -> Permissions {
        Permissions {
            admin_only: self.admin_only,
            moder_only: self.moder_only,
            owner_only: self.owner_only,
        }
    }

    /// Appends a nested subcommand definition.
    pub fn subcommand(mut self, child: CommandDef) -> Self {
        self.builder.push(child);
        self
    }

    /// Sets the handler run when this command is the end of a chain.
    pub fn handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Caller, &Args, Option<&Value>) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Label used in error messages: the source file when known, else the name.
    pub fn source_label(&self) -> String {
        match &self.origin {
            Some(path) => path.display().to_string(),
            None => self.name.clone(),
        }
    }
}

/// Binds a handler to the definition at `path` (space-separated canonical names).
pub fn attach_handler(defs: &mut [CommandDef], path: &str, handler: Handler) -> Result<()> {
    let mut names = path.split_whitespace();
    let first = names
        .next()
        .ok_or_else(|| CommandTreeError::invalid_definition(path, "empty handler path"))?;

    let mut current = defs
        .iter_mut()
        .find(|d| d.name == first)
        .ok_or_else(|| CommandTreeError::invalid_definition(path, "no definition at this path"))?;

    for name in names {
        current = current
            .builder
            .iter_mut()
            .find(|d| d.name == name)
            .ok_or_else(|| {
                CommandTreeError::invalid_definition(path, "no definition at this path")
            })?;
    }

    current.handler = Some(handler);
    Ok(())
}

/// Binds every handler in `table` to its definition.
pub fn attach_handlers(defs: &mut [CommandDef], table: &HandlerTable) -> Result<()> {
    for (path, handler) in table {
        attach_handler(defs, path, Arc::clone(handler))?;
    }
    Ok(())
}
