//! Command routing for prefixed input.
//!
//! [`CommandRouter`] owns the tokenizer options and the command registry, and
//! turns raw input into an [`Invocation`]: the deepest matching command, the
//! chain that led to it, the leftover arguments and a bound handler.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use super::definitions::{attach_handlers, Caller, CommandDef, HandlerTable};
use super::loader::load_dirs;
use super::registry::{AliasMap, Command, CommandMap, Registry};
use super::tokenizer::{Args, Tokenizer};
use super::walker::descend;
use crate::config::{Config, ParserOptions};
use crate::error::{CommandTreeError, Result};

/// A successfully resolved command input.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Parsed arguments, with subcommand tokens removed from `positional`.
    pub args: Args,
    /// Deepest matched command.
    pub cmd: Arc<Command>,
    /// Matched commands from the root to `cmd`.
    pub cmds: Vec<Arc<Command>>,
    /// Always true for a resolved invocation.
    pub exist: bool,
}

impl Invocation {
    /// Runs the terminal command's handler.
    ///
    /// Without a caller nothing runs and `Ok(None)` is returned. A caller on a
    /// command with no handler yields [`CommandTreeError::NotInvocable`].
    pub fn exec(
        &self,
        caller: Option<&Caller>,
        extra: Option<&Value>,
    ) -> anyhow::Result<Option<Value>> {
        let Some(caller) = caller else {
            return Ok(None);
        };
        let handler = self
            .cmd
            .handler
            .as_ref()
            .ok_or_else(|| CommandTreeError::NotInvocable(self.cmd.name.clone()))?;
        handler(caller, &self.args, extra).map(Some)
    }

    /// Space-separated canonical names of the chain.
    pub fn path(&self) -> String {
        self.cmds
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Registry plus tokenizer configuration for one command surface.
pub struct CommandRouter {
    tokenizer: Tokenizer,
    sources: Vec<PathBuf>,
    handlers: HandlerTable,
    registry: Arc<Registry>,
}

impl CommandRouter {
    /// Creates a router over in-memory definitions.
    pub fn from_definitions(options: ParserOptions, defs: &[CommandDef]) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            tokenizer: Tokenizer::new(options),
            sources: Vec::new(),
            handlers: HandlerTable::new(),
            registry: Arc::new(Registry::from_definitions(defs)?),
        })
    }

    /// Creates a router over definition directories, binding `handlers` by path.
    pub fn from_dirs(
        options: ParserOptions,
        sources: Vec<PathBuf>,
        handlers: HandlerTable,
    ) -> Result<Self> {
        options.validate()?;
        let registry = load_registry(&sources, &handlers)?;
        Ok(Self {
            tokenizer: Tokenizer::new(options),
            sources,
            handlers,
            registry: Arc::new(registry),
        })
    }

    /// Creates a router from a loaded configuration file.
    pub fn from_config(config: &Config, handlers: HandlerTable) -> Result<Self> {
        Self::from_dirs(config.parser.clone(), config.sources.clone(), handlers)
    }

    /// Rebuilds the registry from `sources`.
    ///
    /// The new tree replaces the old one only if it builds cleanly; on error
    /// the previous registry and sources stay in place.
    pub fn reinit(&mut self, sources: Vec<PathBuf>) -> Result<()> {
        let registry = load_registry(&sources, &self.handlers)?;
        self.sources = sources;
        self.swap(registry);
        Ok(())
    }

    /// Rebuilds the registry from in-memory definitions.
    pub fn reinit_definitions(&mut self, defs: &[CommandDef]) -> Result<()> {
        let registry = Registry::from_definitions(defs)?;
        self.sources.clear();
        self.swap(registry);
        Ok(())
    }

    fn swap(&mut self, registry: Registry) {
        info!(
            roots = registry.commands().len(),
            nodes = registry.node_count(),
            "Command registry replaced"
        );
        self.registry = Arc::new(registry);
    }

    /// Resolves a raw input string.
    ///
    /// - `Ok(None)`: the input lacks the prefix and is not a command at all.
    /// - `Err(CommandNotFound)`: the leading token is unknown.
    /// - `Ok(Some(_))`: the resolved invocation.
    pub fn command(&self, input: &str) -> Result<Option<Invocation>> {
        let Some(parsed) = self.tokenizer.parse(input) else {
            return Ok(None);
        };

        let root = self
            .registry
            .resolve(&parsed.command)
            .ok_or_else(|| CommandTreeError::not_found(&parsed.command))?;

        let mut args = parsed.args;
        let descent = descend(root, &args.positional);
        args.positional = descent.remaining;
        let cmd = Arc::clone(descent.chain.last().unwrap_or(root));

        Ok(Some(Invocation {
            args,
            cmd,
            cmds: descent.chain,
            exist: true,
        }))
    }

    pub fn registry(&self) -> Arc<Registry> {
        Arc::clone(&self.registry)
    }

    pub fn commands(&self) -> &CommandMap {
        self.registry.commands()
    }

    pub fn aliases(&self) -> &AliasMap {
        self.registry.aliases()
    }

    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    pub fn options(&self) -> &ParserOptions {
        self.tokenizer.options()
    }

    pub fn prefix(&self) -> &str {
        &self.options().prefix
    }

    pub fn use_quotes(&self) -> bool {
        self.options().use_quotes
    }

    pub fn quote_char(&self) -> char {
        self.options().quote_char
    }

    pub fn named_separator(&self) -> &str {
        &self.options().named_separator
    }

    pub fn set_prefix(&mut self, prefix: impl Into<String>) -> Result<()> {
        self.update_options(|o| o.prefix = prefix.into())
    }

    pub fn enable_quotes(&mut self) {
        self.tokenizer = Tokenizer::new(ParserOptions {
            use_quotes: true,
            ..self.options().clone()
        });
    }

    pub fn disable_quotes(&mut self) {
        self.tokenizer = Tokenizer::new(ParserOptions {
            use_quotes: false,
            ..self.options().clone()
        });
    }

    pub fn set_quote_char(&mut self, quote_char: char) -> Result<()> {
        self.update_options(|o| o.quote_char = quote_char)
    }

    pub fn set_named_separator(&mut self, separator: impl Into<String>) -> Result<()> {
        self.update_options(|o| o.named_separator = separator.into())
    }

    /// Rebuilds the tokenizer from edited options; the trees are untouched.
    fn update_options(&mut self, edit: impl FnOnce(&mut ParserOptions)) -> Result<()> {
        let mut options = self.options().clone();
        edit(&mut options);
        options.validate()?;
        self.tokenizer = Tokenizer::new(options);
        Ok(())
    }
}

fn load_registry(sources: &[PathBuf], handlers: &HandlerTable) -> Result<Registry> {
    let mut defs = load_dirs(sources)?;
    attach_handlers(&mut defs, handlers)?;
    Registry::from_definitions(&defs)
}
