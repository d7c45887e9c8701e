//! Command registry construction and resolution.
//!
//! Definitions are loaded (or written in code), built into an immutable tree of
//! commands with per-level alias indexes, and resolved against prefixed input
//! by walking leading tokens down the tree.

pub mod definitions;
pub mod help;
pub mod loader;
pub mod output;
pub mod registry;
pub mod router;
pub mod tokenizer;
pub mod walker;

pub use definitions::{attach_handler, Caller, CommandDef, Handler, HandlerTable, Permissions};
pub use output::Resolution;
pub use registry::{resolve, Alias, AliasMap, Command, CommandMap, Registry};
pub use router::{CommandRouter, Invocation};
pub use tokenizer::{ArgValue, Args, ParsedCommand, Tokenizer};
pub use walker::{descend, Descent};
