//! Reads command definitions from directories of TOML files.
//!
//! Layout of a definition root:
//!
//! ```text
//! commands/
//!   ping.toml           -> command `ping`
//!   role.toml           -> command `role`
//!   role/               -> subcommands of `role`
//!     add.toml
//!     remove.toml
//! ```
//!
//! Entries are read in file-name order. Subcommands found in a directory are
//! appended after any inline `[[builder]]` entries of the parent file.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::definitions::CommandDef;
use crate::error::{CommandTreeError, Result};

const DEFINITION_EXTENSION: &str = "toml";

/// Loads and concatenates the root definitions of every directory in `roots`.
pub fn load_dirs<P: AsRef<Path>>(roots: &[P]) -> Result<Vec<CommandDef>> {
    let mut defs = Vec::new();
    for root in roots {
        defs.extend(load_dir(root.as_ref())?);
    }
    info!(
        roots = roots.len(),
        commands = defs.len(),
        "Loaded command definitions"
    );
    Ok(defs)
}

/// Loads the definitions under a single root directory.
pub fn load_dir(dir: &Path) -> Result<Vec<CommandDef>> {
    if !dir.is_dir() {
        return Err(CommandTreeError::source_error(format!(
            "{} is not a directory",
            dir.display()
        )));
    }
    read_level(dir)
}

fn read_level(dir: &Path) -> Result<Vec<CommandDef>> {
    let entries = fs::read_dir(dir).map_err(|e| {
        CommandTreeError::source_error(format!("Failed to read {}: {e}", dir.display()))
    })?;

    let mut files: BTreeMap<String, PathBuf> = BTreeMap::new();
    let mut subdirs: BTreeMap<String, PathBuf> = BTreeMap::new();

    for entry in entries {
        let entry = entry.map_err(|e| {
            CommandTreeError::source_error(format!("Failed to read {}: {e}", dir.display()))
        })?;
        let path = entry.path();
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            return Err(CommandTreeError::invalid_definition(
                path.display().to_string(),
                "file name is not valid UTF-8",
            ));
        };
        if file_name.starts_with('.') {
            continue;
        }

        if path.is_dir() {
            subdirs.insert(file_name.to_string(), path);
        } else if path.extension().and_then(|e| e.to_str()) == Some(DEFINITION_EXTENSION) {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                files.insert(stem.to_string(), path.clone());
            }
        }
    }

    if let Some((_, orphan)) = subdirs.iter().find(|(name, _)| !files.contains_key(*name)) {
        return Err(CommandTreeError::invalid_definition(
            orphan.display().to_string(),
            "subcommand directory has no matching definition file",
        ));
    }

    let mut defs = Vec::with_capacity(files.len());
    for (stem, path) in &files {
        let mut def = read_definition(path, stem)?;
        if let Some(subdir) = subdirs.get(stem) {
            def.builder.extend(read_level(subdir)?);
        }
        defs.push(def);
    }

    debug!(dir = %dir.display(), count = defs.len(), "Read definition directory");
    Ok(defs)
}

/// Parses one definition file. The file stem becomes the command name.
fn read_definition(path: &Path, stem: &str) -> Result<CommandDef> {
    let label = path.display().to_string();
    let content = fs::read_to_string(path)
        .map_err(|e| CommandTreeError::source_error(format!("Failed to read {label}: {e}")))?;

    let mut def: CommandDef = toml::from_str(&content)
        .map_err(|e| CommandTreeError::invalid_definition(&label, e.to_string().trim()))?;

    if !def.name.is_empty() && def.name != stem {
        return Err(CommandTreeError::invalid_definition(
            &label,
            format!("name '{}' does not match file name '{stem}'", def.name),
        ));
    }

    def.name = stem.to_string();
    def.origin = Some(path.to_path_buf());
    Ok(def)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const BODY: &str = "usage = \"u\"\ndescription = \"d\"\naliases = []\ndelay = 0\n";

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_load_flat_directory_sorted() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "pong.toml", BODY);
        write(dir.path(), "ban.toml", BODY);
        write(dir.path(), "README.md", "ignored");

        let defs = load_dir(dir.path()).unwrap();
        let names: Vec<_> = defs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["ban", "pong"]);
        assert_eq!(defs[0].origin.as_deref(), Some(dir.path().join("ban.toml").as_path()));
    }

    #[test]
    fn test_load_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "role.toml", BODY);
        write(dir.path(), "role/add.toml", BODY);
        write(dir.path(), "role/remove.toml", BODY);
        write(dir.path(), "role/remove/all.toml", BODY);

        let defs = load_dir(dir.path()).unwrap();
        assert_eq!(defs.len(), 1);
        let role = &defs[0];
        assert_eq!(role.builder.len(), 2);
        assert_eq!(role.builder[1].name, "remove");
        assert_eq!(role.builder[1].builder[0].name, "all");
    }

    #[test]
    fn test_inline_builder_comes_before_directory_children() {
        let dir = tempfile::tempdir().unwrap();
        let parent = format!(
            "{BODY}\n[[builder]]\nname = \"inline\"\nusage = \"u\"\ndescription = \"d\"\naliases = []\ndelay = 0\n"
        );
        write(dir.path(), "cfg.toml", &parent);
        write(dir.path(), "cfg/fromdir.toml", BODY);

        let defs = load_dir(dir.path()).unwrap();
        let names: Vec<_> = defs[0].builder.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["inline", "fromdir"]);
    }

    #[test]
    fn test_orphan_directory_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "lonely/child.toml", BODY);

        let err = load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, CommandTreeError::InvalidDefinition { .. }));
    }

    #[test]
    fn test_mismatched_name_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "ping.toml", &format!("name = \"pong\"\n{BODY}"));

        let err = load_dir(dir.path()).unwrap_err();
        assert!(err.to_string().contains("does not match"));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "ping.toml", "usage = ");

        let err = load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, CommandTreeError::InvalidDefinition { .. }));
    }

    #[test]
    fn test_missing_root_is_source_error() {
        let err = load_dir(Path::new("/nonexistent/commands")).unwrap_err();
        assert!(matches!(err, CommandTreeError::Source(_)));
    }

    #[test]
    fn test_load_multiple_roots() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        write(first.path(), "a.toml", BODY);
        write(second.path(), "b.toml", BODY);

        let defs = load_dirs(&[first.path(), second.path()]).unwrap();
        let names: Vec<_> = defs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
