//! Integration tests for loading and building definition directories.

use cmdtree::commands::{loader, Registry};
use cmdtree::CommandTreeError;
use pretty_assertions::assert_eq;

use super::fixture;

#[test]
fn test_three_level_fixture_structure() {
    let defs = loader::load_dir(&fixture("commands")).unwrap();
    let registry = Registry::from_definitions(&defs).unwrap();

    assert_eq!(registry.commands().keys().collect::<Vec<_>>(), vec!["test_cmd"]);

    let mut level = registry.commands();
    for name in ["test_cmd", "test_2", "test_3"] {
        let command = level.get(name).unwrap();
        assert_eq!(command.usage, "test");
        assert_eq!(command.description, "5");
        assert_eq!(command.aliases, vec!["alias_test".to_string()]);
        assert_eq!(command.delay, 5);
        assert!(!command.is_invocable());
        level = &command.subcommands;
    }
    assert!(level.is_empty());
}

#[test]
fn test_alias_tree_from_fixture() {
    let defs = loader::load_dir(&fixture("commands")).unwrap();
    let registry = Registry::from_definitions(&defs).unwrap();

    let alias = registry.aliases().get("alias_test").unwrap();
    assert_eq!(alias.name, "test_cmd");
    let child = alias.subaliases.get("alias_test").unwrap();
    assert_eq!(child.name, "test_2");
    assert_eq!(child.subaliases.get("alias_test").unwrap().name, "test_3");
}

#[test]
fn test_multiple_roots_are_merged() {
    let defs = loader::load_dirs(&[fixture("commands"), fixture("extra")]).unwrap();
    let registry = Registry::from_definitions(&defs).unwrap();

    assert_eq!(
        registry.commands().keys().collect::<Vec<_>>(),
        vec!["test_cmd", "ping"]
    );
    let latency = registry.find("ping latency").unwrap();
    assert!(latency.permissions.moder_only);
    assert_eq!(latency.delay, 10);
}

#[test]
fn test_missing_field_reports_file() {
    let defs = loader::load_dir(&fixture("broken")).unwrap();
    let err = Registry::from_definitions(&defs).unwrap_err();

    match err {
        CommandTreeError::InvalidDefinition { source_name, reason } => {
            assert!(source_name.ends_with("kick.toml"));
            assert_eq!(reason, "missing field 'description'");
        }
        other => panic!("Expected InvalidDefinition, got {other:?}"),
    }
}

#[test]
fn test_collision_across_roots() {
    let defs = loader::load_dirs(&[fixture("commands"), fixture("collide")]).unwrap();
    let err = Registry::from_definitions(&defs).unwrap_err();
    assert_eq!(err, CommandTreeError::duplicate_command("<root>", "test_cmd"));
}

#[test]
fn test_rebuild_is_structurally_identical() {
    let roots = [fixture("commands"), fixture("extra")];
    let first = Registry::from_definitions(&loader::load_dirs(&roots).unwrap()).unwrap();
    let second = Registry::from_definitions(&loader::load_dirs(&roots).unwrap()).unwrap();
    assert_eq!(first, second);
}
