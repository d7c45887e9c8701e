//! End-to-end resolution tests through `CommandRouter`.

use std::sync::Arc;

use cmdtree::commands::{ArgValue, Args, Caller, CommandRouter, Handler, HandlerTable};
use cmdtree::{CommandTreeError, Config, ParserOptions};
use serde_json::{json, Value};

use super::fixture;

fn fixture_router() -> CommandRouter {
    CommandRouter::from_dirs(
        ParserOptions::default(),
        vec![fixture("commands")],
        HandlerTable::new(),
    )
    .unwrap()
}

fn chain(router: &CommandRouter, input: &str) -> Vec<String> {
    router
        .command(input)
        .unwrap()
        .unwrap()
        .cmds
        .iter()
        .map(|c| c.name.clone())
        .collect()
}

#[test]
fn test_full_chain_leaves_extra_token() {
    let router = fixture_router();
    let inv = router.command("!test_cmd test_2 test_3 extra").unwrap().unwrap();

    assert_eq!(chain(&router, "!test_cmd test_2 test_3 extra"), ["test_cmd", "test_2", "test_3"]);
    assert_eq!(inv.args.positional, vec!["extra".to_string()]);
    assert_eq!(inv.cmd.name, "test_3");
}

#[test]
fn test_root_alias_then_child() {
    let router = fixture_router();
    let inv = router.command("!alias_test test_2").unwrap().unwrap();

    assert_eq!(chain(&router, "!alias_test test_2"), ["test_cmd", "test_2"]);
    assert!(inv.args.positional.is_empty());
}

#[test]
fn test_unknown_command_fails() {
    let err = fixture_router().command("!unknown_cmd").unwrap_err();
    assert!(matches!(err, CommandTreeError::CommandNotFound(token) if token == "unknown_cmd"));
}

#[test]
fn test_missing_prefix_is_distinct_from_not_found() {
    let router = fixture_router();
    assert!(router.command("no_prefix test_cmd").unwrap().is_none());
    assert!(router.command("!no_prefix").is_err());
}

#[test]
fn test_from_config_file() {
    let config = Config::load_from_file(&fixture("cmdtree.toml")).unwrap();
    let router = CommandRouter::from_config(&config, HandlerTable::new()).unwrap();

    assert_eq!(router.sources().len(), 2);
    let inv = router.command("!p lat \"eu west\" -v").unwrap().unwrap();
    assert_eq!(inv.path(), "ping latency");
    assert_eq!(inv.args.positional, vec!["eu west".to_string()]);
    assert_eq!(inv.args.get("v"), Some(&ArgValue::Flag));
}

#[test]
fn test_handlers_bound_by_path() {
    let handler: Handler = Arc::new(
        |caller: &Caller, args: &Args, _extra: Option<&Value>| -> anyhow::Result<Value> {
            let id = caller.downcast_ref::<u64>().copied().unwrap_or_default();
            Ok(json!({ "caller": id, "region": args.positional.first() }))
        },
    );
    let mut handlers = HandlerTable::new();
    handlers.insert("ping latency".to_string(), handler);

    let router = CommandRouter::from_dirs(
        ParserOptions::default(),
        vec![fixture("extra")],
        handlers,
    )
    .unwrap();

    let inv = router.command("!ping latency eu").unwrap().unwrap();
    let caller: u64 = 42;
    let output = inv.exec(Some(&caller as &Caller), None).unwrap();
    assert_eq!(output, Some(json!({ "caller": 42, "region": "eu" })));
    assert_eq!(inv.exec(None, None).unwrap(), None);
}

#[test]
fn test_handler_for_unknown_path_fails_build() {
    let handler: Handler = Arc::new(
        |_: &Caller, _: &Args, _: Option<&Value>| -> anyhow::Result<Value> { Ok(Value::Null) },
    );
    let mut handlers = HandlerTable::new();
    handlers.insert("ping missing".to_string(), handler);

    let result = CommandRouter::from_dirs(ParserOptions::default(), vec![fixture("extra")], handlers);
    assert!(matches!(result, Err(CommandTreeError::InvalidDefinition { .. })));
}

#[test]
fn test_reinit_swaps_and_is_idempotent() {
    let mut router = fixture_router();
    let before = router.registry();

    router.reinit(vec![fixture("commands")]).unwrap();
    assert_eq!(*before, *router.registry());
    assert!(!Arc::ptr_eq(&before, &router.registry()));

    router.reinit(vec![fixture("extra")]).unwrap();
    assert!(router.command("!test_cmd").is_err());
    assert_eq!(chain(&router, "!ping latency"), ["ping", "latency"]);
}

#[test]
fn test_failed_reinit_keeps_previous_registry() {
    let mut router = fixture_router();
    let err = router.reinit(vec![fixture("broken")]).unwrap_err();

    assert!(err.is_construction());
    assert_eq!(router.sources(), &[fixture("commands")]);
    assert_eq!(chain(&router, "!test_cmd test_2"), ["test_cmd", "test_2"]);
}
