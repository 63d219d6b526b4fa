use std::collections::BTreeMap;
use std::ffi::OsString;

use clap::Parser;
use livewatch::cli::CliArgs;
use livewatch::{build_reloader, effective_config};
use livewatch::reload::ProcessContext;
use livewatch_test_utils::builders::ProjectTree;
use livewatch_test_utils::fake_replacer::RecordingReplacer;

fn argv(tail: &[&str]) -> Vec<OsString> {
    std::iter::once("livewatch")
        .chain(tail.iter().copied())
        .map(OsString::from)
        .collect()
}

/// Restart livewatch as launched with `tail` and return the argv the new
/// image would receive.
fn restarted_argv(tail: &[&str]) -> Vec<OsString> {
    let args = CliArgs::try_parse_from(argv(tail)).unwrap();
    let cfg = effective_config(&args).unwrap();
    let exe = std::env::current_exe().unwrap();
    let context = ProcessContext::from_parts(exe, None, tail.iter().copied(), BTreeMap::new());

    let replacer = RecordingReplacer::new();
    let mut reloader = build_reloader(&cfg, context, Box::new(replacer.clone()));
    reloader.restart().unwrap();

    let commands = replacer.commands();
    assert_eq!(commands.len(), 1);
    std::iter::once(OsString::from("livewatch"))
        .chain(commands[0].args.iter().cloned())
        .collect()
}

#[test]
fn restarted_image_parses_the_same_command_line() {
    let tree = ProjectTree::new().file("src/app.py");
    let config = tree.path("absent.toml");
    let src = tree.path("src");
    let tail = [
        "--config",
        config.to_str().unwrap(),
        src.to_str().unwrap(),
        "-r",
        "-f",
        "*.pyc",
        "--debounce-ms",
        "50",
        "--",
        "python",
        "app.py",
        "--port",
        "8000",
    ];

    let restarted = restarted_argv(&tail);
    assert_eq!(restarted, argv(&tail));

    let original = CliArgs::try_parse_from(argv(&tail)).unwrap();
    let reparsed = CliArgs::try_parse_from(restarted).unwrap();
    assert_eq!(reparsed.path, original.path);
    assert_eq!(reparsed.config, original.config);
    assert_eq!(reparsed.recursive, original.recursive);
    assert_eq!(reparsed.filters, original.filters);
    assert_eq!(reparsed.debounce_ms, original.debounce_ms);
    assert_eq!(reparsed.command, original.command);
}

#[test]
fn entry_point_flag_is_rejected() {
    let err = CliArgs::try_parse_from(argv(&["--entry-point", "app.py", "src"])).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
}
