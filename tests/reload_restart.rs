mod common;

use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use common::{recording_reloader, test_context};
use livewatch::errors::ReloadError;
use livewatch::reload::{
    ProcessContext, ProcessReloader, ReloadSettings, TerminationReason, GENERATION_VAR,
};
use livewatch_test_utils::fake_replacer::RecordingReplacer;

fn settings_with_root(root: &str) -> ReloadSettings {
    ReloadSettings {
        search_path_var: "LIVEWATCH_PATH".to_string(),
        import_root: Some(PathBuf::from(root)),
    }
}

fn os(s: &str) -> OsString {
    OsString::from(s)
}

#[test]
fn restart_keeps_interpreter_entry_point_and_args() {
    let entry = std::env::current_exe().unwrap();
    let entry = entry.to_string_lossy().into_owned();
    let context = test_context(Some(&entry), &["--x", "5"], &[]);
    let interpreter = context.interpreter.clone();
    let (mut reloader, replacer) = recording_reloader(context, settings_with_root("/opt/app"));

    reloader.restart().unwrap();

    let commands = replacer.commands();
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0].program, interpreter);
    assert_eq!(commands[0].args, vec![os(&entry), os("--x"), os("5")]);
}

#[test]
fn native_binary_restart_passes_args_through() {
    let context = test_context(None, &["serve", "--port", "8080", "--", "-v"], &[]);
    let (mut reloader, replacer) = recording_reloader(context, settings_with_root("/opt/app"));

    reloader.restart().unwrap();

    assert_eq!(
        replacer.commands()[0].args,
        vec![os("serve"), os("--port"), os("8080"), os("--"), os("-v")]
    );
}

#[cfg(unix)]
#[test]
fn search_path_is_appended_once() {
    let context = test_context(None, &[], &[("LIVEWATCH_PATH", "/usr/lib/app")]);
    let (reloader, _replacer) = recording_reloader(context, settings_with_root("/opt/app"));

    let command = reloader.replacement_command();
    assert_eq!(
        command.env.get(&os("LIVEWATCH_PATH")),
        Some(&os("/usr/lib/app:/opt/app"))
    );
}

#[test]
fn search_path_already_containing_root_is_untouched() {
    let context = test_context(None, &[], &[("LIVEWATCH_PATH", "/opt/app")]);
    let (reloader, _replacer) = recording_reloader(context, settings_with_root("/opt/app"));

    let command = reloader.replacement_command();
    assert_eq!(command.env.get(&os("LIVEWATCH_PATH")), Some(&os("/opt/app")));
}

#[test]
fn custom_search_path_variable_is_used() {
    let context = test_context(None, &[], &[("PYTHONPATH", "")]);
    let settings = ReloadSettings {
        search_path_var: "PYTHONPATH".to_string(),
        import_root: Some(PathBuf::from("/srv/live")),
    };
    let (reloader, _replacer) = recording_reloader(context, settings);

    let command = reloader.replacement_command();
    assert_eq!(command.env.get(&os("PYTHONPATH")), Some(&os("/srv/live")));
    assert!(!command.env.contains_key(&os("LIVEWATCH_PATH")));
}

#[test]
fn inherited_environment_is_preserved() {
    let context = test_context(None, &[], &[("HOME", "/home/dev"), ("LANG", "C.UTF-8")]);
    let (reloader, _replacer) = recording_reloader(context, settings_with_root("/opt/app"));

    let env = reloader.replacement_command().env;
    assert_eq!(env.get(&os("HOME")), Some(&os("/home/dev")));
    assert_eq!(env.get(&os("LANG")), Some(&os("C.UTF-8")));
}

#[test]
fn generation_counter_increments() {
    let context = test_context(None, &[], &[(GENERATION_VAR, "4")]);
    let (reloader, _replacer) = recording_reloader(context, settings_with_root("/opt/app"));

    assert_eq!(reloader.generation(), 4);
    assert_eq!(
        reloader.replacement_command().env.get(&os(GENERATION_VAR)),
        Some(&os("5"))
    );
}

#[test]
fn import_root_defaults_to_two_levels_above_interpreter() {
    let context = ProcessContext::from_parts(
        "/opt/app/bin/livewatch",
        None,
        Vec::<String>::new(),
        Default::default(),
    );
    let reloader = ProcessReloader::new(context, ReloadSettings::default());

    assert_eq!(reloader.import_root(), Some(PathBuf::from("/opt/app")));
}

#[test]
fn hooks_run_once_before_the_image_is_replaced() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let context = test_context(None, &[], &[]);
    let replacer = RecordingReplacer::new();

    let mut reloader = ProcessReloader::with_replacer(
        context,
        settings_with_root("/opt/app"),
        Box::new(replacer.clone()),
    );
    {
        let order = Arc::clone(&order);
        let replacer = replacer.clone();
        reloader.register_termination_hook(move |ctx| {
            assert_eq!(ctx.reason, TerminationReason::Restart);
            assert_eq!(ctx.next_generation, 1);
            // Nothing has been replaced yet when the hook runs.
            assert!(replacer.commands().is_empty());
            order.lock().unwrap().push("hook");
        });
    }

    reloader.restart().unwrap();
    reloader.restart().unwrap();

    assert_eq!(*order.lock().unwrap(), vec!["hook"]);
    assert_eq!(replacer.commands().len(), 2);
}

#[test]
fn unresolvable_interpreter_fails_before_hooks_run() {
    let ran = Arc::new(Mutex::new(false));
    let context = ProcessContext::from_parts(
        "/no/such/interpreter",
        None,
        ["--x"],
        Default::default(),
    );
    let (mut reloader, replacer) = recording_reloader(context, settings_with_root("/opt/app"));
    {
        let ran = Arc::clone(&ran);
        reloader.register_termination_hook(move |_| *ran.lock().unwrap() = true);
    }

    let err = reloader.restart().unwrap_err();

    assert!(matches!(err, ReloadError::ProcessReplacement { .. }));
    assert!(!*ran.lock().unwrap());
    assert!(replacer.commands().is_empty());
}

#[test]
fn missing_entry_point_fails() {
    let context = test_context(Some("/no/such/main.py"), &[], &[]);
    let (mut reloader, replacer) = recording_reloader(context, settings_with_root("/opt/app"));

    let err = reloader.restart().unwrap_err();
    assert!(err.to_string().contains("entry point"));
    assert!(replacer.commands().is_empty());
}

#[test]
fn replacement_failure_is_returned_to_caller() {
    let context = test_context(None, &[], &[]);
    let replacer = RecordingReplacer::failing("exec format error");
    let mut reloader = ProcessReloader::with_replacer(
        context,
        settings_with_root("/opt/app"),
        Box::new(replacer.clone()),
    );

    let err = reloader.restart().unwrap_err();
    assert!(err.to_string().contains("exec format error"));
    assert_eq!(replacer.commands().len(), 1);
}

#[test]
fn shutdown_runs_hooks_with_shutdown_reason() {
    let seen = Arc::new(Mutex::new(None));
    let context = test_context(None, &[], &[]);
    let (mut reloader, _replacer) = recording_reloader(context, settings_with_root("/opt/app"));
    {
        let seen = Arc::clone(&seen);
        reloader.register_termination_hook(move |ctx| *seen.lock().unwrap() = Some(ctx.reason));
    }

    assert_eq!(reloader.shutdown(), 1);
    assert_eq!(reloader.shutdown(), 0);
    assert_eq!(*seen.lock().unwrap(), Some(TerminationReason::Shutdown));
}
