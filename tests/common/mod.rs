#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use livewatch::reload::{ProcessContext, ProcessReloader, ReloadSettings};
use livewatch::watch::mock::RecordingNotifier;
use livewatch::watch::WatchSetManager;
use livewatch_test_utils::fake_replacer::RecordingReplacer;
use livewatch_test_utils::{init_tracing, EventLog};

/// Manager on the real filesystem with a recording notifier and event log.
pub fn real_manager() -> (WatchSetManager, RecordingNotifier, EventLog) {
    init_tracing();
    let notifier = RecordingNotifier::new();
    let mut manager = WatchSetManager::new(Box::new(notifier.clone()));
    let log = EventLog::attach(&mut manager);
    (manager, notifier, log)
}

pub fn path_set(paths: &[&Path]) -> BTreeSet<PathBuf> {
    paths.iter().map(|p| p.to_path_buf()).collect()
}

/// A context whose interpreter is the test binary itself, so it passes the
/// "is executable" check.
pub fn test_context(
    entry_point: Option<&str>,
    args: &[&str],
    env: &[(&str, &str)],
) -> ProcessContext {
    let exe = std::env::current_exe().expect("current exe");
    let env: BTreeMap<_, _> = env
        .iter()
        .map(|(k, v)| ((*k).into(), (*v).into()))
        .collect();
    ProcessContext::from_parts(exe, entry_point.map(PathBuf::from), args.iter().copied(), env)
}

pub fn recording_reloader(
    context: ProcessContext,
    settings: ReloadSettings,
) -> (ProcessReloader, RecordingReplacer) {
    let replacer = RecordingReplacer::new();
    let reloader = ProcessReloader::with_replacer(context, settings, Box::new(replacer.clone()));
    (reloader, replacer)
}
