// src/watch/events.rs

//! Events flowing out of the watch layer, and the mapping from raw `notify`
//! events to the low-level file/directory events the manager understands.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use notify::event::{EventKind, ModifyKind};

use crate::errors::WatchError;
use crate::fs::FileSystem;
use crate::watch::target::TargetField;

/// Notifications delivered to manager observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// Watched content changed (or the watched set changed shape).
    FileChanged,
    /// A target field was set to a new value.
    TargetChanged(TargetField),
    /// Reconciliation hit a recoverable problem.
    Diagnostic(WatchError),
}

/// A path event as reported by the low-level notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LowLevelEvent {
    /// The content of a registered path changed.
    File(PathBuf),
    /// The entry set of a registered directory changed.
    Directory(PathBuf),
}

/// Map a `notify` event onto low-level events, given the current watch set.
///
/// - access events are ignored
/// - create/remove/rename events are directory events on the parent when the
///   parent is watched; a watched path whose parent is not watched (a single
///   file target) gets a file event plus a directory event so it is re-registered
/// - anything else is a directory event for a watched directory and a file
///   event for any other watched path
/// - content events for paths outside the set are dropped; a directory
///   watch reports changes of every child, filtered ones and those below a
///   non-recursive boundary included
pub fn classify(
    event: &notify::Event,
    watched: &BTreeSet<PathBuf>,
    fs: &dyn FileSystem,
) -> Vec<LowLevelEvent> {
    let structural = match event.kind {
        EventKind::Access(_) => return Vec::new(),
        EventKind::Create(_) | EventKind::Remove(_) => true,
        EventKind::Modify(ModifyKind::Name(_)) => true,
        EventKind::Modify(_) | EventKind::Any | EventKind::Other => false,
    };

    let mut out = Vec::new();
    for path in &event.paths {
        if structural {
            let parent_watched = path.parent().is_some_and(|p| watched.contains(p));
            if parent_watched {
                push_unique(&mut out, LowLevelEvent::Directory(parent_of(path)));
            } else if watched.contains(path) {
                push_unique(&mut out, LowLevelEvent::File(path.clone()));
                push_unique(&mut out, LowLevelEvent::Directory(path.clone()));
            }
        } else if !watched.contains(path) {
            continue;
        } else if is_watched_directory(path, watched, fs) {
            push_unique(&mut out, LowLevelEvent::Directory(path.clone()));
        } else {
            push_unique(&mut out, LowLevelEvent::File(path.clone()));
        }
    }
    out
}

fn parent_of(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

// A watched path is a directory if any other watched path lives below it, or
// if the filesystem says so (empty directories have no watched children).
fn is_watched_directory(path: &Path, watched: &BTreeSet<PathBuf>, fs: &dyn FileSystem) -> bool {
    watched
        .range(path.to_path_buf()..)
        .nth(1)
        .is_some_and(|next| next.starts_with(path))
        || fs.is_dir(path)
}

fn push_unique(out: &mut Vec<LowLevelEvent>, event: LowLevelEvent) {
    if !out.contains(&event) {
        out.push(event);
    }
}
