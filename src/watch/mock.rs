// src/watch/mock.rs

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::anyhow;

use super::notifier::PathNotifier;
use crate::errors::Result;

/// A call made against a [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierCall {
    Add(PathBuf),
    Remove(PathBuf),
}

#[derive(Debug, Default)]
struct RecordingState {
    registered: BTreeSet<PathBuf>,
    calls: Vec<NotifierCall>,
    reject: HashSet<PathBuf>,
}

/// In-memory notifier that records registrations.
///
/// Clones share state, so a test can hand one clone to the manager and keep
/// another to inspect what was registered.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    state: Arc<Mutex<RecordingState>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths currently registered.
    pub fn registered(&self) -> BTreeSet<PathBuf> {
        self.state.lock().unwrap().registered.clone()
    }

    /// Every add/remove call in order.
    pub fn calls(&self) -> Vec<NotifierCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    /// Make `add_path` fail for this path, as a platform watcher would for a
    /// path it cannot watch.
    pub fn reject(&self, path: impl Into<PathBuf>) {
        self.state.lock().unwrap().reject.insert(path.into());
    }
}

impl PathNotifier for RecordingNotifier {
    fn add_path(&mut self, path: &Path) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(NotifierCall::Add(path.to_path_buf()));
        if state.reject.contains(path) {
            return Err(anyhow!("cannot watch {:?}", path).into());
        }
        state.registered.insert(path.to_path_buf());
        Ok(())
    }

    fn remove_path(&mut self, path: &Path) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(NotifierCall::Remove(path.to_path_buf()));
        state.registered.remove(path);
        Ok(())
    }
}
