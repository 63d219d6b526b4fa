// src/watch/manager.rs

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, trace, warn};

use crate::fs::{FileSystem, RealFileSystem};
use crate::watch::events::{classify, LowLevelEvent, WatchEvent};
use crate::watch::filters::NameFilters;
use crate::watch::notifier::PathNotifier;
use crate::watch::reconcile::derive_watch_set;
use crate::watch::target::{TargetField, WatchTarget};

type Observer = Box<dyn FnMut(&WatchEvent) + Send>;

/// Owns the watch target and the set of paths registered with the notifier.
///
/// Every mutation of the target reconciles synchronously: all registered
/// paths are removed, the set is derived again from scratch and registered,
/// and the new set is compared with the old one by value.
///
/// Observers are plain closures called in registration order. Nothing in here
/// awaits, so a caller on an event loop never sees a half-built set.
pub struct WatchSetManager {
    target: WatchTarget,
    filters: NameFilters,
    watched: BTreeSet<PathBuf>,
    notifier: Box<dyn PathNotifier>,
    fs: Arc<dyn FileSystem>,
    observers: Vec<Observer>,
}

impl fmt::Debug for WatchSetManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchSetManager")
            .field("target", &self.target)
            .field("watched", &self.watched.len())
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl WatchSetManager {
    pub fn new(notifier: Box<dyn PathNotifier>) -> Self {
        Self::with_file_system(notifier, Arc::new(RealFileSystem))
    }

    pub fn with_file_system(notifier: Box<dyn PathNotifier>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            target: WatchTarget::default(),
            filters: NameFilters::default(),
            watched: BTreeSet::new(),
            notifier,
            fs,
            observers: Vec::new(),
        }
    }

    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&WatchEvent) + Send + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    pub fn target(&self) -> &WatchTarget {
        &self.target
    }

    pub fn watched_paths(&self) -> &BTreeSet<PathBuf> {
        &self.watched
    }

    pub fn is_watching(&self, path: &Path) -> bool {
        self.watched.contains(path)
    }

    /// Replace the whole target at once.
    ///
    /// Returns whether the watched set changed. Identical parameters are a
    /// no-op: no reconciliation and no notifications.
    pub fn set_target(
        &mut self,
        uri: impl Into<String>,
        enabled: bool,
        recursive: bool,
        name_filters: Vec<String>,
    ) -> bool {
        let next = WatchTarget {
            uri: uri.into(),
            enabled,
            recursive,
            name_filters,
        };
        self.apply(next)
    }

    pub fn set_uri(&mut self, uri: impl Into<String>) -> bool {
        let next = WatchTarget {
            uri: uri.into(),
            ..self.target.clone()
        };
        self.apply(next)
    }

    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        let next = WatchTarget {
            enabled,
            ..self.target.clone()
        };
        self.apply(next)
    }

    pub fn set_recursive(&mut self, recursive: bool) -> bool {
        let next = WatchTarget {
            recursive,
            ..self.target.clone()
        };
        self.apply(next)
    }

    pub fn set_name_filters(&mut self, name_filters: Vec<String>) -> bool {
        let next = WatchTarget {
            name_filters,
            ..self.target.clone()
        };
        self.apply(next)
    }

    fn apply(&mut self, next: WatchTarget) -> bool {
        let changed_fields = self.target.changed_fields(&next);
        if changed_fields.is_empty() {
            return false;
        }

        if changed_fields.contains(&TargetField::NameFilters) {
            self.filters = NameFilters::compile(&next.name_filters);
        }
        self.target = next;

        for field in changed_fields {
            debug!(?field, "watch target changed");
            self.emit(&WatchEvent::TargetChanged(field));
        }

        self.reconcile()
    }

    /// Rebuild the watch set from the current target.
    ///
    /// Returns whether the new set differs from the previous one.
    pub fn reconcile(&mut self) -> bool {
        for path in &self.watched {
            if let Err(err) = self.notifier.remove_path(path) {
                debug!(path = ?path, error = %err, "failed to unregister path");
            }
        }

        let derivation = derive_watch_set(self.fs.as_ref(), &self.target, &self.filters);

        if let Some(err) = derivation.diagnostic {
            warn!("{err}");
            self.emit(&WatchEvent::Diagnostic(err));
        }

        for path in &derivation.paths {
            if let Err(err) = self.notifier.add_path(path) {
                warn!(path = ?path, error = %err, "failed to register path with notifier");
            }
        }

        let changed = derivation.paths != self.watched;
        if changed {
            info!(
                before = self.watched.len(),
                after = derivation.paths.len(),
                "watch set changed"
            );
        }
        self.watched = derivation.paths;
        changed
    }

    /// A registered path's content changed.
    pub fn on_file_event(&mut self, path: &Path) {
        if !self.target.enabled {
            trace!(path = ?path, "ignoring file event while disabled");
            return;
        }
        debug!(path = ?path, "watched file changed");
        self.emit(&WatchEvent::FileChanged);
    }

    /// A registered directory's entry set changed.
    ///
    /// A change of the watched set counts as a content change as well, so a
    /// newly created file is reported as if it had been written to.
    pub fn on_directory_event(&mut self, path: &Path) {
        debug!(path = ?path, "watched directory changed");
        if self.reconcile() {
            self.on_file_event(path);
        }
    }

    pub fn handle(&mut self, event: &LowLevelEvent) {
        match event {
            LowLevelEvent::File(path) => self.on_file_event(path),
            LowLevelEvent::Directory(path) => self.on_directory_event(path),
        }
    }

    /// Classify a raw `notify` event against the current set and handle it.
    pub fn handle_notify(&mut self, event: &notify::Event) {
        let low_level = classify(event, &self.watched, self.fs.as_ref());
        if low_level.is_empty() {
            trace!(?event, "event outside the watch set");
        }
        for low in &low_level {
            self.handle(low);
        }
    }

    fn emit(&mut self, event: &WatchEvent) {
        for observer in self.observers.iter_mut() {
            observer(event);
        }
    }
}
