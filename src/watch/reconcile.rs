// src/watch/reconcile.rs

//! Derivation of the watched path set from a [`WatchTarget`].
//!
//! This is the pure half of reconciliation: it only reads the filesystem and
//! computes the set. Registering paths with the notifier and notifying
//! observers is left to the manager.

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use crate::errors::WatchError;
use crate::fs::FileSystem;
use crate::watch::filters::{is_dot_entry, NameFilters};
use crate::watch::target::{resolve_local_path, WatchTarget};

/// The outcome of deriving a watch set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Derivation {
    pub paths: BTreeSet<PathBuf>,
    pub diagnostic: Option<WatchError>,
}

impl Derivation {
    fn empty() -> Self {
        Self::default()
    }

    fn diagnostic(err: WatchError) -> Self {
        Self {
            paths: BTreeSet::new(),
            diagnostic: Some(err),
        }
    }
}

/// Compute the set of absolute paths that `target` should watch.
pub fn derive_watch_set(
    fs: &dyn FileSystem,
    target: &WatchTarget,
    filters: &NameFilters,
) -> Derivation {
    if !target.enabled {
        return Derivation::empty();
    }

    let path = match resolve_local_path(&target.uri) {
        Ok(Some(path)) => path,
        Ok(None) => return Derivation::empty(),
        Err(err) => return Derivation::diagnostic(err),
    };

    let path = match std::path::absolute(&path) {
        Ok(abs) => abs,
        Err(_) => return Derivation::diagnostic(WatchError::TargetNotFound(path)),
    };

    if !fs.exists(&path) {
        return Derivation::diagnostic(WatchError::TargetNotFound(path));
    }

    let mut paths = BTreeSet::new();
    if fs.is_dir(&path) {
        walk_directory(fs, &path, target.recursive, filters, &mut paths);
    } else {
        paths.insert(path);
    }

    Derivation {
        paths,
        diagnostic: None,
    }
}

/// Add `root` and its non-filtered entries to `out`.
///
/// Symlinks are followed. A directory whose canonical path was already
/// visited is listed but not descended into, which breaks symlink loops.
/// Filtering an entry does not prune the walk below it.
fn walk_directory(
    fs: &dyn FileSystem,
    root: &Path,
    recursive: bool,
    filters: &NameFilters,
    out: &mut BTreeSet<PathBuf>,
) {
    out.insert(root.to_path_buf());

    let mut visited = HashSet::new();
    if let Ok(canon) = fs.canonicalize(root) {
        visited.insert(canon);
    }

    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let entries = match fs.read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(dir = ?dir, error = %err, "cannot list directory; skipping");
                continue;
            }
        };

        for path in entries {
            let name = match path.file_name() {
                Some(name) => name.to_string_lossy().into_owned(),
                None => continue,
            };
            if is_dot_entry(&name) {
                continue;
            }

            if recursive && fs.is_dir(&path) {
                match fs.canonicalize(&path) {
                    Ok(canon) => {
                        if visited.insert(canon) {
                            stack.push(path.clone());
                        } else {
                            debug!(path = ?path, "directory already visited; not descending");
                        }
                    }
                    Err(err) => debug!(path = ?path, error = %err, "cannot resolve directory"),
                }
            }

            if filters.is_filtered(&name) {
                trace!(path = ?path, "filtered out");
                continue;
            }
            out.insert(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    fn project() -> MockFileSystem {
        let fs = MockFileSystem::new();
        fs.add_file("/p/a.txt");
        fs.add_file("/p/main.pyc");
        fs.add_file("/p/sub/b.txt");
        fs
    }

    fn set(paths: &[&str]) -> BTreeSet<PathBuf> {
        paths.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn non_recursive_lists_only_immediate_entries() {
        let fs = project();
        let target = WatchTarget::new("/p");

        let d = derive_watch_set(&fs, &target, &NameFilters::default());
        assert_eq!(d.paths, set(&["/p", "/p/a.txt", "/p/main.pyc", "/p/sub"]));
        assert_eq!(d.diagnostic, None);
    }

    #[test]
    fn recursive_descends_into_subdirectories() {
        let fs = project();
        let target = WatchTarget::new("/p").recursive(true);

        let d = derive_watch_set(&fs, &target, &NameFilters::default());
        assert_eq!(
            d.paths,
            set(&["/p", "/p/a.txt", "/p/main.pyc", "/p/sub", "/p/sub/b.txt"])
        );
    }

    #[test]
    fn filtered_names_are_skipped() {
        let fs = project();
        let target = WatchTarget::new("/p").name_filters(["*.pyc"]);
        let filters = NameFilters::compile(&target.name_filters);

        let d = derive_watch_set(&fs, &target, &filters);
        assert!(!d.paths.contains(Path::new("/p/main.pyc")));
        assert!(d.paths.contains(Path::new("/p/a.txt")));
    }

    #[test]
    fn filtered_directory_is_still_walked() {
        let fs = project();
        let target = WatchTarget::new("/p").recursive(true).name_filters(["sub"]);
        let filters = NameFilters::compile(&target.name_filters);

        let d = derive_watch_set(&fs, &target, &filters);
        assert!(!d.paths.contains(Path::new("/p/sub")));
        assert!(d.paths.contains(Path::new("/p/sub/b.txt")));
    }

    #[test]
    fn single_file_target() {
        let fs = project();
        let target = WatchTarget::new("/p/a.txt");

        let d = derive_watch_set(&fs, &target, &NameFilters::default());
        assert_eq!(d.paths, set(&["/p/a.txt"]));
    }

    #[test]
    fn missing_target_yields_diagnostic() {
        let fs = project();
        let target = WatchTarget::new("/nope");

        let d = derive_watch_set(&fs, &target, &NameFilters::default());
        assert!(d.paths.is_empty());
        assert_eq!(
            d.diagnostic,
            Some(WatchError::TargetNotFound(PathBuf::from("/nope")))
        );
    }

    #[test]
    fn disabled_and_empty_targets_are_silent() {
        let fs = project();

        let disabled = WatchTarget::new("/p").enabled(false);
        assert_eq!(
            derive_watch_set(&fs, &disabled, &NameFilters::default()),
            Derivation::default()
        );

        let empty = WatchTarget::new("");
        assert_eq!(
            derive_watch_set(&fs, &empty, &NameFilters::default()),
            Derivation::default()
        );
    }
}
