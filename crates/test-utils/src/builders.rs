#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use livewatch::config::{ConfigFile, RawConfigFile};
use tempfile::TempDir;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn watch_path(mut self, path: &str) -> Self {
        self.config.watch.path = path.to_string();
        self
    }

    pub fn recursive(mut self, val: bool) -> Self {
        self.config.watch.recursive = val;
        self
    }

    pub fn name_filter(mut self, pattern: &str) -> Self {
        self.config.watch.name_filters.push(pattern.to_string());
        self
    }

    pub fn debounce_ms(mut self, ms: u64) -> Self {
        self.config.watch.debounce_ms = ms;
        self
    }

    pub fn app_command(mut self, command: &[&str]) -> Self {
        self.config.app.command = command.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A real project tree in a temporary directory.
///
/// ```ignore
/// let tree = ProjectTree::new().file("a.txt").file("sub/b.txt").dir("empty");
/// ```
pub struct ProjectTree {
    dir: TempDir,
}

impl ProjectTree {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("creating temp dir"),
        }
    }

    /// Canonical root, so paths compare equal to what the watcher derives.
    pub fn root(&self) -> PathBuf {
        self.dir.path().canonicalize().expect("canonicalizing temp dir")
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    pub fn file(self, rel: &str) -> Self {
        self.write(rel, "");
        self
    }

    pub fn dir(self, rel: &str) -> Self {
        fs::create_dir_all(self.path(rel)).expect("creating dir");
        self
    }

    pub fn write(&self, rel: &str, contents: &str) {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("creating parent dir");
        }
        fs::write(&path, contents).expect("writing file");
    }

    pub fn remove(&self, rel: &str) {
        let path = self.path(rel);
        if path.is_dir() {
            fs::remove_dir_all(path).expect("removing dir");
        } else {
            fs::remove_file(path).expect("removing file");
        }
    }

    #[cfg(unix)]
    pub fn symlink(self, rel: &str, target: &Path) -> Self {
        std::os::unix::fs::symlink(target, self.path(rel)).expect("creating symlink");
        self
    }
}

impl Default for ProjectTree {
    fn default() -> Self {
        Self::new()
    }
}
