// src/errors.rs

//! Crate-wide error types.
//!
//! Each layer has its own small enum (`WatchError` for reconciliation,
//! `ReloadError` for process replacement) and `LivewatchError` unifies them
//! for the binary and the config loader.

use std::path::PathBuf;

use thiserror::Error;

/// Recoverable problems found while reconciling the watch set.
///
/// These never escape the manager as `Err`; they are logged and delivered to
/// observers as `WatchEvent::Diagnostic`, and the watch set degrades to empty.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WatchError {
    #[error("can only watch local files (got {0:?})")]
    UnsupportedTarget(String),

    #[error("file to watch does not exist: {0:?}")]
    TargetNotFound(PathBuf),
}

/// Failure to replace the current process image.
///
/// When this is returned the old image is still running.
#[derive(Error, Debug)]
pub enum ReloadError {
    #[error("cannot replace process image with {program:?}: {reason}")]
    ProcessReplacement { program: PathBuf, reason: String },

    #[error("cannot determine the current executable: {0}")]
    CurrentExe(#[source] std::io::Error),
}

#[derive(Error, Debug)]
pub enum LivewatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Watch error: {0}")]
    Watch(#[from] WatchError),

    #[error("Reload error: {0}")]
    Reload(#[from] ReloadError),

    #[error("File watcher error: {0}")]
    Notify(#[from] notify::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, LivewatchError>;
