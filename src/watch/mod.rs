// src/watch/mod.rs

//! File watching and watch-set reconciliation.
//!
//! This module is responsible for:
//! - Describing what to watch (`WatchTarget`) and compiling its name filters.
//! - Deriving the exact set of paths to register, file or directory tree.
//! - Registering that set with a low-level notifier (`notify` in production).
//! - Turning raw notifier events into `FileChanged` notifications.
//!
//! It does **not** decide what happens on a change; the engine subscribes to
//! the manager and owns that policy.

pub mod events;
pub mod filters;
pub mod manager;
pub mod mock;
pub mod notifier;
pub mod reconcile;
pub mod target;

pub use events::{classify, LowLevelEvent, WatchEvent};
pub use filters::NameFilters;
pub use manager::WatchSetManager;
pub use notifier::{NotifyBackend, PathNotifier};
pub use reconcile::{derive_watch_set, Derivation};
pub use target::{resolve_local_path, TargetField, WatchTarget};
