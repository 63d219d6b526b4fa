// src/reload/mod.rs

//! In-place process restart.
//!
//! - [`context`] captures how the process was launched.
//! - [`search_path`] computes the import root and augments the inherited
//!   search-path variable.
//! - [`hooks`] holds the cleanup callbacks that run right before the image
//!   goes away.
//! - [`replacer`] is the `exec` primitive behind the `ImageReplacer` trait,
//!   so tests can substitute a recording implementation.
//! - [`reloader`] ties these together as `ProcessReloader::restart`.

pub mod context;
pub mod hooks;
pub mod reloader;
pub mod replacer;
pub mod search_path;

pub use context::{ProcessContext, GENERATION_VAR};
pub use hooks::{TerminationContext, TerminationHooks, TerminationReason};
pub use reloader::{ProcessReloader, ReloadSettings, DEFAULT_SEARCH_PATH_VAR};
pub use replacer::{ExecReplacer, ImageReplacer, ReplacementCommand};
