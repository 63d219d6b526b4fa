// src/exec/mod.rs

//! Process execution layer.
//!
//! Runs the optional application command next to the watcher. The child is
//! stopped from a termination hook so it never outlives a restart.

pub mod app;

pub use app::AppProcess;
