// src/engine/mod.rs

//! Orchestration for livewatch.
//!
//! The [`runtime::Controller`] is the single consumer of filesystem events:
//! - raw `notify` events are classified and fed to the `WatchSetManager`
//! - `FileChanged` notifications are coalesced by the [`debounce::Debouncer`]
//! - when the debouncer fires, the `ProcessReloader` replaces the process
//! - Ctrl-C / SIGTERM ([`signals`]) run the termination hooks and stop

pub mod debounce;
pub mod runtime;
pub mod signals;

pub use debounce::Debouncer;
pub use runtime::{Controller, ControllerExit};
pub use signals::shutdown_signal;
