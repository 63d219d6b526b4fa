// src/engine/runtime.rs

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use crate::engine::debounce::Debouncer;
use crate::logging::report_fault;
use crate::reload::ProcessReloader;
use crate::watch::{WatchEvent, WatchSetManager, WatchTarget};

/// Why [`Controller::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerExit {
    /// A shutdown signal arrived; termination hooks have run.
    Shutdown,
    /// The replacer reported success without taking over the process
    /// (only happens with a non-`exec` replacer, i.e. in tests).
    Restarted,
    /// The notifier event stream closed; termination hooks have run.
    EventsClosed,
}

/// The event loop tying the watch set to the reloader.
///
/// Owns the manager and the reloader outright; all watch-set work happens on
/// this one task, one event at a time. `FileChanged` notifications arm a
/// debouncer, and when it fires the reloader replaces the process.
pub struct Controller {
    manager: WatchSetManager,
    reloader: ProcessReloader,
    debouncer: Debouncer,
    fs_rx: mpsc::UnboundedReceiver<notify::Event>,
    changed_rx: mpsc::UnboundedReceiver<()>,
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("manager", &self.manager)
            .field("debouncer", &self.debouncer)
            .finish_non_exhaustive()
    }
}

impl Controller {
    pub fn new(
        mut manager: WatchSetManager,
        reloader: ProcessReloader,
        debounce: Duration,
        fs_rx: mpsc::UnboundedReceiver<notify::Event>,
    ) -> Self {
        let (changed_tx, changed_rx) = mpsc::unbounded_channel();
        manager.subscribe(move |event| {
            if matches!(event, WatchEvent::FileChanged) {
                let _ = changed_tx.send(());
            }
        });

        Self {
            manager,
            reloader,
            debouncer: Debouncer::new(debounce),
            fs_rx,
            changed_rx,
        }
    }

    pub fn manager(&self) -> &WatchSetManager {
        &self.manager
    }

    /// Point the manager at a new target. Returns whether the watch set changed.
    pub fn set_target(&mut self, target: WatchTarget) -> bool {
        let changed = self.manager.set_target(
            target.uri,
            target.enabled,
            target.recursive,
            target.name_filters,
        );
        self.drain_changes();
        changed
    }

    /// Run until shutdown, a successful restart, or the end of the event stream.
    pub async fn run<S>(mut self, shutdown: S) -> ControllerExit
    where
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        info!(
            paths = self.manager.watched_paths().len(),
            generation = self.reloader.generation(),
            "controller started"
        );

        loop {
            let deadline = self.debouncer.deadline();

            tokio::select! {
                _ = &mut shutdown => {
                    info!("shutdown requested");
                    self.reloader.shutdown();
                    return ControllerExit::Shutdown;
                }
                maybe_event = self.fs_rx.recv() => match maybe_event {
                    Some(event) => self.handle_fs_event(&event),
                    None => {
                        warn!("file watcher event stream closed");
                        self.reloader.shutdown();
                        return ControllerExit::EventsClosed;
                    }
                },
                _ = sleep_until_deadline(deadline) => {
                    if let Some(changes) = self.debouncer.poll(Instant::now()) {
                        if self.reload(changes) {
                            return ControllerExit::Restarted;
                        }
                    }
                }
            }
        }
    }

    fn handle_fs_event(&mut self, event: &notify::Event) {
        debug!(?event, "received notify event");
        self.manager.handle_notify(event);
        self.drain_changes();
    }

    fn drain_changes(&mut self) {
        while self.changed_rx.try_recv().is_ok() {
            self.debouncer.notify(Instant::now());
        }
    }

    /// Returns true if the replacer reported success.
    fn reload(&mut self, changes: usize) -> bool {
        info!(
            changes,
            generation = self.reloader.generation(),
            "change detected; restarting"
        );
        match self.reloader.restart() {
            Ok(()) => true,
            Err(err) => {
                report_fault(&anyhow::Error::new(err).context("live reload failed"));
                false
            }
        }
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
