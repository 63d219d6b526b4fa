// src/watch/notifier.rs

use std::fmt;
use std::path::Path;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::warn;

use crate::errors::Result;

/// The low-level filesystem notifier the manager registers paths with.
///
/// Implementations report best-effort, coalesced events for registered paths
/// through their own channel; the manager only adds and removes paths.
pub trait PathNotifier: Send {
    fn add_path(&mut self, path: &Path) -> Result<()>;
    fn remove_path(&mut self, path: &Path) -> Result<()>;
}

/// Production notifier backed by `notify::RecommendedWatcher`.
///
/// Every path is watched non-recursively; recursion is expressed by the
/// manager registering each descendant itself.
pub struct NotifyBackend {
    inner: RecommendedWatcher,
}

impl fmt::Debug for NotifyBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifyBackend").finish()
    }
}

impl NotifyBackend {
    /// Create a watcher that forwards raw events into `event_tx`.
    ///
    /// The `notify` callback runs on the notifier's own thread; it only
    /// forwards, so the controller loop stays the single consumer.
    pub fn new(event_tx: mpsc::UnboundedSender<Event>) -> Result<Self> {
        let inner = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event_tx.send(event).is_err() {
                        // Controller is gone; nothing left to notify.
                        warn!("dropping notify event after controller shutdown");
                    }
                }
                Err(err) => warn!(error = %err, "file watch error"),
            },
            Config::default(),
        )?;

        Ok(Self { inner })
    }
}

impl PathNotifier for NotifyBackend {
    fn add_path(&mut self, path: &Path) -> Result<()> {
        self.inner.watch(path, RecursiveMode::NonRecursive)?;
        Ok(())
    }

    fn remove_path(&mut self, path: &Path) -> Result<()> {
        self.inner.unwatch(path)?;
        Ok(())
    }
}
