pub mod builders;
pub mod fake_replacer;

use std::sync::{Arc, Mutex, Once};

use livewatch::watch::{WatchEvent, WatchSetManager};
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // print only for failing tests unless --nocapture
            .with_target(true)
            .init();
    });
}

/// Collects every event a manager emits.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<WatchEvent>>>,
}

impl EventLog {
    /// Subscribe a new log to `manager`.
    pub fn attach(manager: &mut WatchSetManager) -> Self {
        let log = Self::default();
        let sink = Arc::clone(&log.events);
        manager.subscribe(move |event| sink.lock().unwrap().push(event.clone()));
        log
    }

    pub fn events(&self) -> Vec<WatchEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    pub fn file_changed_count(&self) -> usize {
        self.count(|e| matches!(e, WatchEvent::FileChanged))
    }

    pub fn diagnostic_count(&self) -> usize {
        self.count(|e| matches!(e, WatchEvent::Diagnostic(_)))
    }

    fn count(&self, pred: impl Fn(&WatchEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| pred(e)).count()
    }
}

/// Run a future with a 5-second timeout.
#[allow(dead_code)]
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(std::time::Duration::from_secs(5), f)
        .await
        .expect("Test timed out after 5 seconds")
}
