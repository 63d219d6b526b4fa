// src/engine/debounce.rs

use std::time::Duration;

use tokio::time::Instant;

/// Trailing-edge debouncer.
///
/// Every `notify` pushes the deadline out to `now + window`; `poll` fires
/// once when the deadline has passed and then disarms.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    deadline: Option<Instant>,
    pending: usize,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
            pending: 0,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn notify(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
        self.pending += 1;
    }

    /// Returns the number of coalesced notifications if the deadline passed.
    pub fn poll(&mut self, now: Instant) -> Option<usize> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                Some(std::mem::take(&mut self.pending))
            }
            _ => None,
        }
    }
}
