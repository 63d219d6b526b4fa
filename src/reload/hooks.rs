// src/reload/hooks.rs

use std::fmt;

use tracing::debug;

use crate::reload::context::ProcessContext;

/// Why the termination hooks are running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// The process image is about to be replaced.
    Restart,
    /// The process is shutting down (Ctrl-C, SIGTERM).
    Shutdown,
}

/// What a termination hook gets to see.
#[derive(Debug, Clone, Copy)]
pub struct TerminationContext<'a> {
    pub reason: TerminationReason,
    pub process: &'a ProcessContext,
    /// Generation the next image will run as (equal to the current one on shutdown).
    pub next_generation: u64,
}

pub type TerminationHook = Box<dyn FnOnce(&TerminationContext<'_>) + Send>;

/// Cleanup callbacks that must run exactly once before the process goes away.
///
/// Hooks are run synchronously, in registration order, and drained, so a
/// second `run` does nothing.
#[derive(Default)]
pub struct TerminationHooks {
    hooks: Vec<TerminationHook>,
}

impl fmt::Debug for TerminationHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerminationHooks")
            .field("pending", &self.hooks.len())
            .finish()
    }
}

impl TerminationHooks {
    pub fn register<F>(&mut self, hook: F)
    where
        F: FnOnce(&TerminationContext<'_>) + Send + 'static,
    {
        self.hooks.push(Box::new(hook));
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Run and drop every registered hook. Returns how many ran.
    pub fn run(&mut self, ctx: &TerminationContext<'_>) -> usize {
        let hooks = std::mem::take(&mut self.hooks);
        let count = hooks.len();
        for hook in hooks {
            hook(ctx);
        }
        debug!(count, reason = ?ctx.reason, "termination hooks ran");
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    #[test]
    fn hooks_run_once_in_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut hooks = TerminationHooks::default();
        for i in 0..3 {
            let order = Arc::clone(&order);
            hooks.register(move |_ctx| order.lock().unwrap().push(i));
        }

        let process =
            ProcessContext::from_parts("/bin/app", None, Vec::<String>::new(), BTreeMap::new());
        let ctx = TerminationContext {
            reason: TerminationReason::Restart,
            process: &process,
            next_generation: 1,
        };

        assert_eq!(hooks.run(&ctx), 3);
        assert_eq!(hooks.run(&ctx), 0);
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }
}
