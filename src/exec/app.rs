// src/exec/app.rs

use std::process::{Child, Command, Stdio};

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info, warn};

use crate::reload::TerminationReason;

/// A supervised application process.
///
/// The child inherits stdio and is torn down from a termination hook, which
/// runs synchronously right before the watcher's image is replaced. That is
/// why this uses `std::process` rather than an async child: the hook cannot
/// await, and the child must be reaped before `exec`.
#[derive(Debug)]
pub struct AppProcess {
    child: Child,
    program: String,
}

impl AppProcess {
    /// Spawn `command[0]` with the remaining elements as arguments.
    pub fn spawn(command: &[String]) -> Result<Self> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| anyhow!("empty application command"))?;

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("spawning application {program:?}"))?;

        info!(program = %program, pid = child.id(), "application started");

        Ok(Self {
            child,
            program: program.clone(),
        })
    }

    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// Stop the child (if still running) and reap it.
    pub fn terminate(mut self, reason: TerminationReason) {
        match self.child.try_wait() {
            Ok(Some(status)) => {
                debug!(program = %self.program, %status, "application already exited");
                return;
            }
            Ok(None) => {}
            Err(e) => warn!(program = %self.program, error = %e, "cannot query application status"),
        }

        info!(program = %self.program, pid = self.child.id(), ?reason, "stopping application");
        if let Err(e) = self.child.kill() {
            warn!(program = %self.program, error = %e, "failed to kill application");
        }
        match self.child.wait() {
            Ok(status) => debug!(program = %self.program, %status, "application stopped"),
            Err(e) => warn!(program = %self.program, error = %e, "failed to reap application"),
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn empty_command_is_rejected() {
        assert!(AppProcess::spawn(&[]).is_err());
    }

    #[test]
    fn terminate_stops_long_running_child() {
        let app = AppProcess::spawn(&["sleep".to_string(), "30".to_string()]).unwrap();
        let pid = app.id();
        app.terminate(TerminationReason::Restart);

        // The pid has been reaped, so signalling it must fail.
        let status = Command::new("kill").arg("-0").arg(pid.to_string()).status().unwrap();
        assert!(!status.success());
    }

    #[test]
    fn terminate_after_exit_is_quiet() {
        let app = AppProcess::spawn(&["true".to_string()]).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(100));
        app.terminate(TerminationReason::Shutdown);
    }
}
