// src/reload/context.rs

use std::collections::BTreeMap;
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::errors::ReloadError;

/// Environment variable carrying the restart count into the new image.
pub const GENERATION_VAR: &str = "LIVEWATCH_GENERATION";

/// How the current process was launched.
///
/// Captured once at startup and only read afterwards; a restart reuses it
/// verbatim (plus the search-path and generation adjustments).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessContext {
    /// Executable that gets re-executed.
    pub interpreter: PathBuf,
    /// Script or program the interpreter runs, if any. Native binaries have none.
    pub entry_point: Option<PathBuf>,
    /// Trailing arguments as launched (`argv[1..]`).
    pub args: Vec<OsString>,
    /// Environment inherited at startup.
    pub env: BTreeMap<OsString, OsString>,
}

impl ProcessContext {
    /// Snapshot the running process as a native binary: the executable is
    /// re-run with `argv[1..]` unchanged.
    pub fn capture() -> Result<Self, ReloadError> {
        Ok(Self {
            interpreter: current_interpreter()?,
            entry_point: None,
            args: env::args_os().skip(1).collect(),
            env: env::vars_os().collect(),
        })
    }

    /// Snapshot a process whose executable hosts `entry_point`, launched as
    /// `interpreter entry_point args...`.
    ///
    /// The entry point is kept apart from the arguments, so a restart
    /// produces the same command line instead of repeating the script.
    pub fn capture_script(entry_point: PathBuf) -> Result<Self, ReloadError> {
        let args = script_args(env::args_os().skip(1), &entry_point);
        Ok(Self {
            interpreter: current_interpreter()?,
            entry_point: Some(entry_point),
            args,
            env: env::vars_os().collect(),
        })
    }

    pub fn from_parts<I, A>(
        interpreter: impl Into<PathBuf>,
        entry_point: Option<PathBuf>,
        args: I,
        env: BTreeMap<OsString, OsString>,
    ) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        Self {
            interpreter: interpreter.into(),
            entry_point,
            args: args.into_iter().map(Into::into).collect(),
            env,
        }
    }

    pub fn var(&self, name: &str) -> Option<&OsString> {
        self.env.get(&OsString::from(name))
    }

    /// Number of restarts that led to this process; 0 for a fresh launch.
    pub fn generation(&self) -> u64 {
        self.var(GENERATION_VAR)
            .and_then(|v| v.to_str())
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }
}

fn current_interpreter() -> Result<PathBuf, ReloadError> {
    let exe = env::current_exe().map_err(ReloadError::CurrentExe)?;
    Ok(exe.canonicalize().unwrap_or(exe))
}

/// Arguments that follow the entry point on the command line.
fn script_args(argv: impl IntoIterator<Item = OsString>, entry_point: &Path) -> Vec<OsString> {
    let mut argv = argv.into_iter().peekable();
    if argv.peek().is_some_and(|first| Path::new(first) == entry_point) {
        argv.next();
    }
    argv.collect()
}
