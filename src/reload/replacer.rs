// src/reload/replacer.rs

//! The non-returning "replace this process" primitive.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::errors::ReloadError;

/// Everything needed to start the replacement image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementCommand {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub env: BTreeMap<OsString, OsString>,
}

impl ReplacementCommand {
    /// Build a `std::process::Command` with exactly this program, arguments
    /// and environment (nothing inherited beyond `env`).
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).env_clear().envs(&self.env);
        cmd
    }
}

/// Replaces the current process image.
///
/// A production implementation never returns `Ok`: on success the calling
/// code is gone. Test implementations record the command and return `Ok(())`.
pub trait ImageReplacer: Send {
    fn replace_image(&mut self, command: &ReplacementCommand) -> Result<(), ReloadError>;
}

/// `exec`-based replacement.
///
/// On Unix the PID, working directory and descriptors without close-on-exec
/// survive. Elsewhere the replacement is spawned and this process exits with
/// its status.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExecReplacer;

impl ImageReplacer for ExecReplacer {
    #[cfg(unix)]
    fn replace_image(&mut self, command: &ReplacementCommand) -> Result<(), ReloadError> {
        use std::os::unix::process::CommandExt;

        flush_std_streams();
        let err = command.to_command().exec();
        Err(replacement_error(&command.program, err.to_string()))
    }

    #[cfg(not(unix))]
    fn replace_image(&mut self, command: &ReplacementCommand) -> Result<(), ReloadError> {
        flush_std_streams();
        let status = command
            .to_command()
            .status()
            .map_err(|e| replacement_error(&command.program, e.to_string()))?;
        std::process::exit(status.code().unwrap_or(1));
    }
}

fn flush_std_streams() {
    let _ = std::io::stdout().flush();
    let _ = std::io::stderr().flush();
}

pub(crate) fn replacement_error(program: &Path, reason: impl Into<String>) -> ReloadError {
    ReloadError::ProcessReplacement {
        program: program.to_path_buf(),
        reason: reason.into(),
    }
}

/// Fail early if `path` cannot be executed.
pub fn ensure_executable(path: &Path) -> Result<(), ReloadError> {
    let meta = std::fs::metadata(path)
        .map_err(|e| replacement_error(path, format!("cannot resolve interpreter: {e}")))?;
    if !meta.is_file() {
        return Err(replacement_error(path, "interpreter is not a regular file"));
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if meta.permissions().mode() & 0o111 == 0 {
            return Err(replacement_error(path, "interpreter is not executable"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_rejected() {
        let err = ensure_executable(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, ReloadError::ProcessReplacement { .. }));
    }

    #[test]
    fn current_exe_is_executable() {
        let exe = std::env::current_exe().unwrap();
        ensure_executable(&exe).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn non_executable_file_is_rejected() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = ensure_executable(file.path()).unwrap_err();
        assert!(err.to_string().contains("not executable"));
    }

    #[test]
    fn command_carries_args_and_env() {
        let mut env = BTreeMap::new();
        env.insert(OsString::from("A"), OsString::from("1"));
        let rc = ReplacementCommand {
            program: PathBuf::from("/bin/app"),
            args: vec!["main.py".into(), "--x".into()],
            env,
        };

        let cmd = rc.to_command();
        assert_eq!(cmd.get_program(), "/bin/app");
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args, vec!["main.py", "--x"]);
        let envs: Vec<_> = cmd.get_envs().collect();
        assert!(envs.contains(&("A".as_ref(), Some("1".as_ref()))));
    }
}
