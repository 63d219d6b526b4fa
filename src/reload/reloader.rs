// src/reload/reloader.rs

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::errors::ReloadError;
use crate::reload::context::{ProcessContext, GENERATION_VAR};
use crate::reload::hooks::{TerminationContext, TerminationHooks, TerminationReason};
use crate::reload::replacer::{ensure_executable, replacement_error, ExecReplacer, ImageReplacer, ReplacementCommand};
use crate::reload::search_path::{augment_search_path, import_root_for};

/// Default name of the inherited search-path variable.
pub const DEFAULT_SEARCH_PATH_VAR: &str = "LIVEWATCH_PATH";

/// Knobs for how a restart prepares the new image's environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadSettings {
    pub search_path_var: String,
    /// Overrides the import root derived from the executable location.
    pub import_root: Option<PathBuf>,
}

impl Default for ReloadSettings {
    fn default() -> Self {
        Self {
            search_path_var: DEFAULT_SEARCH_PATH_VAR.to_string(),
            import_root: None,
        }
    }
}

/// Restarts the running process in place.
///
/// The controller owns one of these for the lifetime of the process. A
/// restart is a two-step protocol: [`prepare_for_replacement`] runs the
/// termination hooks, then the [`ImageReplacer`] swaps the image.
///
/// [`prepare_for_replacement`]: ProcessReloader::prepare_for_replacement
pub struct ProcessReloader {
    context: ProcessContext,
    settings: ReloadSettings,
    hooks: TerminationHooks,
    replacer: Box<dyn ImageReplacer>,
}

impl fmt::Debug for ProcessReloader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessReloader")
            .field("context", &self.context)
            .field("settings", &self.settings)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

impl ProcessReloader {
    pub fn new(context: ProcessContext, settings: ReloadSettings) -> Self {
        Self::with_replacer(context, settings, Box::new(ExecReplacer))
    }

    pub fn with_replacer(
        context: ProcessContext,
        settings: ReloadSettings,
        replacer: Box<dyn ImageReplacer>,
    ) -> Self {
        Self {
            context,
            settings,
            hooks: TerminationHooks::default(),
            replacer,
        }
    }

    pub fn context(&self) -> &ProcessContext {
        &self.context
    }

    pub fn generation(&self) -> u64 {
        self.context.generation()
    }

    /// Register cleanup to run right before the image is replaced (or the
    /// process shuts down).
    pub fn register_termination_hook<F>(&mut self, hook: F)
    where
        F: FnOnce(&TerminationContext<'_>) + Send + 'static,
    {
        self.hooks.register(hook);
    }

    pub fn import_root(&self) -> Option<PathBuf> {
        self.settings
            .import_root
            .clone()
            .or_else(|| import_root_for(&self.context.interpreter))
    }

    /// Compute the program, arguments and environment of the new image.
    ///
    /// Arguments are `[entry_point] ++ argv[1..]`, untouched.
    pub fn replacement_command(&self) -> ReplacementCommand {
        let mut args: Vec<OsString> = Vec::with_capacity(self.context.args.len() + 1);
        if let Some(entry) = &self.context.entry_point {
            args.push(entry.clone().into_os_string());
        }
        args.extend(self.context.args.iter().cloned());

        let mut env = self.context.env.clone();
        match self.import_root() {
            Some(root) => {
                let key = OsString::from(&self.settings.search_path_var);
                let value = augment_search_path(env.get(&key).map(|v| v.as_os_str()), &root);
                debug!(var = %self.settings.search_path_var, value = ?value, "search path for new image");
                env.insert(key, value);
            }
            None => debug!("no import root; search path left as inherited"),
        }
        env.insert(
            OsString::from(GENERATION_VAR),
            OsString::from((self.generation() + 1).to_string()),
        );

        ReplacementCommand {
            program: self.context.interpreter.clone(),
            args,
            env,
        }
    }

    /// Run the termination hooks for a restart. Safe to call more than once;
    /// hooks only ever run the first time.
    pub fn prepare_for_replacement(&mut self) -> usize {
        self.run_hooks(TerminationReason::Restart, self.generation() + 1)
    }

    /// Run the termination hooks for a plain shutdown.
    pub fn shutdown(&mut self) -> usize {
        self.run_hooks(TerminationReason::Shutdown, self.generation())
    }

    fn run_hooks(&mut self, reason: TerminationReason, next_generation: u64) -> usize {
        let ctx = TerminationContext {
            reason,
            process: &self.context,
            next_generation,
        };
        self.hooks.run(&ctx)
    }

    /// Replace the running process with a fresh copy of itself.
    ///
    /// Never returns on success. On error the old image is still running and
    /// the caller must report the failure. The interpreter and entry point are
    /// checked before any hook runs, so a bad path leaves everything intact.
    pub fn restart(&mut self) -> Result<(), ReloadError> {
        let command = self.replacement_command();

        ensure_executable(&command.program)?;
        if let Some(entry) = &self.context.entry_point {
            if !entry.exists() {
                return Err(replacement_error(
                    entry,
                    "entry point does not exist",
                ));
            }
        }

        info!(
            program = ?command.program,
            args = ?command.args,
            generation = self.generation() + 1,
            "replacing process image"
        );

        self.prepare_for_replacement();
        let result = self.replacer.replace_image(&command);
        if let Err(err) = &result {
            warn!(error = %err, "process image replacement failed; still running old image");
        }
        result
    }
}
