use std::sync::{Arc, Mutex};

use livewatch::errors::ReloadError;
use livewatch::reload::{ImageReplacer, ReplacementCommand};

/// Replacer that records commands instead of calling `exec`.
///
/// Clones share the recording. By default every call succeeds; `failing`
/// builds one that reports a replacement error like a failed `exec` would.
#[derive(Debug, Clone, Default)]
pub struct RecordingReplacer {
    commands: Arc<Mutex<Vec<ReplacementCommand>>>,
    fail_with: Option<String>,
}

impl RecordingReplacer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            commands: Arc::default(),
            fail_with: Some(reason.to_string()),
        }
    }

    pub fn commands(&self) -> Vec<ReplacementCommand> {
        self.commands.lock().unwrap().clone()
    }
}

impl ImageReplacer for RecordingReplacer {
    fn replace_image(&mut self, command: &ReplacementCommand) -> Result<(), ReloadError> {
        self.commands.lock().unwrap().push(command.clone());
        match &self.fail_with {
            Some(reason) => Err(ReloadError::ProcessReplacement {
                program: command.program.clone(),
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}
