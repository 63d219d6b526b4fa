// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{LivewatchError, Result};
use crate::watch::NameFilters;

/// Upper bound for `[watch].debounce_ms`; anything longer is almost
/// certainly a unit mistake (seconds vs milliseconds).
pub const MAX_DEBOUNCE_MS: u64 = 60_000;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = LivewatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.watch, raw.reload, raw.app))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_watch(cfg)?;
    validate_reload(cfg)?;
    validate_app(cfg)?;
    Ok(())
}

fn validate_watch(cfg: &RawConfigFile) -> Result<()> {
    NameFilters::validate(&cfg.watch.name_filters)
        .map_err(|msg| LivewatchError::ConfigError(format!("[watch].name_filters: {msg}")))?;

    if cfg.watch.debounce_ms > MAX_DEBOUNCE_MS {
        return Err(LivewatchError::ConfigError(format!(
            "[watch].debounce_ms must be <= {MAX_DEBOUNCE_MS} (got {})",
            cfg.watch.debounce_ms
        )));
    }
    Ok(())
}

fn validate_reload(cfg: &RawConfigFile) -> Result<()> {
    let var = &cfg.reload.search_path_var;
    if var.is_empty() || var.contains('=') || var.contains('\0') {
        return Err(LivewatchError::ConfigError(format!(
            "[reload].search_path_var is not a valid environment variable name: {var:?}"
        )));
    }
    Ok(())
}

fn validate_app(cfg: &RawConfigFile) -> Result<()> {
    if let Some(program) = cfg.app.command.first() {
        if program.trim().is_empty() {
            return Err(LivewatchError::ConfigError(
                "[app].command must start with a program name".to_string(),
            ));
        }
    }
    Ok(())
}
