// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::reload::{ReloadSettings, DEFAULT_SEARCH_PATH_VAR};
use crate::watch::WatchTarget;

/// Configuration as read from TOML, before validation.
///
/// ```toml
/// [watch]
/// path = "src"
/// recursive = true
/// name_filters = ["*.pyc", "__pycache__"]
/// debounce_ms = 100
///
/// [reload]
/// search_path_var = "LIVEWATCH_PATH"
///
/// [app]
/// command = ["python", "main.py"]
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub reload: ReloadSection,

    #[serde(default)]
    pub app: AppSection,
}

/// Validated configuration. Obtain one via `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    watch: WatchSection,
    reload: ReloadSection,
    app: AppSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(watch: WatchSection, reload: ReloadSection, app: AppSection) -> Self {
        Self { watch, reload, app }
    }

    pub fn watch(&self) -> &WatchSection {
        &self.watch
    }

    pub fn reload(&self) -> &ReloadSection {
        &self.reload
    }

    pub fn app(&self) -> &AppSection {
        &self.app
    }

    /// Back to the raw form, e.g. to layer CLI overrides and re-validate.
    pub fn into_raw(self) -> RawConfigFile {
        RawConfigFile {
            watch: self.watch,
            reload: self.reload,
            app: self.app,
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(
            WatchSection::default(),
            ReloadSection::default(),
            AppSection::default(),
        )
    }
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchSection {
    /// File, directory or `file://` URI to watch. Empty means "nothing yet".
    #[serde(default)]
    pub path: String,

    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub recursive: bool,

    /// Base-name glob patterns to leave out of the watch set.
    #[serde(default)]
    pub name_filters: Vec<String>,

    /// Quiet period before a burst of changes triggers a restart.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_true() -> bool {
    true
}

fn default_debounce_ms() -> u64 {
    100
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            path: String::new(),
            enabled: true,
            recursive: false,
            name_filters: Vec::new(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl WatchSection {
    pub fn to_target(&self) -> WatchTarget {
        WatchTarget {
            uri: self.path.clone(),
            enabled: self.enabled,
            recursive: self.recursive,
            name_filters: self.name_filters.clone(),
        }
    }
}

/// `[reload]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReloadSection {
    #[serde(default = "default_search_path_var")]
    pub search_path_var: String,

    #[serde(default)]
    pub import_root: Option<PathBuf>,
}

fn default_search_path_var() -> String {
    DEFAULT_SEARCH_PATH_VAR.to_string()
}

impl Default for ReloadSection {
    fn default() -> Self {
        Self {
            search_path_var: default_search_path_var(),
            import_root: None,
        }
    }
}

impl ReloadSection {
    pub fn to_settings(&self) -> ReloadSettings {
        ReloadSettings {
            search_path_var: self.search_path_var.clone(),
            import_root: self.import_root.clone(),
        }
    }
}

/// `[app]` section: an optional command run as a child of the watcher and
/// torn down before every restart.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppSection {
    #[serde(default)]
    pub command: Vec<String>,
}
