// src/watch/target.rs

use std::path::PathBuf;

use url::Url;

use crate::errors::WatchError;

/// What the manager should observe.
///
/// `uri` may be a plain path (absolute, or relative to the working directory)
/// or a `file://` URI. Every field change triggers a reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchTarget {
    pub uri: String,
    pub enabled: bool,
    pub recursive: bool,
    pub name_filters: Vec<String>,
}

impl Default for WatchTarget {
    fn default() -> Self {
        Self {
            uri: String::new(),
            enabled: true,
            recursive: false,
            name_filters: Vec::new(),
        }
    }
}

/// Identifies which field of a [`WatchTarget`] changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetField {
    Uri,
    Enabled,
    Recursive,
    NameFilters,
}

impl WatchTarget {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Self::default()
        }
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn name_filters<I, S>(mut self, filters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.name_filters = filters.into_iter().map(Into::into).collect();
        self
    }

    /// Fields that differ between `self` and `other`, in declaration order.
    pub fn changed_fields(&self, other: &WatchTarget) -> Vec<TargetField> {
        let mut fields = Vec::new();
        if self.uri != other.uri {
            fields.push(TargetField::Uri);
        }
        if self.enabled != other.enabled {
            fields.push(TargetField::Enabled);
        }
        if self.recursive != other.recursive {
            fields.push(TargetField::Recursive);
        }
        if self.name_filters != other.name_filters {
            fields.push(TargetField::NameFilters);
        }
        fields
    }
}

/// Turn the target URI into a local path.
///
/// - empty input yields `Ok(None)` ("nothing configured yet")
/// - `file://` URIs are converted to their local path
/// - any other scheme is rejected as non-local
/// - everything else is taken as a plain path
pub fn resolve_local_path(uri: &str) -> Result<Option<PathBuf>, WatchError> {
    if uri.is_empty() {
        return Ok(None);
    }

    if let Ok(url) = Url::parse(uri) {
        // A one-letter scheme is a Windows drive letter, not a URI.
        if url.scheme().len() > 1 {
            if url.scheme() != "file" {
                return Err(WatchError::UnsupportedTarget(uri.to_string()));
            }
            let path = url
                .to_file_path()
                .map_err(|_| WatchError::UnsupportedTarget(uri.to_string()))?;
            if path.as_os_str().is_empty() {
                return Ok(None);
            }
            return Ok(Some(path));
        }
    }

    Ok(Some(PathBuf::from(uri)))
}
