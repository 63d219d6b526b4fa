// src/reload/search_path.rs

//! Search-path handling so a re-executed process finds the same in-tree
//! modules as the one it replaces.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

#[cfg(unix)]
pub const PATH_LIST_SEPARATOR: &str = ":";
#[cfg(not(unix))]
pub const PATH_LIST_SEPARATOR: &str = ";";

/// Directory one level above the one holding `exe`.
///
/// For `/opt/app/bin/livewatch` this is `/opt/app`.
pub fn import_root_for(exe: &Path) -> Option<PathBuf> {
    exe.parent()
        .and_then(Path::parent)
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
}

/// Append `root` to a path list unless it already occurs in it.
///
/// The presence check is a plain substring match, so calling this again on
/// its own output never adds a second copy. An unset or empty list becomes
/// `root` alone.
pub fn augment_search_path(current: Option<&OsStr>, root: &Path) -> OsString {
    let current = current.unwrap_or_default();
    if current.is_empty() {
        return root.as_os_str().to_owned();
    }

    let root_str = root.to_string_lossy();
    if current.to_string_lossy().contains(root_str.as_ref()) {
        return current.to_owned();
    }

    let mut out = current.to_owned();
    out.push(PATH_LIST_SEPARATOR);
    out.push(root.as_os_str());
    out
}
