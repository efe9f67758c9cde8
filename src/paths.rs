// src/paths.rs

//! Path normalization for cross-platform-stable comparisons
//!
//! Snapshot baselines are shared between hosts, so every path that ends up
//! in a comparable value must use forward-slash separators regardless of
//! what the host filesystem reports.

use std::path::Path;

/// Convert a host path string to its system-independent form.
///
/// On forward-slash platforms this is a no-op; elsewhere every backslash
/// separator is replaced with `/`.
pub fn to_system_independent_path(s: &str) -> String {
    if std::path::MAIN_SEPARATOR == '/' {
        s.to_string()
    } else {
        s.replace('\\', "/")
    }
}

/// Strip `root` from `path` and normalize the remainder.
///
/// `path` must live under `root`; callers only ever pass entries produced
/// by walking `root` itself.
pub fn relative_normalized(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    normalize_lossy(rel)
}

/// Normalize a full path for display/snapshot purposes.
pub fn normalize_lossy(path: &Path) -> String {
    let s = path.to_string_lossy();
    // Backslashes are always separators here: these paths come from our own
    // read_dir joins, never from user-authored file names.
    s.replace('\\', "/")
}
