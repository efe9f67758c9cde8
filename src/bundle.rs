// src/bundle.rs

//! Fixed on-disk layout of a packaged application bundle
//!
//! Bundle root → `Contents/MacOS/<executable>`, `Contents/Resources/*.asar`
//! (with optional `*.asar.unpacked/` siblings), `Contents/Info.plist`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// File extension of a packed resource archive.
pub const ARCHIVE_EXT: &str = ".asar";

/// Suffix of an archive's companion directory holding its loose files.
pub const UNPACKED_SUFFIX: &str = ".unpacked";

/// Name fragment identifying an application directory under Resources.
pub const APP_MARKER: &str = ".app";

/// Name of the archive the template bundle ships with; fixture noise,
/// removed before packing real resources.
pub const DEFAULT_APP_ARCHIVE: &str = "default_app.asar";

/// `<root>/Contents/Resources`
pub fn resources_dir(bundle_root: &Path) -> PathBuf {
    bundle_root.join("Contents").join("Resources")
}

/// `<root>/Contents/MacOS/<executable>`
pub fn executable_path(bundle_root: &Path, executable: &str) -> PathBuf {
    bundle_root.join("Contents").join("MacOS").join(executable)
}

/// `<root>/Contents/Info.plist`
pub fn info_plist_path(bundle_root: &Path) -> PathBuf {
    bundle_root.join("Contents").join("Info.plist")
}

/// The `.unpacked` companion directory colocated beside an archive.
pub fn unpacked_dir(archive_path: &Path) -> PathBuf {
    let mut name = OsString::from(archive_path.as_os_str());
    name.push(UNPACKED_SUFFIX);
    PathBuf::from(name)
}
