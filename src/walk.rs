// src/walk.rs

//! Deterministic filesystem tree walking
//!
//! The walker flattens a directory into a list of every directory, file,
//! and symlink under it. Symlinks are listed as themselves and never
//! followed. The output order is load-bearing for snapshot comparisons:
//! for each level it is *all recursive descendants of each immediate
//! subdirectory (in host enumeration order), then the immediate
//! subdirectories themselves, then the level's own files and symlinks*.
//! This is neither pre-order nor post-order; it must not be changed and
//! must not be sorted.

use crate::error::Result;
use crate::paths::relative_normalized;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// A single comparable entry of a walked tree.
///
/// Directories and symlinks (and opaque files) are bare normalized paths;
/// text-format files additionally carry their decoded content so unpack
/// round-trip corruption is caught, not just misplacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TreeEntry {
    File { name: String, content: String },
    Path(String),
}

/// Recursively list every directory, file, and symlink under `root`.
///
/// A missing `root` is a caller error and surfaces as `Error::Io`; callers
/// with optional trees (`.unpacked` companions) check existence first.
pub fn walk(root: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    let mut files = Vec::new();

    for entry in fs::read_dir(root)? {
        let entry = entry?;
        // file_type() has lstat semantics: a symlink to a directory is a
        // symlink here, exactly what the listing needs.
        if entry.file_type()?.is_dir() {
            dirs.push(entry.path());
        } else {
            files.push(entry.path());
        }
    }

    let mut result = Vec::new();
    for dir in &dirs {
        result.extend(walk(dir)?);
    }
    result.extend(dirs);
    result.extend(files);
    Ok(result)
}

/// True when the path's extension denotes a text format whose content is
/// part of the comparable snapshot.
fn is_text_entry(path: &Path) -> bool {
    let name = path.to_string_lossy();
    name.ends_with(".txt") || name.ends_with(".json")
}

/// Convert walked paths into snapshot entries relative to `root`.
///
/// Text-format entries become `{name, content}` pairs (symlinks to text
/// files are read through, matching what an unpack consumer would see);
/// everything else keeps its bare normalized relative path.
pub fn materialize(root: &Path, paths: &[PathBuf]) -> Result<Vec<TreeEntry>> {
    paths
        .iter()
        .map(|path| {
            let name = relative_normalized(root, path);
            if is_text_entry(path) {
                let content = fs::read_to_string(path)?;
                Ok(TreeEntry::File { name, content })
            } else {
                Ok(TreeEntry::Path(name))
            }
        })
        .collect()
}

/// Walk `root` and materialize the result in one step.
pub fn normalized_tree(root: &Path) -> Result<Vec<TreeEntry>> {
    let paths = walk(root)?;
    materialize(root, &paths)
}
