// src/fixture.rs

//! Fixture tree synthesis
//!
//! Builds the symlink-heavy input tree fed to the packaging pipeline under
//! test:
//!
//! ```text
//! <testName>
//! ├── private
//! │   └── var
//! │       ├── app
//! │       │   └── file.txt -> ../file.txt
//! │       └── file.txt
//! └── var -> private/var
//! ```
//!
//! The directory symlink aliasing `private/var` plus the file symlink
//! inside the aliased tree deliberately exercise
//! symlink-through-directory-symlink resolution during packing.

use crate::error::Result;
use std::collections::BTreeMap;
use std::fs;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name and fixed content of the default fixture file.
pub const DEFAULT_FILE_NAME: &str = "file.txt";
pub const DEFAULT_FILE_CONTENT: &str = "hello world";

/// Paths of a freshly built fixture tree, handed to the packaging pipeline.
#[derive(Debug)]
pub struct FixtureTree {
    /// Root of the tree (`<apps>/<testName>`).
    pub test_path: PathBuf,
    /// The `var` alias pointing at `private/var`.
    pub var_path: PathBuf,
    /// The `app` directory under the alias.
    pub app_path: PathBuf,
}

/// Builds fixture trees under a fixed parent directory.
///
/// The counter disambiguating anonymous trees is owned here and threaded
/// through call sites by the test harness; there is no process-wide state.
#[derive(Debug)]
pub struct FixtureBuilder {
    apps_dir: PathBuf,
    skeleton_dir: Option<PathBuf>,
    counter: u32,
}

impl FixtureBuilder {
    pub fn new(apps_dir: impl Into<PathBuf>) -> Self {
        Self {
            apps_dir: apps_dir.into(),
            skeleton_dir: None,
            counter: 0,
        }
    }

    /// Use a canonical minimal application skeleton (index/package files)
    /// as the base of every tree.
    pub fn with_skeleton(mut self, skeleton_dir: impl Into<PathBuf>) -> Self {
        self.skeleton_dir = Some(skeleton_dir.into());
        self
    }

    /// Build a fixture tree, replacing any stale directory at the target.
    ///
    /// `extra_files` are written through the `var` alias next to the
    /// default file; a `BTreeMap` keeps write order reproducible.
    pub fn build(
        &mut self,
        test_name: Option<&str>,
        extra_files: &BTreeMap<String, String>,
    ) -> Result<FixtureTree> {
        let name = match test_name {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                let name = format!("app-{}", self.counter);
                self.counter += 1;
                name
            }
        };

        let test_path = self.apps_dir.join(&name);
        if test_path.exists() {
            fs::remove_dir_all(&test_path)?;
        }
        fs::create_dir_all(&test_path)?;
        debug!(path = %test_path.display(), "building fixture tree");

        if let Some(skeleton) = &self.skeleton_dir {
            copy_tree(skeleton, &test_path)?;
        }

        let private_var = test_path.join("private").join("var");
        fs::create_dir_all(&private_var)?;

        // Relative target, exactly as the tree will be packed.
        let var_path = test_path.join("var");
        symlink(Path::new("private").join("var"), &var_path)?;

        fs::write(var_path.join(DEFAULT_FILE_NAME), DEFAULT_FILE_CONTENT)?;
        for (file_name, content) in extra_files {
            fs::write(var_path.join(file_name), content)?;
        }

        let app_path = var_path.join("app");
        fs::create_dir_all(&app_path)?;
        symlink(
            Path::new("..").join(DEFAULT_FILE_NAME),
            app_path.join(DEFAULT_FILE_NAME),
        )?;

        Ok(FixtureTree {
            test_path,
            var_path,
            app_path,
        })
    }
}

/// Recursively copy a directory, recreating symlinks rather than following
/// them.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let from = entry.path();
        let to = dst.join(entry.file_name());
        let file_type = entry.file_type()?;
        if file_type.is_symlink() {
            symlink(fs::read_link(&from)?, &to)?;
        } else if file_type.is_dir() {
            copy_tree(&from, &to)?;
        } else {
            fs::copy(&from, &to)?;
        }
    }
    Ok(())
}
