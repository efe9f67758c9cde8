// src/verify.rs

//! Archive and bundle-wide verification
//!
//! `verify_smart_unpack` reconciles one packed archive: its normalized
//! header, plus the tree of any `.unpacked` companion directory beside it.
//! `Verifier::verify_bundle` runs that over every archive in a bundle's
//! resource directory (lexicographic order), walks top-level application
//! directories, isolates the integrity section, and optionally drives the
//! universal-executable check.
//!
//! Snapshot mismatches accumulate in the returned `VerifyReport`; the pass
//! never short-circuits on one, so a single run reports every divergence.
//! Missing inputs and spawn failures are hard errors and propagate.

use crate::bundle::{self, APP_MARKER, ARCHIVE_EXT, UNPACKED_SUFFIX};
use crate::error::{Error, Result};
use crate::header::HeaderReader;
use crate::snapshot::{Outcome, SnapshotStore};
use crate::strip::remove_unstable_properties;
use crate::universal::{self, Arch, Spawner};
use crate::walk;
use crate::{integrity, paths};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// One snapshot divergence, keyed by the comparison it came from.
#[derive(Debug, Clone)]
pub struct Mismatch {
    pub key: String,
    pub diff: String,
}

/// Accumulated outcome of a verification pass.
#[derive(Debug, Default)]
pub struct VerifyReport {
    /// Keys whose baseline was recorded for the first time this run.
    pub recorded: Vec<String>,
    /// Keys that matched their baseline.
    pub matched: Vec<String>,
    /// Keys that diverged, with structural diffs.
    pub mismatches: Vec<Mismatch>,
}

impl VerifyReport {
    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Knobs for a bundle-wide pass.
#[derive(Debug, Default)]
pub struct BundleOptions {
    /// Snapshot the integrity section from `Info.plist`.
    pub integrity: bool,
    /// Additionally recompute header hashes against the integrity section.
    pub recompute_hashes: bool,
    /// Run the universal-executable check for an architecture-dual bundle.
    pub universal: Option<UniversalCheck>,
}

/// Parameters of the dual-architecture executable check.
#[derive(Debug)]
pub struct UniversalCheck {
    /// Executable name under `Contents/MacOS`.
    pub executable: String,
    /// Architecture of the host the native invocation runs under.
    pub native: Arch,
}

/// Drives verification with injected collaborators.
pub struct Verifier<'a> {
    reader: &'a dyn HeaderReader,
    spawner: &'a dyn Spawner,
    snapshots: &'a mut dyn SnapshotStore,
}

impl<'a> Verifier<'a> {
    pub fn new(
        reader: &'a dyn HeaderReader,
        spawner: &'a dyn Spawner,
        snapshots: &'a mut dyn SnapshotStore,
    ) -> Self {
        Self {
            reader,
            spawner,
            snapshots,
        }
    }

    /// Verify one packed archive and, when present, its `.unpacked`
    /// companion directory. Absence of the companion means the archive is
    /// fully self-contained and is not an error.
    pub fn verify_smart_unpack(&mut self, archive_path: &Path, report: &mut VerifyReport) -> Result<()> {
        let stem = archive_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::MissingInput(archive_path.to_path_buf()))?;
        debug!(archive = %stem, "verifying packed archive");

        let header = self.reader.read_header(archive_path)?;
        let normalized = remove_unstable_properties(&header);
        self.check(format!("{stem}/header"), &normalized, report)?;

        let unpacked = bundle::unpacked_dir(archive_path);
        if !unpacked.exists() {
            return Ok(());
        }

        let entries = walk::normalized_tree(&unpacked)?;
        let value = serde_json::to_value(&entries)?;
        self.check(format!("{stem}/unpacked"), &value, report)
    }

    /// Verify every packed archive under the bundle's resource directory,
    /// sorted lexicographically for deterministic iteration.
    pub fn verify_all_archives(&mut self, bundle_root: &Path, report: &mut VerifyReport) -> Result<()> {
        let resources = bundle::resources_dir(bundle_root);
        if !resources.exists() {
            return Err(Error::MissingInput(resources));
        }

        let mut archives: Vec<String> = fs::read_dir(&resources)?
            .collect::<std::io::Result<Vec<_>>>()?
            .into_iter()
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(ARCHIVE_EXT))
            .collect();
        archives.sort();

        info!(count = archives.len(), "verifying packed archives");
        for archive in &archives {
            self.verify_smart_unpack(&resources.join(archive), report)?;
        }
        Ok(())
    }

    /// Walk every top-level application directory under Resources (skipping
    /// `.unpacked` companions) and compare its materialized tree.
    pub fn verify_app_dirs(&mut self, bundle_root: &Path, report: &mut VerifyReport) -> Result<()> {
        let resources = bundle::resources_dir(bundle_root);
        if !resources.exists() {
            return Err(Error::MissingInput(resources));
        }

        let mut app_dirs = Vec::new();
        for entry in fs::read_dir(&resources)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if entry.file_type()?.is_dir()
                && name.contains(APP_MARKER)
                && !name.ends_with(UNPACKED_SUFFIX)
            {
                app_dirs.push(name);
            }
        }
        app_dirs.sort();

        for name in &app_dirs {
            let dir = resources.join(name);
            let entries = walk::normalized_tree(&dir)?;
            let value = serde_json::to_value(&entries)?;
            let key = format!("apps/{}", paths::to_system_independent_path(name));
            self.check(key, &value, report)?;
        }
        Ok(())
    }

    /// Run the full bundle-wide pass.
    pub fn verify_bundle(&mut self, bundle_root: &Path, options: &BundleOptions) -> Result<VerifyReport> {
        if !bundle_root.exists() {
            return Err(Error::MissingInput(bundle_root.to_path_buf()));
        }

        let mut report = VerifyReport::default();
        self.verify_all_archives(bundle_root, &mut report)?;
        self.verify_app_dirs(bundle_root, &mut report)?;

        if options.integrity {
            let section = integrity::read_bundle_integrity(bundle_root)?;
            self.check("integrity".to_string(), &section, &mut report)?;
            if options.recompute_hashes {
                let checked = integrity::verify_integrity(bundle_root)?;
                info!(checked, "integrity hashes recomputed");
            }
        }

        if let Some(check) = &options.universal {
            universal::ensure_universal(
                self.spawner,
                bundle_root,
                &check.executable,
                check.native,
            )?;
        }

        Ok(report)
    }

    fn check(&mut self, key: String, value: &Value, report: &mut VerifyReport) -> Result<()> {
        match self.snapshots.compare_or_record(&key, value)? {
            Outcome::Recorded => {
                debug!(key = %key, "baseline recorded");
                report.recorded.push(key);
            }
            Outcome::Matched => report.matched.push(key),
            Outcome::Mismatch(diff) => {
                warn!(key = %key, "snapshot mismatch");
                report.mismatches.push(Mismatch { key, diff });
            }
        }
        Ok(())
    }
}
