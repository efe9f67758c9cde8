// src/template.rs

//! Template bundle materialization
//!
//! Obtains a cached pre-built minimal application bundle for a target
//! architecture, extracts it to a destination, drops its bundled
//! default-content archive, and applies a caller-supplied mutation before
//! the packaging pipeline under test packs real resources into it.

use crate::bundle::{self, DEFAULT_APP_ARCHIVE};
use crate::error::{Error, Result};
use crate::universal::Arch;
use std::env;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Artifact identity of the template bundle.
pub const TEMPLATE_ARTIFACT: &str = "electron";
pub const TEMPLATE_VERSION: &str = "27.0.0";
pub const TEMPLATE_PLATFORM: &str = "darwin";

/// Directory name the template zip extracts to before renaming.
const TEMPLATE_APP_DIR: &str = "Electron.app";

/// Release server hosting the template artifacts.
const DEFAULT_BASE_URL: &str = "https://github.com/electron/electron/releases/download";

/// Environment variable overriding the artifact cache root.
pub const CACHE_ENV: &str = "ASAR_VERIFY_CACHE";

/// Download timeout; template zips run to ~100 MB.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(600);

/// Content address of a downloadable artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRequest {
    pub name: String,
    pub version: String,
    pub platform: String,
    pub arch: String,
}

impl ArtifactRequest {
    /// Request for the template bundle at a given architecture.
    pub fn template(arch: Arch) -> Self {
        Self {
            name: TEMPLATE_ARTIFACT.to_string(),
            version: TEMPLATE_VERSION.to_string(),
            platform: TEMPLATE_PLATFORM.to_string(),
            arch: arch.marker().to_string(),
        }
    }

    /// Canonical zip file name, also the cache key.
    pub fn file_name(&self) -> String {
        format!(
            "{}-v{}-{}-{}.zip",
            self.name, self.version, self.platform, self.arch
        )
    }
}

/// Supplies a local path to a requested artifact.
pub trait ArtifactSource {
    fn fetch(&self, request: &ArtifactRequest) -> Result<PathBuf>;
}

/// Downloads artifacts over HTTPS and caches them on disk, keyed by the
/// request's four identity fields.
#[derive(Debug)]
pub struct HttpArtifactSource {
    base_url: String,
    cache_root: PathBuf,
}

impl HttpArtifactSource {
    /// Cache root comes from `ASAR_VERIFY_CACHE` when set, otherwise a
    /// per-user location under the system temp directory.
    pub fn new() -> Self {
        let cache_root = env::var_os(CACHE_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| env::temp_dir().join("asar-verify-artifacts"));
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            cache_root,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_cache_root(mut self, cache_root: impl Into<PathBuf>) -> Self {
        self.cache_root = cache_root.into();
        self
    }
}

impl Default for HttpArtifactSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtifactSource for HttpArtifactSource {
    fn fetch(&self, request: &ArtifactRequest) -> Result<PathBuf> {
        let file_name = request.file_name();
        let cached = self.cache_root.join(&file_name);
        if cached.exists() {
            debug!(artifact = %file_name, "artifact cache hit");
            return Ok(cached);
        }

        fs::create_dir_all(&self.cache_root)?;
        let url = format!("{}/v{}/{}", self.base_url, request.version, file_name);
        info!(%url, "downloading template artifact");

        let client = reqwest::blocking::Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .build()
            .map_err(|e| Error::Download(e.to_string()))?;
        let mut response = client
            .get(&url)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(|e| Error::Download(format!("{url}: {e}")))?;

        // Stream to a sibling temp file, then rename so a partial download
        // never poisons the cache.
        let partial = cached.with_extension("zip.partial");
        let mut out = File::create(&partial)?;
        io::copy(&mut response, &mut out).map_err(|e| Error::Download(e.to_string()))?;
        fs::rename(&partial, &cached)?;

        Ok(cached)
    }
}

/// Materialize a template bundle at `<apps_dir>/<name>`.
///
/// Fetches the per-arch artifact (cached), extracts it, removes the
/// bundled default-content archive, and invokes `modify` exactly once on
/// the extracted bundle before returning its path.
pub fn template_bundle(
    source: &dyn ArtifactSource,
    apps_dir: &Path,
    name: &str,
    arch: Arch,
    modify: impl FnOnce(&Path) -> Result<()>,
) -> Result<PathBuf> {
    let zip_path = source.fetch(&ArtifactRequest::template(arch))?;

    fs::create_dir_all(apps_dir)?;
    extract_zip(&zip_path, apps_dir)?;

    let extracted = apps_dir.join(TEMPLATE_APP_DIR);
    let app_path = apps_dir.join(name);
    if app_path.exists() {
        fs::remove_dir_all(&app_path)?;
    }
    fs::rename(&extracted, &app_path)?;

    let default_archive = bundle::resources_dir(&app_path).join(DEFAULT_APP_ARCHIVE);
    if default_archive.exists() {
        fs::remove_file(&default_archive)?;
    }

    modify(&app_path)?;
    Ok(app_path)
}

/// Extract a zip archive into `dest`, restoring unix modes and recreating
/// symlink entries (template bundles contain framework symlinks).
pub fn extract_zip(zip_path: &Path, dest: &Path) -> Result<()> {
    let file = File::open(zip_path)?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| Error::Zip(format!("{}: {e}", zip_path.display())))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| Error::Zip(e.to_string()))?;
        let Some(rel) = entry.enclosed_name().map(Path::to_path_buf) else {
            continue;
        };
        let out_path = dest.join(rel);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mode = entry.unix_mode();
        if mode.is_some_and(|m| m & 0o170000 == 0o120000) {
            // Symlink entry: the payload is the link target.
            let mut target = String::new();
            io::Read::read_to_string(&mut entry, &mut target)?;
            // symlink_metadata, not exists(): a stale dangling link must
            // still be replaced on re-extraction.
            if out_path.symlink_metadata().is_ok() {
                fs::remove_file(&out_path)?;
            }
            std::os::unix::fs::symlink(target, &out_path)?;
            continue;
        }

        let mut out = File::create(&out_path)?;
        io::copy(&mut entry, &mut out)?;
        if let Some(mode) = mode {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&out_path, fs::Permissions::from_mode(mode & 0o7777))?;
        }
    }
    Ok(())
}
