// tests/template_bundle.rs

//! Integration tests for template bundle materialization, using a locally
//! authored zip artifact instead of the release server.

use asar_verify::template::{
    ArtifactRequest, ArtifactSource, HttpArtifactSource, extract_zip, template_bundle,
};
use asar_verify::{Arch, Result, bundle};
use std::cell::Cell;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::FileOptions;

/// Serves a pre-authored zip for any request.
struct LocalSource {
    zip_path: PathBuf,
}

impl ArtifactSource for LocalSource {
    fn fetch(&self, _request: &ArtifactRequest) -> Result<PathBuf> {
        Ok(self.zip_path.clone())
    }
}

/// Author a minimal template zip the way the release artifact is shaped:
/// an `Electron.app` bundle with an executable and a default archive.
fn author_template_zip(path: &Path) {
    let file = File::create(path).unwrap();
    let mut writer = zip::ZipWriter::new(file);

    writer
        .start_file(
            "Electron.app/Contents/MacOS/Electron",
            FileOptions::default().unix_permissions(0o755),
        )
        .unwrap();
    writer.write_all(b"#!/bin/sh\necho arm64\n").unwrap();

    writer
        .start_file(
            "Electron.app/Contents/Resources/default_app.asar",
            FileOptions::default(),
        )
        .unwrap();
    writer.write_all(b"placeholder").unwrap();

    writer
        .start_file("Electron.app/Contents/Info.plist", FileOptions::default())
        .unwrap();
    writer
        .write_all(b"<plist version=\"1.0\"><dict/></plist>")
        .unwrap();

    writer.finish().unwrap();
}

#[test]
fn materializes_bundle_and_applies_mutation_once() {
    let tmp = TempDir::new().unwrap();
    let zip_path = tmp.path().join("electron-v27.0.0-darwin-arm64.zip");
    author_template_zip(&zip_path);

    let source = LocalSource { zip_path };
    let apps_dir = tmp.path().join("apps");
    let invocations = Cell::new(0u32);

    let app_path = template_bundle(&source, &apps_dir, "Seed.app", Arch::Arm64, |app| {
        invocations.set(invocations.get() + 1);
        fs::write(bundle::resources_dir(app).join("mutated.txt"), "yes")?;
        Ok(())
    })
    .unwrap();

    assert_eq!(app_path, apps_dir.join("Seed.app"));
    assert_eq!(invocations.get(), 1);

    // Default-content archive is fixture noise and must be gone.
    assert!(!bundle::resources_dir(&app_path).join("default_app.asar").exists());
    // The mutation ran against the extracted bundle.
    assert_eq!(
        fs::read_to_string(bundle::resources_dir(&app_path).join("mutated.txt")).unwrap(),
        "yes"
    );
    // Executable landed with its mode restored.
    let exe = bundle::executable_path(&app_path, "Electron");
    assert!(exe.exists());
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = exe.metadata().unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111, "executable bit lost: {mode:o}");
    }
}

#[test]
fn stale_destination_is_replaced() {
    let tmp = TempDir::new().unwrap();
    let zip_path = tmp.path().join("electron-v27.0.0-darwin-x64.zip");
    author_template_zip(&zip_path);

    let source = LocalSource { zip_path };
    let apps_dir = tmp.path().join("apps");
    let stale = apps_dir.join("Seed.app").join("leftover");
    fs::create_dir_all(&stale).unwrap();

    template_bundle(&source, &apps_dir, "Seed.app", Arch::X64, |_| Ok(())).unwrap();
    assert!(!stale.exists());
}

#[test]
fn re_extraction_replaces_dangling_symlinks() {
    let tmp = TempDir::new().unwrap();
    let zip_path = tmp.path().join("with-link.zip");
    let file = File::create(&zip_path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    writer
        .start_file(
            "Electron.app/Contents/MacOS/Electron",
            FileOptions::default(),
        )
        .unwrap();
    writer.write_all(b"bin").unwrap();
    writer
        .add_symlink(
            "Electron.app/Contents/Frameworks/Current",
            "Versions/A",
            FileOptions::default(),
        )
        .unwrap();
    writer.finish().unwrap();

    let dest = tmp.path().join("out");
    extract_zip(&zip_path, &dest).unwrap();

    let link = dest.join("Electron.app/Contents/Frameworks/Current");
    assert!(link.symlink_metadata().unwrap().file_type().is_symlink());
    // The target is never extracted, so the link dangles.
    assert!(!link.exists());

    // A second extraction over the dangling link must replace it, not fail.
    extract_zip(&zip_path, &dest).unwrap();
    assert_eq!(fs::read_link(&link).unwrap(), PathBuf::from("Versions/A"));
}

#[test]
fn cached_artifact_is_reused_without_download() {
    let tmp = TempDir::new().unwrap();
    let cache_root = tmp.path().join("cache");
    fs::create_dir_all(&cache_root).unwrap();

    // Pre-seed the cache; a base URL that cannot resolve proves no network
    // request is attempted on a hit.
    let request = ArtifactRequest::template(Arch::Arm64);
    let cached = cache_root.join(request.file_name());
    fs::write(&cached, b"cached-zip-bytes").unwrap();

    let source = HttpArtifactSource::new()
        .with_base_url("http://invalid.localdomain")
        .with_cache_root(&cache_root);
    assert_eq!(source.fetch(&request).unwrap(), cached);
}
