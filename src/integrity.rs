// src/integrity.rs

//! Packaging-integrity metadata
//!
//! The packaging pipeline embeds a hash per packed archive in the bundle's
//! property list, keyed by archive path. Only that sub-document is
//! comparable; the rest of the plist carries run-dependent fields
//! (timestamps, build identifiers) and is discarded before comparison.
//! Hashes are computed over the archive's raw header document bytes.

use crate::bundle;
use crate::error::{Error, Result};
use crate::header::AsarReader;
use crate::plist;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Top-level property-list key holding the integrity section.
pub const INTEGRITY_KEY: &str = "ElectronAsarIntegrity";

/// Isolate the integrity section from property-list text.
pub fn extract_integrity(plist_text: &str) -> Result<Value> {
    let doc = plist::parse(plist_text)?;
    doc.get(INTEGRITY_KEY)
        .cloned()
        .ok_or(Error::MissingIntegrity(INTEGRITY_KEY))
}

/// Read a bundle's `Info.plist` and return its integrity section.
pub fn read_bundle_integrity(bundle_root: &Path) -> Result<Value> {
    let plist_path = bundle::info_plist_path(bundle_root);
    if !plist_path.exists() {
        return Err(Error::MissingInput(plist_path));
    }
    extract_integrity(&fs::read_to_string(plist_path)?)
}

/// Recompute each recorded archive's header hash and check it against the
/// integrity section. Returns the number of archives checked.
pub fn verify_integrity(bundle_root: &Path) -> Result<usize> {
    let section = read_bundle_integrity(bundle_root)?;
    let Value::Object(entries) = &section else {
        return Err(Error::Integrity {
            archive: INTEGRITY_KEY.to_string(),
            reason: "integrity section is not a dictionary".to_string(),
        });
    };

    let contents = bundle_root.join("Contents");
    let reader = AsarReader;
    let mut checked = 0;

    for (archive_rel, entry) in entries {
        let algorithm = entry
            .get("algorithm")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if algorithm != "SHA256" {
            return Err(Error::Integrity {
                archive: archive_rel.clone(),
                reason: format!("unsupported algorithm `{algorithm}`"),
            });
        }
        let recorded = entry.get("hash").and_then(Value::as_str).unwrap_or_default();

        let header_text = reader.read_header_text(&contents.join(archive_rel))?;
        let actual = hex::encode(Sha256::digest(header_text.as_bytes()));
        if actual != recorded {
            return Err(Error::Integrity {
                archive: archive_rel.clone(),
                reason: format!("header hash {actual} does not match recorded {recorded}"),
            });
        }
        debug!(archive = %archive_rel, "integrity hash verified");
        checked += 1;
    }

    Ok(checked)
}
