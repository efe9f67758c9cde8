// src/header.rs

//! Packed-archive header access
//!
//! The archive format's body is opaque to this harness; the only thing
//! verification needs is the structured header document describing every
//! packed entry. `HeaderReader` is the seam that supplies it, and
//! `AsarReader` is the default implementation: it decodes the 16-byte size
//! preamble at the front of an `.asar` file and the JSON header document
//! that follows, nothing more.

use crate::error::{Error, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Supplies a packed archive's structured header.
///
/// Implementations must fail on a corrupt or missing archive; a harness
/// that silently tolerates either would mask packaging defects.
pub trait HeaderReader {
    fn read_header(&self, path: &Path) -> Result<Value>;
}

/// Default reader for the asar on-disk layout.
///
/// Layout: four little-endian u32 words (pickle framing), the last of
/// which is the byte length of the UTF-8 JSON header document starting at
/// offset 16. Entry payloads after the header are never touched.
#[derive(Debug, Default)]
pub struct AsarReader;

impl AsarReader {
    /// Read the raw header document text.
    ///
    /// Exposed separately because integrity hashes are computed over these
    /// exact bytes, not over a re-serialization.
    pub fn read_header_text(&self, path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(Error::MissingInput(path.to_path_buf()));
        }
        let bytes = fs::read(path)?;
        if bytes.len() < 16 {
            return Err(Error::Header {
                path: path.to_path_buf(),
                reason: format!("file too short for header preamble ({} bytes)", bytes.len()),
            });
        }

        let json_len = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]) as usize;
        let end = 16usize.checked_add(json_len).filter(|&end| end <= bytes.len());
        let Some(end) = end else {
            return Err(Error::Header {
                path: path.to_path_buf(),
                reason: format!(
                    "header length {} exceeds file size {}",
                    json_len,
                    bytes.len()
                ),
            });
        };

        String::from_utf8(bytes[16..end].to_vec()).map_err(|e| Error::Header {
            path: path.to_path_buf(),
            reason: format!("header is not valid UTF-8: {e}"),
        })
    }
}

impl HeaderReader for AsarReader {
    fn read_header(&self, path: &Path) -> Result<Value> {
        let text = self.read_header_text(path)?;
        serde_json::from_str(&text).map_err(|e| Error::Header {
            path: path.to_path_buf(),
            reason: format!("header is not valid JSON: {e}"),
        })
    }
}
