// src/error.rs

//! Crate-wide error type for the verification harness.
//!
//! Missing inputs and spawn failures are hard errors (a harness must not
//! mask packaging defects); snapshot mismatches are deliberately *not*
//! errors and travel through `verify::VerifyReport` instead so independent
//! checks in the same pass still run.

use std::path::PathBuf;
use thiserror::Error;

/// Verification harness errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("missing input: {0}")]
    MissingInput(PathBuf),

    #[error("malformed archive header in {path}: {reason}")]
    Header { path: PathBuf, reason: String },

    #[error("property list parse error: {0}")]
    Plist(String),

    #[error("missing integrity section `{0}` in property list")]
    MissingIntegrity(&'static str),

    #[error("integrity mismatch for {archive}: {reason}")]
    Integrity { archive: String, reason: String },

    #[error("failed to spawn {executable}: {source}")]
    Spawn {
        executable: PathBuf,
        source: std::io::Error,
    },

    #[error("{executable} exited with {status}: {stderr}")]
    CommandFailed {
        executable: PathBuf,
        status: String,
        stderr: String,
    },

    #[error("architecture check failed: expected `{expected}` marker in output, got: {output}")]
    ArchMismatch { expected: String, output: String },

    #[error("snapshot store error for key `{key}`: {reason}")]
    Snapshot { key: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("artifact download failed: {0}")]
    Download(String),

    #[error("zip extraction failed: {0}")]
    Zip(String),
}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
