// src/universal.rs

//! Universal (dual-architecture) executable verification
//!
//! Runs the bundle's executable once per target architecture and asserts
//! each run reports the architecture it was invoked under. The alternate
//! architecture is forced through the `arch` selection wrapper. Any wrong
//! or missing marker, abnormal exit, or launch failure is a hard failure;
//! architecture mismatches are packaging defects, never flakiness, so
//! nothing here retries.

use crate::bundle;
use crate::error::{Error, Result};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Architecture-selection wrapper executable.
const ARCH_WRAPPER: &str = "arch";

/// A target processor architecture of a universal bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    X64,
    Arm64,
}

impl Arch {
    /// Marker the executable prints to identify this architecture.
    pub fn marker(self) -> &'static str {
        match self {
            Self::X64 => "x64",
            Self::Arm64 => "arm64",
        }
    }

    /// The other half of a dual-architecture bundle.
    pub fn other(self) -> Self {
        match self {
            Self::X64 => Self::Arm64,
            Self::Arm64 => Self::X64,
        }
    }

    /// Flag understood by the `arch` wrapper to force this architecture.
    pub fn wrapper_flag(self) -> &'static str {
        match self {
            Self::X64 => "-x86_64",
            Self::Arm64 => "-arm64",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "x64" | "x86_64" => Some(Self::X64),
            "arm64" | "aarch64" => Some(Self::Arm64),
            _ => None,
        }
    }
}

/// Runs an executable and captures its stdout.
pub trait Spawner {
    fn spawn(&self, program: &Path, args: &[&str]) -> Result<String>;
}

/// Default spawner backed by `std::process::Command`.
///
/// Non-zero exit is an error; stdin is closed so a misbehaving executable
/// cannot hang the harness waiting for input.
#[derive(Debug, Default)]
pub struct SystemSpawner;

impl Spawner for SystemSpawner {
    fn spawn(&self, program: &Path, args: &[&str]) -> Result<String> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| Error::Spawn {
                executable: program.to_path_buf(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(Error::CommandFailed {
                executable: program.to_path_buf(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Assert the bundle executable reports the invoked architecture under both
/// the native invocation and the forced-alternate one.
pub fn ensure_universal(
    spawner: &dyn Spawner,
    bundle_root: &Path,
    executable: &str,
    native: Arch,
) -> Result<()> {
    let exe = bundle::executable_path(bundle_root, executable);
    if !exe.exists() {
        return Err(Error::MissingInput(exe));
    }

    let native_out = spawner.spawn(&exe, &[])?;
    debug!(arch = native.marker(), output = %native_out.trim(), "native invocation");
    if !native_out.contains(native.marker()) {
        return Err(Error::ArchMismatch {
            expected: native.marker().to_string(),
            output: native_out,
        });
    }

    let alternate = native.other();
    let exe_str = exe.to_string_lossy().into_owned();
    let alternate_out = spawner.spawn(
        Path::new(ARCH_WRAPPER),
        &[alternate.wrapper_flag(), &exe_str],
    )?;
    debug!(arch = alternate.marker(), output = %alternate_out.trim(), "forced invocation");
    if !alternate_out.contains(alternate.marker()) {
        return Err(Error::ArchMismatch {
            expected: alternate.marker().to_string(),
            output: alternate_out,
        });
    }

    Ok(())
}
