// src/cli.rs
//! CLI definitions for the bundle verification harness
//!
//! Command implementations live in `main.rs`; this module only declares
//! the clap surface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "asar-verify")]
#[command(version)]
#[command(about = "Verify the on-disk shape of a packed application bundle", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bundle-wide verification pass against a bundle on disk
    Verify {
        /// Path to the bundle root (the `.app` directory)
        bundle: PathBuf,

        /// Directory holding snapshot baselines
        #[arg(short, long, default_value = "snapshots")]
        snapshots: PathBuf,

        /// Skip the integrity-section comparison
        #[arg(long)]
        no_integrity: bool,

        /// Recompute archive header hashes against the integrity section
        #[arg(long)]
        recompute_hashes: bool,

        /// Run the universal check with this native architecture (x64 or arm64)
        #[arg(long)]
        universal: Option<String>,

        /// Executable name under Contents/MacOS for the universal check
        #[arg(long, default_value = "Electron")]
        executable: String,
    },

    /// Print a packed archive's normalized header
    Header {
        /// Path to the archive
        archive: PathBuf,
    },
}
