// src/lib.rs

//! Verification harness for packed application bundles
//!
//! Asserts that a bundle produced by an external packaging pipeline has
//! the expected on-disk shape after packing, unpacking, and (optionally)
//! merging two architecture-specific builds into one universal bundle.
//!
//! # Architecture
//!
//! - Deterministic walking: directories flatten into a stable, order-defined
//!   listing; text entries carry their content into the snapshot
//! - Header reconciliation: packed-archive headers are stripped of
//!   run-dependent fields and checked beside their `.unpacked` companions
//! - Narrow collaborator seams: header reading, process spawning, snapshot
//!   storage, and artifact fetching are traits with injectable fakes
//! - Fixture synthesis: symlink-through-directory-symlink trees and cached
//!   template bundles feed the pipeline under test

pub mod bundle;
mod error;
pub mod fixture;
pub mod header;
pub mod integrity;
pub mod paths;
pub mod plist;
pub mod snapshot;
pub mod strip;
pub mod template;
pub mod universal;
pub mod verify;
pub mod walk;

pub use error::{Error, Result};
pub use fixture::{FixtureBuilder, FixtureTree};
pub use header::{AsarReader, HeaderReader};
pub use snapshot::{DirSnapshots, Outcome, SnapshotStore};
pub use strip::remove_unstable_properties;
pub use template::{ArtifactRequest, ArtifactSource, HttpArtifactSource, template_bundle};
pub use universal::{Arch, Spawner, SystemSpawner, ensure_universal};
pub use verify::{BundleOptions, Mismatch, UniversalCheck, Verifier, VerifyReport};
pub use walk::TreeEntry;
