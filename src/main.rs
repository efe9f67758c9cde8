// src/main.rs

use anyhow::{Context, Result, bail};
use asar_verify::{
    AsarReader, BundleOptions, DirSnapshots, SystemSpawner, UniversalCheck, Verifier,
    remove_unstable_properties,
};
use asar_verify::{Arch, HeaderReader};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
use cli::{Cli, Commands};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Verify {
            bundle,
            snapshots,
            no_integrity,
            recompute_hashes,
            universal,
            executable,
        } => {
            let universal = universal
                .map(|arch| {
                    Arch::parse(&arch)
                        .map(|native| UniversalCheck {
                            executable: executable.clone(),
                            native,
                        })
                        .with_context(|| format!("unknown architecture `{arch}`"))
                })
                .transpose()?;

            let options = BundleOptions {
                integrity: !no_integrity,
                recompute_hashes,
                universal,
            };

            let reader = AsarReader;
            let spawner = SystemSpawner;
            let mut store = DirSnapshots::new(&snapshots);
            let mut verifier = Verifier::new(&reader, &spawner, &mut store);
            let report = verifier
                .verify_bundle(&bundle, &options)
                .with_context(|| format!("verifying {}", bundle.display()))?;

            for key in &report.recorded {
                println!("recorded  {key}");
            }
            for key in &report.matched {
                println!("matched   {key}");
            }
            for mismatch in &report.mismatches {
                println!("MISMATCH  {}", mismatch.key);
                for line in mismatch.diff.lines() {
                    println!("    {line}");
                }
            }

            if !report.is_clean() {
                bail!("{} snapshot mismatch(es)", report.mismatches.len());
            }
            Ok(())
        }
        Commands::Header { archive } => {
            let header = AsarReader
                .read_header(&archive)
                .with_context(|| format!("reading {}", archive.display()))?;
            let normalized = remove_unstable_properties(&header);
            println!("{}", serde_json::to_string_pretty(&normalized)?);
            Ok(())
        }
    }
}
