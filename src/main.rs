//! diffsbom: add source-level upgrade information to an SBOM
//!
//! Compares two versions of an artifact and merges the result into an SBOM
//! generated for the new version.

use anyhow::{Context, Result};
use clap::Parser;
use diffsbom::{
    cli,
    config::{self, AppConfig, RunConfig, RunMode},
    pipeline::exit_codes,
    sbom::{SbomFormat, ScannerTool},
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "diffsbom")]
#[command(version)]
#[command(about = "Augment an SBOM with the source changes between two versions", long_about = None)]
#[command(after_help = "ARTIFACTS (written to --output-dir):
    diff_output.txt                     raw structural diffs (appended)
    filtered_diff.txt                   headers and changed lines only
    added/removed/modified_functions.txt
    sbom.<format>_<scanner>_with_upgrade.json

EXAMPLES:
    # Compare two source trees, CycloneDX via syft
    diffsbom diff cdx ./app-1.0 ./app-1.1

    # SPDX via trivy, upgrade record taken from ./version_upgrade.txt
    diffsbom user spdx ./app-1.0 ./app-1.1 trivy")]
struct Cli {
    /// diff: compare OLD and NEW; user: read version_upgrade.txt next to NEW
    mode: RunMode,

    /// SBOM format
    format: SbomFormat,

    /// Old version (file or directory)
    old: PathBuf,

    /// New version (same kind as OLD); also the scan target
    new: PathBuf,

    /// Scanner producing the base SBOM
    #[arg(default_value = "syft")]
    scanner: ScannerTool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Only print warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to configuration file
    #[arg(long, env = "DIFFSBOM_CONFIG")]
    config: Option<PathBuf>,

    /// Structural diff output comes from compressed archives
    #[arg(long)]
    compressed: bool,

    /// Script computing the added/removed/modified sets for directories
    #[arg(long)]
    tree_diff_script: Option<PathBuf>,

    /// Directory receiving all artifacts
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Per-file structural diff timeout in seconds
    #[arg(long)]
    diff_timeout: Option<u64>,

    /// SBOM scanner timeout in seconds
    #[arg(long)]
    scan_timeout: Option<u64>,
}

impl Cli {
    /// Apply command-line overrides on top of file configuration.
    fn apply_overrides(&self, app: &mut AppConfig) {
        if self.compressed {
            app.extract.compressed = true;
        }
        if let Some(script) = &self.tree_diff_script {
            app.tree_diff.script = Some(script.clone());
        }
        if let Some(dir) = &self.output_dir {
            app.output.dir = dir.clone();
        }
        if let Some(secs) = self.diff_timeout {
            app.structural_diff.timeout_secs = secs;
        }
        if let Some(secs) = self.scan_timeout {
            app.sbom.timeout_secs = secs;
        }
    }
}

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version are not failures
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(exit_codes::ERROR);
        }
    };

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let (mut app, loaded_from) =
        config::load_or_default(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(path) = loaded_from {
        tracing::debug!("Loaded configuration from {}", path.display());
    }
    cli.apply_overrides(&mut app);

    let path = cli::run_upgrade(RunConfig {
        mode: cli.mode,
        format: cli.format,
        scanner: cli.scanner,
        old: cli.old,
        new: cli.new,
        app,
    })?;

    println!("{}", path.display());
    Ok(())
}
