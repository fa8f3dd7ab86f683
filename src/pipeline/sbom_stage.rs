//! Final stage: scan, merge and write the augmented SBOM.

use crate::error::{ErrorContext, Result};
use crate::model::UpgradeSection;
use crate::sbom::{merge_upgrade, parse_sbom_output, write_sbom, SbomGenerator};
use std::path::{Path, PathBuf};

/// Scan `target`, add `section` under `upgrade` and write the result into `out_dir`.
pub fn augment_sbom(
    generator: &SbomGenerator,
    target: &Path,
    section: &UpgradeSection,
    out_dir: &Path,
) -> Result<PathBuf> {
    let raw = generator.generate_sbom(target)?;
    let mut sbom = parse_sbom_output(&raw).with_context(|| {
        format!(
            "{} {} SBOM for {}",
            generator.tool(),
            generator.format(),
            target.display()
        )
    })?;
    merge_upgrade(&mut sbom, section)?;
    let path = write_sbom(out_dir, generator.format(), generator.tool(), &sbom)
        .context("writing augmented SBOM")?;
    tracing::info!("Wrote {}", path.display());
    Ok(path)
}
