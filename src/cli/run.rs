//! Upgrade command handler.

use crate::config::{RunConfig, RunMode, Validatable};
use crate::error::DiffSbomError;
use crate::model::UpgradeSection;
use crate::pipeline::{
    augment_sbom, compute_upgrade, load_user_upgrade, validate_input_shape, validate_target,
};
use crate::sbom::SbomGenerator;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Run one upgrade pipeline and return the path of the augmented SBOM.
///
/// Every check that can fail without side effects (configuration, input
/// shape, scanner availability) runs before any artifact is written.
#[allow(clippy::needless_pass_by_value)]
pub fn run_upgrade(config: RunConfig) -> Result<PathBuf> {
    let app = &config.app;
    let errors = app.validate();
    if !errors.is_empty() {
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        return Err(DiffSbomError::config(messages.join("; ")).into());
    }

    let generator = SbomGenerator::new(config.scanner, config.format, &app.sbom);

    let section: UpgradeSection = match config.mode {
        RunMode::Diff => {
            let shape = validate_input_shape(&config.old, &config.new)?;
            generator.check_available()?;

            let outcome = compute_upgrade(&config.old, &config.new, shape, app)
                .context("Failed to compute upgrade record")?;
            let changes = &outcome.record.file_changes;
            tracing::info!(
                "Upgrade: {} new, {} deleted, {} modified files; {} functions changed",
                changes.new_files.len(),
                changes.deleted_files.len(),
                changes.modified_files.len(),
                outcome.functions.len()
            );
            outcome.record.into()
        }
        RunMode::User => {
            validate_target(&config.new)?;
            generator.check_available()?;
            load_user_upgrade(&config.new).context("Failed to load user upgrade record")?
        }
    };

    let path = augment_sbom(&generator, &config.new, &section, &app.output.dir)
        .context("Failed to produce augmented SBOM")?;
    Ok(path)
}
