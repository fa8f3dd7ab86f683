//! Splicing the upgrade section into a scanner SBOM.

use super::generator::{SbomFormat, ScannerTool};
use crate::error::{preview, DiffSbomError, ParseErrorKind, Result};
use crate::model::{UpgradeSection, UPGRADE_KEY};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Parse scanner output, which must be a single JSON object.
pub fn parse_sbom_output(raw: &str) -> Result<Map<String, Value>> {
    let context = "scanner output";
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(DiffSbomError::parse(
            context,
            ParseErrorKind::NotAnObject {
                preview: preview(raw),
            },
        )),
        Err(e) => Err(DiffSbomError::invalid_json(context, &e, raw)),
    }
}

/// Insert or replace the `upgrade` key.
///
/// Every other key keeps its value and position.
pub fn merge_upgrade(sbom: &mut Map<String, Value>, section: &UpgradeSection) -> Result<()> {
    let value = section
        .to_value()
        .map_err(|e| DiffSbomError::validation(format!("serializing upgrade record: {e}")))?;
    sbom.insert(UPGRADE_KEY.to_string(), value);
    Ok(())
}

/// `sbom.<format>_<tool>_with_upgrade.json`
#[must_use]
pub fn output_file_name(format: SbomFormat, tool: ScannerTool) -> String {
    format!("sbom.{format}_{tool}_with_upgrade.json")
}

/// Write the augmented SBOM, pretty-printed, into `dir`.
pub fn write_sbom(
    dir: &Path,
    format: SbomFormat,
    tool: ScannerTool,
    sbom: &Map<String, Value>,
) -> Result<PathBuf> {
    let path = dir.join(output_file_name(format, tool));
    let mut json = serde_json::to_string_pretty(sbom)
        .map_err(|e| DiffSbomError::validation(format!("serializing SBOM: {e}")))?;
    json.push('\n');
    std::fs::write(&path, json).map_err(|e| DiffSbomError::io(&path, e))?;
    Ok(path)
}
