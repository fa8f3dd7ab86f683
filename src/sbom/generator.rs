//! Base SBOM generation through an external scanner.

use crate::config::SbomConfig;
use crate::error::{preview, DiffSbomError, Result, ToolErrorKind};
use crate::tools::{find_executable, ToolCommand};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Supported SBOM scanners
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScannerTool {
    /// Anchore syft
    #[default]
    Syft,
    /// Aqua trivy
    Trivy,
}

impl ScannerTool {
    /// Parse a scanner name, listing the valid choices on failure.
    pub fn from_name(name: &str) -> Result<Self> {
        <Self as ValueEnum>::from_str(name, true).map_err(|_| {
            DiffSbomError::config(format!(
                "unknown scanner '{name}' (expected one of: {})",
                choices::<Self>()
            ))
        })
    }

    /// Executable name looked up on `PATH`.
    #[must_use]
    pub const fn program(self) -> &'static str {
        match self {
            Self::Syft => "syft",
            Self::Trivy => "trivy",
        }
    }

    const fn install_hint(self) -> &'static str {
        match self {
            Self::Syft => "see https://github.com/anchore/syft#installation",
            Self::Trivy => "see https://trivy.dev/latest/getting-started/installation/",
        }
    }

    /// Scanner arguments producing `format` for `target`, without the program.
    #[must_use]
    pub fn args(self, format: SbomFormat, target: &Path) -> Vec<String> {
        let target = target.to_string_lossy().into_owned();
        match (self, format) {
            (Self::Syft, SbomFormat::Cdx) => {
                vec!["scan".into(), target, "-o".into(), "cyclonedx-json".into()]
            }
            (Self::Syft, SbomFormat::Spdx) => {
                vec!["scan".into(), target, "-o".into(), "spdx-json".into()]
            }
            (Self::Trivy, SbomFormat::Cdx) => vec![
                "fs".into(),
                "--quiet".into(),
                "--format".into(),
                "cyclonedx".into(),
                target,
            ],
            (Self::Trivy, SbomFormat::Spdx) => vec![
                "fs".into(),
                "--quiet".into(),
                "--format".into(),
                "spdx-json".into(),
                target,
            ],
        }
    }
}

impl std::fmt::Display for ScannerTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program())
    }
}

/// SBOM output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SbomFormat {
    /// CycloneDX JSON
    Cdx,
    /// SPDX JSON
    Spdx,
}

impl SbomFormat {
    /// Parse a format name, listing the valid choices on failure.
    pub fn from_name(name: &str) -> Result<Self> {
        <Self as ValueEnum>::from_str(name, true).map_err(|_| {
            DiffSbomError::config(format!(
                "unknown SBOM format '{name}' (expected one of: {})",
                choices::<Self>()
            ))
        })
    }
}

impl std::fmt::Display for SbomFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cdx => write!(f, "cdx"),
            Self::Spdx => write!(f, "spdx"),
        }
    }
}

fn choices<T: ValueEnum>() -> String {
    T::value_variants()
        .iter()
        .filter_map(|v| v.to_possible_value())
        .map(|v| v.get_name().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Scanner invocation for one run.
#[derive(Debug, Clone)]
pub struct SbomGenerator {
    tool: ScannerTool,
    format: SbomFormat,
    program: PathBuf,
    timeout: Duration,
}

impl SbomGenerator {
    #[must_use]
    pub fn new(tool: ScannerTool, format: SbomFormat, config: &SbomConfig) -> Self {
        Self {
            tool,
            format,
            program: config
                .program
                .clone()
                .unwrap_or_else(|| PathBuf::from(tool.program())),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    #[must_use]
    pub const fn tool(&self) -> ScannerTool {
        self.tool
    }

    #[must_use]
    pub const fn format(&self) -> SbomFormat {
        self.format
    }

    /// Resolve the scanner executable, failing with an install hint.
    pub fn check_available(&self) -> Result<PathBuf> {
        find_executable(&self.program).ok_or_else(|| {
            DiffSbomError::config(format!(
                "{} scanner not found at '{}'; install it ({}) or set sbom.program",
                self.tool,
                self.program.display(),
                self.tool.install_hint()
            ))
        })
    }

    /// Scan `target` and return the scanner's raw stdout.
    pub fn generate_sbom(&self, target: &Path) -> Result<String> {
        let program = self.check_available()?;
        let name = self.program.display().to_string();
        let context = format!("generating {} SBOM for {}", self.format, target.display());

        tracing::info!("Generating {} SBOM with {}", self.format, self.tool);
        let result = ToolCommand::new(program, self.timeout)
            .args(self.tool.args(self.format, target))
            .run()
            .map_err(|e| {
                DiffSbomError::tool(
                    &context,
                    ToolErrorKind::Spawn {
                        program: name.clone(),
                        message: e.to_string(),
                    },
                )
            })?;

        if result.timed_out {
            return Err(DiffSbomError::tool(
                context,
                ToolErrorKind::TimedOut {
                    program: name,
                    secs: self.timeout.as_secs(),
                },
            ));
        }
        if !result.success() {
            return Err(DiffSbomError::tool(
                context,
                ToolErrorKind::NonZeroExit {
                    program: name,
                    code: result.exit_code_display(),
                    stderr: preview(&result.stderr),
                },
            ));
        }

        tracing::debug!("Scanner produced {} bytes", result.stdout.len());
        Ok(result.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argv_table() {
        let target = Path::new("/srv/app-1.1");
        assert_eq!(
            ScannerTool::Syft.args(SbomFormat::Cdx, target),
            vec!["scan", "/srv/app-1.1", "-o", "cyclonedx-json"]
        );
        assert_eq!(
            ScannerTool::Syft.args(SbomFormat::Spdx, target),
            vec!["scan", "/srv/app-1.1", "-o", "spdx-json"]
        );
        assert_eq!(
            ScannerTool::Trivy.args(SbomFormat::Cdx, target),
            vec!["fs", "--quiet", "--format", "cyclonedx", "/srv/app-1.1"]
        );
        assert_eq!(
            ScannerTool::Trivy.args(SbomFormat::Spdx, target),
            vec!["fs", "--quiet", "--format", "spdx-json", "/srv/app-1.1"]
        );
    }

    #[test]
    fn test_from_name() {
        assert_eq!(ScannerTool::from_name("syft").expect("syft"), ScannerTool::Syft);
        assert_eq!(ScannerTool::from_name("TRIVY").expect("trivy"), ScannerTool::Trivy);
        assert_eq!(SbomFormat::from_name("spdx").expect("spdx"), SbomFormat::Spdx);
    }

    #[test]
    fn test_unknown_names_list_choices() {
        let err = ScannerTool::from_name("grype").unwrap_err().to_string();
        assert!(err.contains("syft, trivy"), "{err}");
        let err = SbomFormat::from_name("swid").unwrap_err().to_string();
        assert!(err.contains("cdx, spdx"), "{err}");
    }

    #[test]
    fn test_missing_scanner_is_config_error() {
        let config = SbomConfig {
            program: Some(PathBuf::from("diffsbom-no-such-scanner")),
            ..SbomConfig::default()
        };
        let generator = SbomGenerator::new(ScannerTool::Syft, SbomFormat::Cdx, &config);
        match generator.generate_sbom(Path::new(".")) {
            Err(DiffSbomError::Config(msg)) => assert!(msg.contains("install")),
            other => panic!("Expected Config error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        fn fake_scanner(dir: &Path, body: &str, timeout_secs: u64) -> SbomGenerator {
            let path = dir.join("fake-scanner");
            std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
                .expect("chmod");
            let config = SbomConfig {
                program: Some(path),
                timeout_secs,
            };
            SbomGenerator::new(ScannerTool::Syft, SbomFormat::Cdx, &config)
        }

        #[test]
        fn test_scanner_receives_argv() {
            let dir = tempfile::tempdir().expect("create temp dir");
            let generator = fake_scanner(dir.path(), "echo \"$@\"", 5);
            let out = generator.generate_sbom(Path::new("target")).expect("scan");
            assert_eq!(out.trim(), "scan target -o cyclonedx-json");
        }

        #[test]
        fn test_non_zero_exit_is_fatal() {
            let dir = tempfile::tempdir().expect("create temp dir");
            let generator = fake_scanner(dir.path(), "echo 'no such target' >&2\nexit 1", 5);
            match generator.generate_sbom(Path::new("target")) {
                Err(DiffSbomError::Tool {
                    source: ToolErrorKind::NonZeroExit { stderr, .. },
                    ..
                }) => assert_eq!(stderr, "no such target"),
                other => panic!("Expected NonZeroExit, got {other:?}"),
            }
        }

        #[test]
        fn test_timeout_is_fatal() {
            let dir = tempfile::tempdir().expect("create temp dir");
            let generator = fake_scanner(dir.path(), "exec sleep 5", 1);
            assert!(matches!(
                generator.generate_sbom(Path::new("target")),
                Err(DiffSbomError::Tool {
                    source: ToolErrorKind::TimedOut { secs: 1, .. },
                    ..
                })
            ));
        }
    }
}
