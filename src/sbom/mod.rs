//! SBOM generation and augmentation.
//!
//! A scanner ([`ScannerTool`]) produces the base document for the new
//! version; the upgrade section is then merged in under the `upgrade` key and
//! the result written next to the other artifacts. The document itself is
//! kept as an opaque JSON object with its key order intact.

mod generator;
mod merge;

pub use generator::{SbomFormat, SbomGenerator, ScannerTool};
pub use merge::{merge_upgrade, output_file_name, parse_sbom_output, write_sbom};
