use crate::report::{CompatibilityReport, ReportSchema};
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

/// File name of the report inside the output directory.
pub const REPORT_FILE_NAME: &str = "catalog_compatibility.json";

/// Validate `report` and write it as pretty JSON to
/// `<output_dir>/catalog_compatibility.json`, creating the directory if needed.
///
/// The file is staged next to its destination and renamed into place, so an
/// existing report is either fully replaced or left untouched.
pub fn write_report(output_dir: &Path, report: &CompatibilityReport) -> Result<PathBuf> {
    let value = serde_json::to_value(report).context("serializing compatibility report")?;
    ReportSchema::bundled()?.validate(&value)?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating output dir {}", output_dir.display()))?;

    let destination = output_dir.join(REPORT_FILE_NAME);
    let mut staged = NamedTempFile::new_in(output_dir)
        .with_context(|| format!("staging report in {}", output_dir.display()))?;
    // Serialize the typed report, not `value`: the frequency table relies on
    // key order that `serde_json::Map` does not keep.
    serde_json::to_writer_pretty(&mut staged, report)
        .with_context(|| format!("writing {}", destination.display()))?;
    staged.write_all(b"\n")?;
    staged.flush()?;
    staged
        .persist(&destination)
        .with_context(|| format!("persisting {}", destination.display()))?;

    info!(
        path = %destination.display(),
        catalogs = report.catalog_compatibility.len(),
        "wrote compatibility report"
    );
    Ok(destination)
}

/// Read a report previously written by `write_report`.
pub fn read_report(path: &Path) -> Result<CompatibilityReport> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing compatibility report {}", path.display()))
}
