//! Shared library for the catalog compatibility report.
//!
//! The crate loads a catalog export (`catalogs` plus `variables`), classifies
//! each variable's field type against the form card renderer's table, and
//! scores every catalog item. The `catalog-compat` binary wires these pieces
//! together; the public functions here are what it and the tests depend on:
//! path resolution, loading, aggregation, console rendering and report I/O.

use anyhow::{Result, bail};
use std::env;
use std::path::{Path, PathBuf};

pub mod compatibility;
pub mod console;
pub mod export;
pub mod field_types;
pub mod report;

pub use compatibility::{
    Analysis, CatalogCompatibility, FrequencyEntry, Summary, TOP_PROBLEMATIC_LIMIT, Verdict,
    analyze, percentage,
};
pub use console::{render_console_report, render_saved_line};
pub use export::{
    CatalogExport, CatalogRecord, CatalogSysId, DataLoadError, VariableRecord, load_export,
};
pub use field_types::{FieldClass, FieldTypePartition, classify};
pub use report::{
    CompatibilityReport, REPORT_FILE_NAME, ReportSchema, read_report, write_report,
};

/// Export location used when neither `--input` nor `CATALOG_DATA_PATH` is set.
pub const DEFAULT_INPUT_PATH: &str = "scripts/output/catalog_data.json";
/// Report directory used when neither `--output-dir` nor `ANALYSIS_OUTPUT_DIR`
/// is set.
pub const DEFAULT_OUTPUT_DIR: &str = "scripts/analysis_output";

pub const INPUT_PATH_ENV: &str = "CATALOG_DATA_PATH";
pub const OUTPUT_DIR_ENV: &str = "ANALYSIS_OUTPUT_DIR";

/// Resolve the export path: explicit flag, then `CATALOG_DATA_PATH`, then the
/// default relative to the working directory.
pub fn resolve_input_path(cli_override: Option<&Path>) -> Result<PathBuf> {
    resolve_path(cli_override, INPUT_PATH_ENV, DEFAULT_INPUT_PATH)
}

/// Resolve the report directory: explicit flag, then `ANALYSIS_OUTPUT_DIR`,
/// then the default relative to the working directory.
pub fn resolve_output_dir(cli_override: Option<&Path>) -> Result<PathBuf> {
    resolve_path(cli_override, OUTPUT_DIR_ENV, DEFAULT_OUTPUT_DIR)
}

fn resolve_path(cli_override: Option<&Path>, env_key: &str, default: &str) -> Result<PathBuf> {
    if let Some(path) = cli_override {
        if path.as_os_str().is_empty() {
            bail!("path override for {env_key} must not be empty");
        }
        return Ok(path.to_path_buf());
    }

    // An exported-but-blank variable behaves like an unset one.
    match env::var_os(env_key) {
        Some(value) if !value.is_empty() => Ok(PathBuf::from(value)),
        _ => Ok(PathBuf::from(default)),
    }
}
