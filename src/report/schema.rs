//! JSON Schema for the written report.
//!
//! The schema ships with the crate under `schema/` and is compiled from the
//! bundled copy by default, so the binary needs no repository layout at
//! runtime. `ReportSchema::load` compiles an alternative copy from disk.

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Repository-relative location of the bundled schema.
pub const REPORT_SCHEMA_PATH: &str = "schema/compatibility_report.schema.json";

const BUNDLED_REPORT_SCHEMA: &str = include_str!("../../schema/compatibility_report.schema.json");

/// Compiled validator for compatibility reports.
pub struct ReportSchema {
    compiled: JSONSchema,
}

impl ReportSchema {
    /// Compile the schema bundled into the binary.
    pub fn bundled() -> Result<Self> {
        let raw: Value =
            serde_json::from_str(BUNDLED_REPORT_SCHEMA).context("parsing bundled report schema")?;
        Self::compile(&raw, REPORT_SCHEMA_PATH)
    }

    /// Compile a schema file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("opening schema {}", path.display()))?;
        let raw: Value = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing schema {}", path.display()))?;
        Self::compile(&raw, &path.display().to_string())
    }

    fn compile(raw: &Value, label: &str) -> Result<Self> {
        let compiled = JSONSchema::compile(raw)
            .map_err(|err| anyhow!("compiling schema {label}: {err}"))?;
        Ok(Self { compiled })
    }

    /// Validate a report value, listing every violation on failure.
    pub fn validate(&self, report: &Value) -> Result<()> {
        if let Err(errors) = self.compiled.validate(report) {
            let details = errors
                .map(|err| err.to_string())
                .collect::<Vec<_>>()
                .join("\n");
            bail!("compatibility report failed schema validation:\n{details}");
        }
        Ok(())
    }
}
