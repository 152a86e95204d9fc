//! Human-readable report printed to stdout.
//!
//! Rendering is a pure function of the analysis so tests can compare the text
//! without capturing process output. Percentages use one decimal place and
//! fall back to 0.0 when the denominator is empty.

use crate::compatibility::{Analysis, TOP_PROBLEMATIC_LIMIT, percentage};
use crate::export::CatalogSysId;
use crate::field_types::{container_field_types, supported_field_types};
use std::collections::BTreeMap;
use std::fmt::{self, Write};
use std::path::Path;

const UNKNOWN_CATALOG_NAME: &str = "Unknown";

/// Render every section of the console report.
///
/// `names` maps catalog ids to display names for the problematic ranking.
pub fn render_console_report(analysis: &Analysis, names: &BTreeMap<CatalogSysId, &str>) -> String {
    ConsoleReport { analysis, names }.to_string()
}

struct ConsoleReport<'a, 'n> {
    analysis: &'a Analysis,
    names: &'a BTreeMap<CatalogSysId, &'n str>,
}

impl fmt::Display for ConsoleReport<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_sections(f, self.analysis, self.names)
    }
}

/// Closing line printed once the JSON report is on disk.
pub fn render_saved_line(path: &Path) -> String {
    format!("\nDetailed results saved to {}", path.display())
}

fn write_sections<W: Write>(
    out: &mut W,
    analysis: &Analysis,
    names: &BTreeMap<CatalogSysId, &str>,
) -> fmt::Result {
    let summary = &analysis.summary;

    writeln!(out, "=== ServiceNow Catalog Form Compatibility Analysis ===\n")?;
    writeln!(out, "Total catalog items: {}", summary.total_catalogs)?;
    writeln!(out, "Total form variables: {}", analysis.total_variables)?;
    writeln!(
        out,
        "Catalog items with variables: {} of {} ({:.1}%)\n",
        summary.catalogs_with_variables,
        summary.total_catalogs,
        percentage(summary.catalogs_with_variables, summary.total_catalogs)
    )?;

    let all: Vec<&str> = analysis.field_types.all.iter().map(String::as_str).collect();
    write_label_list(out, &format!("All field types ({})", all.len()), all)?;
    let supported = supported_field_types();
    write_label_list(
        out,
        &format!("Supported types in create_service_catalog_form_card ({})", supported.len()),
        supported,
    )?;
    let container = container_field_types();
    write_label_list(
        out,
        &format!(
            "Container/structural types (handled implicitly) ({})",
            container.len()
        ),
        container,
    )?;
    let unsupported: Vec<&str> = analysis
        .field_types
        .unsupported
        .iter()
        .map(String::as_str)
        .collect();
    write_label_list(
        out,
        &format!("Unsupported types ({})", unsupported.len()),
        unsupported,
    )?;

    let with_vars = summary.catalogs_with_variables;
    writeln!(out, "=== Compatibility Summary ===")?;
    writeln!(
        out,
        "Fully Compatible: {} ({:.1}%)",
        summary.fully_compatible,
        percentage(summary.fully_compatible, with_vars)
    )?;
    writeln!(
        out,
        "Partially Compatible: {} ({:.1}%)",
        summary.partially_compatible,
        percentage(summary.partially_compatible, with_vars)
    )?;
    writeln!(
        out,
        "Problematic: {} ({:.1}%)",
        summary.problematic,
        percentage(summary.problematic, with_vars)
    )?;
    writeln!(out)?;

    if summary.problematic > 0 {
        writeln!(out, "=== Top Problematic Catalogs ===")?;
        for (rank, (catalog_id, detail)) in analysis
            .top_problematic(TOP_PROBLEMATIC_LIMIT)
            .into_iter()
            .enumerate()
        {
            let name = names
                .get(catalog_id)
                .copied()
                .unwrap_or(UNKNOWN_CATALOG_NAME);
            let types: Vec<&str> = detail.unsupported_types.iter().map(String::as_str).collect();
            writeln!(out, "{}. {} (ID: {}):", rank + 1, name, catalog_id)?;
            writeln!(
                out,
                "   - {} of {} variables unsupported ({:.1}%)",
                detail.unsupported_vars,
                detail.total_vars,
                detail.unsupported_percentage()
            )?;
            writeln!(out, "   - Unsupported types: {}", types.join(", "))?;
            writeln!(out)?;
        }
    }

    writeln!(out, "=== Field Type Frequencies ===")?;
    for entry in &analysis.frequencies {
        writeln!(
            out,
            "{}: {} ({:.1}%) - {}",
            entry.label,
            entry.count,
            percentage(entry.count, summary.total_fields),
            entry.class.marker()
        )?;
    }

    let total = summary.total_fields;
    writeln!(out, "\n=== Overall Compatibility ===")?;
    writeln!(
        out,
        "Directly Supported: {} of {} ({:.1}%)",
        summary.supported_fields,
        total,
        percentage(summary.supported_fields, total)
    )?;
    writeln!(
        out,
        "Container/Structural: {} of {} ({:.1}%)",
        summary.container_fields,
        total,
        percentage(summary.container_fields, total)
    )?;
    writeln!(
        out,
        "Unsupported: {} of {} ({:.1}%)",
        summary.unsupported_fields,
        total,
        percentage(summary.unsupported_fields, total)
    )?;
    Ok(())
}

fn write_label_list<W: Write>(out: &mut W, heading: &str, mut labels: Vec<&str>) -> fmt::Result {
    labels.sort_unstable();
    writeln!(out, "{heading}:")?;
    writeln!(out, "{}", labels.join(", "))?;
    writeln!(out)
}
