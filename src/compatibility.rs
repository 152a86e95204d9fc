//! Compatibility accounting between catalog variables and the field-type table.
//!
//! `analyze` makes one pass over the export and returns everything the console
//! and JSON reports need: per-catalog tallies with a verdict, the global
//! frequency table, and summary counts. All state is local to the call.
//!
//! Ordering is deterministic. Problematic catalogs with equal ratios are
//! ranked by catalog id, and field types with equal counts by label.

use crate::export::{CatalogExport, CatalogSysId};
use crate::field_types::{FieldClass, FieldTypePartition, classify};
use anyhow::{Result, bail};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// A catalog is problematic once `unsupported / total` reaches 1/5.
const PROBLEMATIC_NUMERATOR: u64 = 1;
const PROBLEMATIC_DENOMINATOR: u64 = 5;

/// Number of problematic catalogs listed in the console report.
pub const TOP_PROBLEMATIC_LIMIT: usize = 10;

/// Per-catalog compatibility verdict.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Verdict {
    FullyCompatible,
    PartiallyCompatible,
    Problematic,
}

impl Verdict {
    /// Derive the verdict from a catalog's tallies.
    ///
    /// Evaluated in integers so the 0.2 boundary itself is `Problematic`.
    pub fn from_counts(unsupported_vars: u64, total_vars: u64) -> Self {
        if unsupported_vars == 0 {
            Verdict::FullyCompatible
        } else if unsupported_vars * PROBLEMATIC_DENOMINATOR
            < total_vars * PROBLEMATIC_NUMERATOR
        {
            Verdict::PartiallyCompatible
        } else {
            Verdict::Problematic
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::FullyCompatible => "Fully Compatible",
            Verdict::PartiallyCompatible => "Partially Compatible",
            Verdict::Problematic => "Problematic",
        }
    }

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "Fully Compatible" => Ok(Verdict::FullyCompatible),
            "Partially Compatible" => Ok(Verdict::PartiallyCompatible),
            "Problematic" => Ok(Verdict::Problematic),
            other => bail!(
                "unknown compatibility '{other}' (expected Fully Compatible|Partially Compatible|Problematic)"
            ),
        }
    }
}

impl Serialize for Verdict {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Verdict {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Verdict::from_str(&value).map_err(serde::de::Error::custom)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
/// Tallies and verdict for one catalog that has variables.
pub struct CatalogCompatibility {
    #[serde(rename = "compatibility")]
    pub verdict: Verdict,
    pub total_vars: u64,
    pub unsupported_vars: u64,
    pub unsupported_types: BTreeSet<String>,
}

impl CatalogCompatibility {
    fn from_tally(tally: CatalogTally) -> Self {
        Self {
            verdict: Verdict::from_counts(tally.unsupported_vars, tally.total_vars),
            total_vars: tally.total_vars,
            unsupported_vars: tally.unsupported_vars,
            unsupported_types: tally.unsupported_types,
        }
    }

    /// Unsupported share as a percentage; 0 when the catalog has no typed
    /// variables.
    pub fn unsupported_percentage(&self) -> f64 {
        percentage(self.unsupported_vars, self.total_vars)
    }

    /// Compare unsupported ratios exactly by cross-multiplication.
    pub fn cmp_unsupported_ratio(&self, other: &Self) -> Ordering {
        let lhs = u128::from(self.unsupported_vars) * u128::from(other.total_vars);
        let rhs = u128::from(other.unsupported_vars) * u128::from(self.total_vars);
        lhs.cmp(&rhs)
    }
}

#[derive(Default)]
struct CatalogTally {
    total_vars: u64,
    unsupported_vars: u64,
    unsupported_types: BTreeSet<String>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
/// Headline counts shared by the console and JSON reports.
pub struct Summary {
    pub total_catalogs: u64,
    pub catalogs_with_variables: u64,
    pub fully_compatible: u64,
    pub partially_compatible: u64,
    pub problematic: u64,
    pub supported_fields: u64,
    pub container_fields: u64,
    pub unsupported_fields: u64,
    pub total_fields: u64,
}

#[derive(Clone, Debug, Eq, PartialEq)]
/// One row of the global frequency table.
pub struct FrequencyEntry {
    pub label: String,
    pub count: u64,
    pub class: FieldClass,
}

#[derive(Clone, Debug)]
/// Result of a single aggregation pass.
pub struct Analysis {
    pub summary: Summary,
    /// Number of variable records in the export, including skipped ones.
    pub total_variables: u64,
    pub field_types: FieldTypePartition,
    /// Descending by count, then ascending by label.
    pub frequencies: Vec<FrequencyEntry>,
    pub catalogs: BTreeMap<CatalogSysId, CatalogCompatibility>,
}

impl Analysis {
    /// Problematic catalogs, highest unsupported ratio first.
    pub fn problematic_ranking(&self) -> Vec<(&CatalogSysId, &CatalogCompatibility)> {
        let mut ranked: Vec<_> = self
            .catalogs
            .iter()
            .filter(|(_, detail)| detail.verdict == Verdict::Problematic)
            .collect();
        ranked.sort_by(|(lhs_id, lhs), (rhs_id, rhs)| {
            rhs.cmp_unsupported_ratio(lhs)
                .then_with(|| lhs_id.cmp(rhs_id))
        });
        ranked
    }

    /// The first `limit` entries of `problematic_ranking`.
    pub fn top_problematic(&self, limit: usize) -> Vec<(&CatalogSysId, &CatalogCompatibility)> {
        let mut ranked = self.problematic_ranking();
        ranked.truncate(limit);
        ranked
    }
}

/// `part / whole * 100`, or 0 when `whole` is 0.
pub fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

/// Aggregate the export into per-catalog verdicts and global counts.
///
/// Variables without a catalog reference still count toward the global
/// frequency table; variables without a field type count toward neither the
/// table nor any catalog total, but their reference still marks the catalog
/// as having variables.
pub fn analyze(export: &CatalogExport) -> Analysis {
    let mut tallies: BTreeMap<CatalogSysId, CatalogTally> = BTreeMap::new();
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    let mut skipped = 0usize;

    for variable in &export.variables {
        let field_type = variable.field_type();
        if let Some(label) = field_type {
            *counts.entry(label).or_default() += 1;
        }

        let Some(catalog_id) = variable.catalog_id() else {
            skipped += 1;
            continue;
        };
        let tally = tallies.entry(catalog_id).or_default();
        let Some(label) = field_type else {
            skipped += 1;
            continue;
        };

        tally.total_vars += 1;
        if classify(label) == FieldClass::Unsupported {
            tally.unsupported_vars += 1;
            tally.unsupported_types.insert(label.to_string());
        }
    }

    let catalogs: BTreeMap<CatalogSysId, CatalogCompatibility> = tallies
        .into_iter()
        .map(|(id, tally)| (id, CatalogCompatibility::from_tally(tally)))
        .collect();

    let mut frequencies: Vec<FrequencyEntry> = counts
        .iter()
        .map(|(label, count)| FrequencyEntry {
            label: label.to_string(),
            count: *count,
            class: classify(label),
        })
        .collect();
    frequencies.sort_by(|lhs, rhs| {
        rhs.count
            .cmp(&lhs.count)
            .then_with(|| lhs.label.cmp(&rhs.label))
    });

    let field_types = FieldTypePartition::from_labels(export.field_type_labels());
    let summary = summarize(export, &catalogs, &frequencies);

    debug!(
        catalogs_with_variables = summary.catalogs_with_variables,
        total_fields = summary.total_fields,
        distinct_field_types = field_types.all.len(),
        unsupported_field_types = field_types.unsupported.len(),
        skipped_variables = skipped,
        "aggregated catalog variables"
    );

    Analysis {
        summary,
        total_variables: export.variables.len() as u64,
        field_types,
        frequencies,
        catalogs,
    }
}

fn summarize(
    export: &CatalogExport,
    catalogs: &BTreeMap<CatalogSysId, CatalogCompatibility>,
    frequencies: &[FrequencyEntry],
) -> Summary {
    let mut summary = Summary {
        total_catalogs: export.catalogs.len() as u64,
        catalogs_with_variables: catalogs.len() as u64,
        ..Summary::default()
    };

    for detail in catalogs.values() {
        match detail.verdict {
            Verdict::FullyCompatible => summary.fully_compatible += 1,
            Verdict::PartiallyCompatible => summary.partially_compatible += 1,
            Verdict::Problematic => summary.problematic += 1,
        }
    }

    for entry in frequencies {
        summary.total_fields += entry.count;
        match entry.class {
            FieldClass::Supported => summary.supported_fields += entry.count,
            FieldClass::Container => summary.container_fields += entry.count,
            FieldClass::Unsupported => summary.unsupported_fields += entry.count,
        }
    }

    summary
}
