//! JSON compatibility report written at the end of a run.
//!
//! `CompatibilityReport` is the on-disk contract: `summary`, `field_types`,
//! `field_frequencies` and `catalog_compatibility`, in that order. It is built
//! from an `Analysis`, validated against the bundled schema, and can be read
//! back into the same type.

pub mod schema;
pub mod write;

pub use schema::{REPORT_SCHEMA_PATH, ReportSchema};
pub use write::{REPORT_FILE_NAME, read_report, write_report};

use crate::compatibility::{Analysis, CatalogCompatibility, Summary};
use crate::export::CatalogSysId;
use crate::field_types::{container_field_types, supported_field_types};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityReport {
    pub summary: Summary,
    pub field_types: FieldTypeLists,
    pub field_frequencies: FieldFrequencies,
    pub catalog_compatibility: BTreeMap<CatalogSysId, CatalogCompatibility>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// Observed labels (`all`, `unsupported`, sorted) next to the static
/// `supported` and `container` lists (table order).
pub struct FieldTypeLists {
    pub all: Vec<String>,
    pub supported: Vec<String>,
    pub container: Vec<String>,
    pub unsupported: Vec<String>,
}

/// Label → count pairs kept in descending-frequency order.
///
/// Serialized as a JSON object whose keys follow the ranking, so readers that
/// preserve insertion order see the same table as the console.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldFrequencies(pub Vec<(String, u64)>);

impl FieldFrequencies {
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(label, count)| (label.as_str(), *count))
    }
}

impl Serialize for FieldFrequencies {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, count) in &self.0 {
            map.serialize_entry(label, count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldFrequencies {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = FieldFrequencies;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping field types to counts")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((label, count)) = access.next_entry::<String, u64>()? {
                    entries.push((label, count));
                }
                Ok(FieldFrequencies(entries))
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

impl CompatibilityReport {
    pub fn from_analysis(analysis: &Analysis) -> Self {
        let owned = |labels: Vec<&str>| -> Vec<String> {
            labels.into_iter().map(str::to_string).collect()
        };
        Self {
            summary: analysis.summary.clone(),
            field_types: FieldTypeLists {
                all: analysis.field_types.all.iter().cloned().collect(),
                supported: owned(supported_field_types()),
                container: owned(container_field_types()),
                unsupported: analysis.field_types.unsupported.iter().cloned().collect(),
            },
            field_frequencies: FieldFrequencies(
                analysis
                    .frequencies
                    .iter()
                    .map(|entry| (entry.label.clone(), entry.count))
                    .collect(),
            ),
            catalog_compatibility: analysis.catalogs.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compatibility::analyze;
    use crate::export::{CatalogExport, CatalogRecord, VariableRecord};

    fn sample_analysis() -> Analysis {
        let mut variables = vec![VariableRecord::new(Some("b"), Some("Widget")); 3];
        variables.extend(vec![VariableRecord::new(Some("a"), Some("Date")); 5]);
        variables.push(VariableRecord::new(Some("a"), Some("Macro")));
        analyze(&CatalogExport {
            catalogs: vec![CatalogRecord::new("a", "Laptop"), CatalogRecord::new("b", "Badge")],
            variables,
        })
    }

    #[test]
    fn frequencies_serialize_in_ranked_order() {
        let report = CompatibilityReport::from_analysis(&sample_analysis());
        let json = serde_json::to_string(&report.field_frequencies).unwrap();
        assert_eq!(json, r#"{"Date":5,"Widget":3,"Macro":1}"#);

        let back: FieldFrequencies = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report.field_frequencies);
        assert_eq!(back.iter().map(|(_, count)| count).sum::<u64>(), 9);
    }

    #[test]
    fn report_keys_follow_contract_order() {
        let report = CompatibilityReport::from_analysis(&sample_analysis());
        let json = serde_json::to_string(&report).unwrap();
        let positions: Vec<usize> = [
            "\"summary\"",
            "\"field_types\"",
            "\"field_frequencies\"",
            "\"catalog_compatibility\"",
        ]
        .iter()
        .map(|key| json.find(key).expect("key present"))
        .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn field_type_lists_mix_static_and_observed() {
        let report = CompatibilityReport::from_analysis(&sample_analysis());
        assert_eq!(report.field_types.all, vec!["Date", "Macro", "Widget"]);
        assert_eq!(report.field_types.unsupported, vec!["Widget"]);
        assert_eq!(report.field_types.supported.len(), 8);
        assert_eq!(report.field_types.supported[0], "Single Line Text");
        assert_eq!(report.field_types.container.len(), 6);
    }

    #[test]
    fn catalog_detail_uses_compatibility_label() {
        let report = CompatibilityReport::from_analysis(&sample_analysis());
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(
            value
                .pointer("/catalog_compatibility/b/compatibility")
                .and_then(|v| v.as_str()),
            Some("Problematic")
        );
        assert_eq!(
            value
                .pointer("/catalog_compatibility/b/unsupported_types/0")
                .and_then(|v| v.as_str()),
            Some("Widget")
        );
        assert_eq!(
            value
                .pointer("/catalog_compatibility/a/compatibility")
                .and_then(|v| v.as_str()),
            Some("Fully Compatible")
        );
    }
}
