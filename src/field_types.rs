//! Field-type classification for catalog form variables.
//!
//! `FIELD_TYPE_TABLE` is the single source of truth: every label the form card
//! renderer handles appears exactly once with its class. The supported and
//! container lists are projections of the table, and any label missing from it
//! is unsupported. Matching is exact (case and whitespace sensitive).

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

/// How the form card renderer treats a field type.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum FieldClass {
    /// Rendered directly as an input component.
    Supported,
    /// Structural markers, macros and attachment handlers that need no
    /// standalone component.
    Container,
    Unsupported,
}

/// Known labels in declaration order.
///
/// The numeric labels are widgets the export leaves unnamed: `24` and `32`
/// behave as spacers/formatters, `33` as an attachment handler.
pub const FIELD_TYPE_TABLE: &[(&str, FieldClass)] = &[
    ("Single Line Text", FieldClass::Supported),
    ("Multi Line Text", FieldClass::Supported),
    ("Date", FieldClass::Supported),
    ("Select Box", FieldClass::Supported),
    ("Multiple Choice", FieldClass::Supported),
    ("Lookup Select Box", FieldClass::Supported),
    ("Reference", FieldClass::Supported),
    ("List Collector", FieldClass::Supported),
    ("Container Start", FieldClass::Container),
    ("Container End", FieldClass::Container),
    ("Macro", FieldClass::Container),
    ("24", FieldClass::Container),
    ("32", FieldClass::Container),
    ("33", FieldClass::Container),
];

impl FieldClass {
    /// Status marker used in the frequency table of the console report.
    pub fn marker(self) -> &'static str {
        match self {
            FieldClass::Supported => "✅ Supported",
            FieldClass::Container => "⚙️ Container",
            FieldClass::Unsupported => "❌ Unsupported",
        }
    }
}

fn table_index() -> &'static BTreeMap<&'static str, FieldClass> {
    static INDEX: OnceLock<BTreeMap<&'static str, FieldClass>> = OnceLock::new();
    INDEX.get_or_init(|| FIELD_TYPE_TABLE.iter().copied().collect())
}

/// Classify a single field-type label.
pub fn classify(label: &str) -> FieldClass {
    table_index()
        .get(label)
        .copied()
        .unwrap_or(FieldClass::Unsupported)
}

/// Labels of one class, in table order.
pub fn labels_of(class: FieldClass) -> Vec<&'static str> {
    FIELD_TYPE_TABLE
        .iter()
        .filter(|(_, known)| *known == class)
        .map(|(label, _)| *label)
        .collect()
}

pub fn supported_field_types() -> Vec<&'static str> {
    labels_of(FieldClass::Supported)
}

pub fn container_field_types() -> Vec<&'static str> {
    labels_of(FieldClass::Container)
}

/// Distinct observed labels split by class.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FieldTypePartition {
    pub all: BTreeSet<String>,
    pub supported: BTreeSet<String>,
    pub container: BTreeSet<String>,
    pub unsupported: BTreeSet<String>,
}

impl FieldTypePartition {
    /// Partition the distinct labels yielded by `labels`.
    ///
    /// Duplicates and input order have no effect on the result.
    pub fn from_labels<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut partition = Self::default();
        for label in labels {
            if !partition.all.insert(label.to_string()) {
                continue;
            }
            let bucket = match classify(label) {
                FieldClass::Supported => &mut partition.supported,
                FieldClass::Container => &mut partition.container,
                FieldClass::Unsupported => &mut partition.unsupported,
            };
            bucket.insert(label.to_string());
        }
        partition
    }
}
