//! Deserializable representation of the catalog export.
//!
//! Only the keys the analysis reads are modelled; everything else in the
//! export is ignored. Missing, `null` or oddly typed values fall back to empty
//! defaults so a sparse record is skipped by the aggregator rather than
//! rejected here.

use crate::export::identity::{CatalogSysId, lenient_string, null_as_empty};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, Deserialize)]
/// Full export as written by the catalog extraction job.
pub struct CatalogExport {
    #[serde(default)]
    pub catalogs: Vec<CatalogRecord>,
    #[serde(default)]
    pub variables: Vec<VariableRecord>,
}

#[derive(Clone, Debug, Default, Deserialize)]
/// One catalog item.
pub struct CatalogRecord {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sys_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
/// One form variable attached to a catalog item.
pub struct VariableRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub catalog_sys_id: Option<String>,
    #[serde(default, deserialize_with = "object_or_none")]
    pub field: Option<FieldInfo>,
}

#[derive(Clone, Debug, Default, Deserialize)]
/// Nested `field` object; `type` is the widget label.
pub struct FieldInfo {
    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    pub field_type: Option<String>,
}

/// `field` values that are not objects carry no type.
fn object_or_none<'de, D>(deserializer: D) -> Result<Option<FieldInfo>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(map) => FieldInfo::deserialize(Value::Object(map))
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

impl VariableRecord {
    pub fn new(catalog_sys_id: Option<&str>, field_type: Option<&str>) -> Self {
        Self {
            catalog_sys_id: catalog_sys_id.map(str::to_string),
            field: Some(FieldInfo {
                field_type: field_type.map(str::to_string),
            }),
        }
    }

    /// Referenced catalog id; empty references count as missing.
    pub fn catalog_id(&self) -> Option<CatalogSysId> {
        self.catalog_sys_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(CatalogSysId::from)
    }

    /// Field-type label; empty labels count as missing.
    pub fn field_type(&self) -> Option<&str> {
        self.field
            .as_ref()?
            .field_type
            .as_deref()
            .filter(|label| !label.is_empty())
    }
}

impl CatalogRecord {
    pub fn new(sys_id: &str, name: &str) -> Self {
        Self {
            sys_id: sys_id.to_string(),
            name: name.to_string(),
        }
    }
}

impl CatalogExport {
    /// Catalog display names keyed by `sys_id`. Later duplicates win.
    pub fn catalog_names(&self) -> BTreeMap<CatalogSysId, &str> {
        self.catalogs
            .iter()
            .map(|catalog| (CatalogSysId::from(catalog.sys_id.as_str()), catalog.name.as_str()))
            .collect()
    }

    /// Field-type labels of every variable that has one, in input order.
    pub fn field_type_labels(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().filter_map(VariableRecord::field_type)
    }
}
