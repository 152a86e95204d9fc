use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Catalog item identifier (`sys_id`) as it appears in the export.
///
/// Variables reference catalogs through this id; it is also the key of the
/// per-catalog map in the written report.
#[derive(Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogSysId(pub String);

impl CatalogSysId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CatalogSysId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CatalogSysId {
    fn from(value: &str) -> Self {
        CatalogSysId(value.to_string())
    }
}

/// Deserialize a loosely typed scalar as an optional string.
///
/// Numbers and booleans keep their JSON spelling; `null`, arrays and objects
/// count as missing. One odd record never rejects the whole export.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

/// Like `lenient_string`, with missing values read as an empty string.
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}
