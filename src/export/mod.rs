//! Catalog export wiring.
//!
//! This module wraps the JSON export produced by the catalog extraction job
//! (`catalogs` plus `variables`) so the aggregator works on typed records.
//! Loading failures surface as `DataLoadError`; sparse records are tolerated
//! and filtered later.

pub mod identity;
pub mod load;
pub mod model;

pub use identity::CatalogSysId;
pub use load::{DataLoadError, load_export};
pub use model::{CatalogExport, CatalogRecord, FieldInfo, VariableRecord};
