//! Reading the catalog export from disk.

use crate::export::model::CatalogExport;
use serde_json::error::Category;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Why the catalog export could not be loaded. Always fatal for a run.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    #[error("catalog export not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("unable to read catalog export {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("catalog export {} is not valid JSON", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("catalog export {} does not match the expected shape", path.display())]
    UnexpectedShape {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read and parse the export at `path`.
pub fn load_export(path: &Path) -> Result<CatalogExport, DataLoadError> {
    let data = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            DataLoadError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            DataLoadError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let export: CatalogExport = serde_json::from_str(&data).map_err(|source| {
        let path = path.to_path_buf();
        match source.classify() {
            Category::Data => DataLoadError::UnexpectedShape { path, source },
            _ => DataLoadError::Malformed { path, source },
        }
    })?;

    debug!(
        path = %path.display(),
        catalogs = export.catalogs.len(),
        variables = export.variables.len(),
        "loaded catalog export"
    );
    Ok(export)
}
