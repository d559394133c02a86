//! Catalog sources.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::CatalogError;
use super::raw::{Catalog, RawCatalog};

/// Supplies the station/line reference data.
///
/// Consumed once per graph build (first search or explicit reload).
pub trait CatalogSource: Send + Sync {
    fn load(&self) -> Result<Catalog, CatalogError>;
}

/// An in-memory catalog is its own source.
impl CatalogSource for Catalog {
    fn load(&self) -> Result<Catalog, CatalogError> {
        Ok(self.clone())
    }
}

/// Reads the catalog from a JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonCatalogFile {
    path: PathBuf,
}

impl JsonCatalogFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the catalog file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse a catalog document held in memory.
    pub fn parse(contents: &str) -> Result<Catalog, CatalogError> {
        let raw: RawCatalog = serde_json::from_str(contents).map_err(|e| CatalogError::Json {
            message: e.to_string(),
        })?;

        let catalog = Catalog::from_raw(raw);
        if catalog.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(catalog)
    }
}

impl CatalogSource for JsonCatalogFile {
    fn load(&self) -> Result<Catalog, CatalogError> {
        let contents = std::fs::read_to_string(&self.path).map_err(|e| CatalogError::Io {
            path: self.path.display().to_string(),
            source: e,
        })?;

        let catalog = Self::parse(&contents)?;
        debug!(
            path = %self.path.display(),
            stations = catalog.stations.len(),
            lines = catalog.lines.len(),
            "Loaded catalog"
        );
        Ok(catalog)
    }
}
