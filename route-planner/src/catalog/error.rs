//! Catalog loading error types.

/// Errors that can occur when loading the station/line catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Catalog file could not be read
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Catalog document was not valid JSON of the expected shape
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// No usable station survived validation
    #[error("catalog contains no valid stations")]
    Empty,
}
