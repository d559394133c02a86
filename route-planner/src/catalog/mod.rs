//! Station and line reference catalog.
//!
//! Loads the network's reference data (stations, per-line station sequences,
//! branches) and validates it into the typed domain model consumed by the
//! graph builder.

mod error;
mod raw;
mod source;

pub use error::CatalogError;
pub use raw::{Catalog, RawBranch, RawCatalog, RawLine, RawStation};
pub use source::{CatalogSource, JsonCatalogFile};
