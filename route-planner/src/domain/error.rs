//! Domain error types.
//!
//! These errors represent validation failures in the domain layer. They are
//! distinct from catalog I/O and congestion API errors.

/// Domain-level errors for validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// An identifier was empty after trimming
    #[error("{0} id must not be empty")]
    EmptyId(&'static str),

    /// A station or line name was empty
    #[error("{0} name must not be empty")]
    EmptyName(&'static str),

    /// Congestion level outside 1..=4
    #[error("invalid congestion level: {0} (expected 1-4)")]
    InvalidCongestionLevel(u8),

    /// Coordinates outside the WGS84 range or not finite
    #[error("invalid coordinates: lat {lat}, lng {lng}")]
    InvalidCoordinates { lat: f64, lng: f64 },
}
