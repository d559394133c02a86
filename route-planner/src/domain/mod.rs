//! Domain types for the route planner.
//!
//! This module contains the core domain model types that represent
//! validated network data and finished routes. All types enforce their
//! invariants at construction time, so code that receives these types can
//! trust their validity.

mod congestion;
mod error;
mod ids;
mod route;
mod station;

pub use congestion::CongestionLevel;
pub use error::DomainError;
pub use ids::{LineId, StationId};
pub use route::{RouteKind, RouteResult, Segment, path_signature};
pub use station::{Branch, Coordinates, Line, Station};
