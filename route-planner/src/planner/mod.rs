//! Multi-criteria route planner.
//!
//! Answers: "what are the best few ways from this station to that one?"
//!
//! A single best-first search ([`PathFinder`]) runs once per criterion
//! (fastest, fewest transfers, least crowded). [`AlternativeRouteSearch`]
//! combines the results, dedupes them by station sequence and tops up the
//! list with detours until the requested number of routes is reached.

mod alternatives;
mod config;
mod cost;
mod fare;
mod result;
mod search;


pub use alternatives::AlternativeRouteSearch;
pub use config::{CongestionWeighting, SearchConfig};
pub use cost::EdgeCostModel;
pub use fare::FareConfig;
pub use result::RouteResultBuilder;
pub use search::{EdgeMask, PathFinder, SearchFailure, SearchState, SearchVariant};
