//! Multi-criteria transit route planner.
//!
//! Answers: "how do I get from this station to that one?" with the fastest
//! route, the route with fewest transfers, the least crowded route and a few
//! distinct alternatives.
//!
//! ```no_run
//! use route_planner::catalog::JsonCatalogFile;
//! use route_planner::domain::StationId;
//! use route_planner::engine::{RouteEngine, RouteOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = RouteEngine::new(JsonCatalogFile::new("catalog.json"));
//! let from = StationId::parse("S1")?;
//! let to = StationId::parse("S4")?;
//! for route in engine.find_routes(&from, &to, None, &RouteOptions::default())? {
//!     println!("{}: {} min, {} transfers", route.kind, route.total_travel_minutes, route.transfers);
//! }
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod congestion;
pub mod domain;
pub mod engine;
pub mod graph;
pub mod planner;
