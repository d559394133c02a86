//! Up to `k` distinct routes between two stations.
//!
//! The three criteria searches run first. If they yield fewer than `k`
//! distinct paths, each found path is perturbed one intermediate station at
//! a time: the hops into and out of that station are masked and the fastest
//! search is rerun.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use super::result::RouteResultBuilder;
use super::search::{EdgeMask, PathFinder, SearchFailure, SearchVariant};
use crate::domain::{RouteKind, RouteResult, StationId, path_signature};
use crate::graph::GraphError;

/// Multi-criteria route search.
pub struct AlternativeRouteSearch<'a> {
    finder: PathFinder<'a>,
    builder: RouteResultBuilder<'a>,
    departure: NaiveDateTime,
}

impl<'a> AlternativeRouteSearch<'a> {
    pub fn new(finder: PathFinder<'a>, builder: RouteResultBuilder<'a>, departure: NaiveDateTime) -> Self {
        Self {
            finder,
            builder,
            departure,
        }
    }

    /// Find at most `k` routes from `start` to `end`.
    ///
    /// Results are ordered fastest, least-transfer, least-crowded, then
    /// alternatives in discovery order, with no two sharing a station
    /// sequence. Unknown stations give an empty list.
    ///
    /// # Errors
    ///
    /// Returns `Err` only if a search state cannot be resolved against the
    /// graph it came from.
    pub fn find_routes(&self, start: &StationId, end: &StationId, k: usize) -> Result<Vec<RouteResult>, GraphError> {
        let graph = self.finder.graph();
        for station in [start, end] {
            if !graph.contains(station) {
                warn!(station = %station, "Unknown station in route request");
                return Ok(Vec::new());
            }
        }

        let mut routes: Vec<RouteResult> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let no_mask = EdgeMask::new();

        for variant in SearchVariant::ALL {
            if routes.len() >= k {
                break;
            }
            match self.finder.find(variant, start, end, &no_mask) {
                Ok(state) => {
                    if seen.insert(path_signature(&state.path)) {
                        routes.push(self.builder.build(&state, self.departure, variant.kind())?);
                    } else {
                        debug!(%variant, "Route duplicates an earlier result");
                    }
                }
                Err(SearchFailure::StationNotFound(station)) => {
                    warn!(station = %station, "Unknown station in route request");
                    return Ok(Vec::new());
                }
                // Already logged by the finder
                Err(_) => {}
            }
        }

        if routes.len() < k && !routes.is_empty() {
            let base: Vec<Vec<StationId>> = routes.iter().map(|r| r.station_ids.clone()).collect();
            'outer: for path in &base {
                for window in path.windows(3) {
                    let [prev, via, next] = window else {
                        continue;
                    };
                    let mut mask = EdgeMask::new();
                    mask.hide(graph.edges_between(prev, via));
                    mask.hide(graph.edges_between(via, next));

                    let Ok(state) = self.finder.find(SearchVariant::Fastest, start, end, &mask) else {
                        continue;
                    };
                    if seen.insert(path_signature(&state.path)) {
                        debug!(avoiding = %via, "Found alternative route");
                        routes.push(self.builder.build(&state, self.departure, RouteKind::Alternative)?);
                        if routes.len() >= k {
                            break 'outer;
                        }
                    }
                }
            }
        }

        debug!(from = %start, to = %end, found = routes.len(), requested = k, "Route search complete");
        Ok(routes)
    }
}
