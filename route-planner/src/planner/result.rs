//! Turning a terminal search state into a [`RouteResult`].

use chrono::NaiveDateTime;

use super::config::CongestionWeighting;
use super::cost::EdgeCostModel;
use super::fare::FareConfig;
use super::search::SearchState;
use crate::congestion::CongestionProvider;
use crate::domain::{RouteKind, RouteResult, Segment};
use crate::graph::{Graph, GraphError};

/// Builds finished routes from search states.
#[derive(Clone, Copy)]
pub struct RouteResultBuilder<'a> {
    graph: &'a Graph,
    fare: &'a FareConfig,
    congestion: Option<&'a dyn CongestionProvider>,
}

impl<'a> RouteResultBuilder<'a> {
    pub fn new(
        graph: &'a Graph,
        fare: &'a FareConfig,
        congestion: Option<&'a dyn CongestionProvider>,
    ) -> Self {
        Self {
            graph,
            fare,
            congestion,
        }
    }

    /// Build the route for `state`, departing at `departure`.
    ///
    /// # Errors
    ///
    /// Returns `Err` only if the state references an edge that is not in the
    /// graph, i.e. it came from a different graph.
    pub fn build(
        &self,
        state: &SearchState,
        departure: NaiveDateTime,
        kind: RouteKind,
    ) -> Result<RouteResult, GraphError> {
        let levels = EdgeCostModel::new(CongestionWeighting::Live, self.congestion, departure);

        let mut segments = Vec::with_capacity(state.edges.len());
        let mut elapsed = 0.0;
        for &edge_id in &state.edges {
            let edge = self
                .graph
                .edge(edge_id)
                .ok_or(GraphError::UnknownEdge(edge_id.0))?;
            let minutes = edge.duration_minutes();

            segments.push(Segment {
                from: self.graph.station_name(&edge.from),
                to: self.graph.station_name(&edge.to),
                from_id: edge.from.clone(),
                to_id: edge.to.clone(),
                line: edge.line.clone(),
                duration_minutes: whole_minutes(minutes),
                congestion_level: levels.level_at(&edge.to, &edge.line, elapsed),
                is_transfer: edge.is_transfer,
            });
            elapsed += minutes;
        }

        let total_travel_minutes = if state.time.is_finite() && state.time > 0.0 {
            state.time.round() as u32
        } else {
            segments.iter().map(|s| s.duration_minutes).sum()
        };

        let rides = segments.iter().filter(|s| !s.is_transfer).count();
        let distance_km = self.fare.distance_for_hops(rides);

        Ok(RouteResult {
            kind,
            stations: state
                .path
                .iter()
                .map(|id| self.graph.station_name(id))
                .collect(),
            station_ids: state.path.clone(),
            departure_time: departure,
            total_travel_minutes,
            transfers: state.transfers,
            congestion_score: congestion_score(&segments),
            fare_amount: self.fare.fare_for_distance(distance_km),
            distance_km,
            lines_used: state.lines_used.clone(),
            segments,
        })
    }
}

/// Round to whole minutes, never below one.
fn whole_minutes(minutes: f64) -> u32 {
    minutes.round().max(1.0) as u32
}

/// Mean of the segments' crowding scores (Low is 0, Crowded is 100).
///
/// Zero for a route with no segments.
fn congestion_score(segments: &[Segment]) -> u8 {
    if segments.is_empty() {
        return 0;
    }
    let total: f64 = segments.iter().map(|s| s.congestion_level.score()).sum();
    (total / segments.len() as f64).round().clamp(0.0, 100.0) as u8
}
