//! Route result types.
//!
//! A `RouteResult` is the finished itinerary handed back to callers: the
//! station sequence, per-hop segments, and the aggregate time, fare and
//! crowding figures.

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use super::{CongestionLevel, LineId, StationId};

/// Which search produced a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteKind {
    Fastest,
    LeastTransfer,
    LeastCrowded,
    /// Found by re-running the fastest search with edges masked.
    Alternative,
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RouteKind::Fastest => "fastest",
            RouteKind::LeastTransfer => "least-transfer",
            RouteKind::LeastCrowded => "least-crowded",
            RouteKind::Alternative => "alternative",
        };
        f.write_str(label)
    }
}

/// One hop of a route: a ride between adjacent stations or a transfer walk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    /// Origin station name
    pub from: String,
    /// Destination station name
    pub to: String,
    pub from_id: StationId,
    pub to_id: StationId,
    /// Line ridden (for transfers, the line being transferred onto)
    pub line: LineId,
    /// Always at least 1
    pub duration_minutes: u32,
    pub congestion_level: CongestionLevel,
    pub is_transfer: bool,
}

/// A complete route between two stations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteResult {
    pub kind: RouteKind,
    /// Station names in travel order
    pub stations: Vec<String>,
    /// Station ids in travel order; never contains duplicates
    pub station_ids: Vec<StationId>,
    pub departure_time: NaiveDateTime,
    pub total_travel_minutes: u32,
    pub transfers: usize,
    /// Mean segment crowding on a 0..=100 scale
    pub congestion_score: u8,
    pub fare_amount: u32,
    /// Ridden distance used for the fare
    pub distance_km: f64,
    /// Lines in the order they are first ridden
    pub lines_used: Vec<LineId>,
    pub segments: Vec<Segment>,
}

impl RouteResult {
    /// Path signature used to tell routes apart.
    pub fn signature(&self) -> String {
        path_signature(&self.station_ids)
    }

    /// Arrival time at the destination.
    pub fn arrival_time(&self) -> NaiveDateTime {
        self.departure_time + chrono::Duration::minutes(i64::from(self.total_travel_minutes))
    }

    /// Number of ride hops (transfer segments excluded).
    pub fn ride_count(&self) -> usize {
        self.segments.iter().filter(|s| !s.is_transfer).count()
    }
}

/// Join a station-id sequence into a single comparable key.
pub fn path_signature(ids: &[StationId]) -> String {
    ids.iter()
        .map(StationId::as_str)
        .collect::<Vec<_>>()
        .join(">")
}
