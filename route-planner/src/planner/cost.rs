//! Edge cost model.
//!
//! Base cost is an edge's travel or transfer time; the least-crowded search
//! scales it by the crowding level at the station being entered.

use chrono::{Duration, NaiveDateTime, Timelike};

use super::config::CongestionWeighting;
use crate::congestion::{CongestionProvider, level_or_default};
use crate::domain::{CongestionLevel, LineId, StationId};
use crate::graph::Edge;

/// Converts edges into traversal costs for one search.
#[derive(Clone, Copy)]
pub struct EdgeCostModel<'a> {
    weighting: CongestionWeighting,
    provider: Option<&'a dyn CongestionProvider>,
    departure: NaiveDateTime,
}

impl<'a> EdgeCostModel<'a> {
    pub fn new(
        weighting: CongestionWeighting,
        provider: Option<&'a dyn CongestionProvider>,
        departure: NaiveDateTime,
    ) -> Self {
        Self {
            weighting,
            provider,
            departure,
        }
    }

    /// Cost of traversing `edge` at the given crowding level.
    pub fn cost(edge: &Edge, level: CongestionLevel) -> f64 {
        edge.duration_minutes() * level.multiplier()
    }

    /// Neutral cost: multiplier 1.0, no lookup.
    pub fn fast_path_cost(edge: &Edge) -> f64 {
        Self::cost(edge, CongestionLevel::Normal)
    }

    /// Cost of entering `edge` after `elapsed_minutes` of travel.
    ///
    /// Under [`CongestionWeighting::Neutral`], or with no provider, this is
    /// the fast path and performs no lookup.
    pub fn weighted_cost(&self, edge: &Edge, elapsed_minutes: f64) -> f64 {
        match (self.weighting, self.provider) {
            (CongestionWeighting::Live, Some(_)) => {
                let level = self.level_at(&edge.to, &edge.line, elapsed_minutes);
                Self::cost(edge, level)
            }
            _ => Self::fast_path_cost(edge),
        }
    }

    /// Crowding level at `station` on `line` after `elapsed_minutes`.
    ///
    /// `Normal` when no provider is configured or the lookup fails.
    pub fn level_at(&self, station: &StationId, line: &LineId, elapsed_minutes: f64) -> CongestionLevel {
        match self.provider {
            Some(provider) => {
                level_or_default(provider, station, line, self.hour_at(elapsed_minutes))
            }
            None => CongestionLevel::Normal,
        }
    }

    /// Hour of day after `elapsed_minutes` from departure.
    pub fn hour_at(&self, elapsed_minutes: f64) -> u8 {
        let elapsed = if elapsed_minutes.is_finite() && elapsed_minutes > 0.0 {
            elapsed_minutes.floor() as i64
        } else {
            0
        };
        (self.departure + Duration::minutes(elapsed)).hour() as u8
    }
}
