//! Congestion provider abstraction.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::error::CongestionError;
use crate::domain::{CongestionLevel, LineId, StationId};

/// Source of crowding levels per station, line and hour of day.
///
/// Implementations are best-effort and must bound their own latency; a
/// lookup that fails or times out returns `Err` and the planner falls back
/// to [`CongestionLevel::Normal`].
pub trait CongestionProvider: Send + Sync {
    fn lookup(
        &self,
        station: &StationId,
        line: &LineId,
        hour: u8,
    ) -> Result<CongestionLevel, CongestionError>;
}

impl<P: CongestionProvider + ?Sized> CongestionProvider for Arc<P> {
    fn lookup(
        &self,
        station: &StationId,
        line: &LineId,
        hour: u8,
    ) -> Result<CongestionLevel, CongestionError> {
        (**self).lookup(station, line, hour)
    }
}

/// Look up a level, substituting `Normal` on any failure.
pub fn level_or_default(
    provider: &dyn CongestionProvider,
    station: &StationId,
    line: &LineId,
    hour: u8,
) -> CongestionLevel {
    match provider.lookup(station, line, hour) {
        Ok(level) => level,
        Err(e) => {
            debug!(
                station = %station,
                line = %line,
                hour,
                error = %e,
                "Congestion lookup failed, using normal"
            );
            CongestionLevel::Normal
        }
    }
}

/// In-memory congestion table.
///
/// Keys without an exact hour entry fall back to the station/line default
/// if one was set, else the lookup reports `NoData`.
#[derive(Debug, Clone, Default)]
pub struct StaticCongestion {
    hourly: HashMap<(StationId, LineId, u8), CongestionLevel>,
    all_day: HashMap<(StationId, LineId), CongestionLevel>,
}

impl StaticCongestion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the level for one hour.
    pub fn set(&mut self, station: StationId, line: LineId, hour: u8, level: CongestionLevel) {
        self.hourly.insert((station, line, hour % 24), level);
    }

    /// Set the level for every hour without a specific entry.
    pub fn set_all_day(&mut self, station: StationId, line: LineId, level: CongestionLevel) {
        self.all_day.insert((station, line), level);
    }
}

impl CongestionProvider for StaticCongestion {
    fn lookup(
        &self,
        station: &StationId,
        line: &LineId,
        hour: u8,
    ) -> Result<CongestionLevel, CongestionError> {
        let hour = hour % 24;
        self.hourly
            .get(&(station.clone(), line.clone(), hour))
            .or_else(|| self.all_day.get(&(station.clone(), line.clone())))
            .copied()
            .ok_or_else(|| CongestionError::NoData {
                station: station.to_string(),
                line: line.to_string(),
                hour,
            })
    }
}
