//! Graph building configuration.

/// Constants used to derive edge times from reference data.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Assumed average train speed (km per minute). 0.58 is about 35 km/h.
    pub speed_km_per_min: f64,

    /// Fixed dwell time added to every hop (minutes).
    pub dwell_mins: f64,

    /// Inter-station distance used when coordinates are missing (km).
    pub default_distance_km: f64,

    /// Transfer time at interchanges serving three or more lines (minutes).
    pub large_interchange_mins: f64,

    /// Transfer time at interchanges serving exactly two lines (minutes).
    pub two_line_interchange_mins: f64,

    /// Transfer time at any other same-name group (minutes).
    pub small_interchange_mins: f64,
}

impl GraphConfig {
    /// Travel time for a hop of the given length.
    pub fn hop_minutes(&self, distance_km: f64) -> f64 {
        distance_km / self.speed_km_per_min + self.dwell_mins
    }

    /// Transfer time for an interchange serving `line_count` distinct lines.
    pub fn transfer_minutes(&self, line_count: usize) -> f64 {
        match line_count {
            n if n >= 3 => self.large_interchange_mins,
            2 => self.two_line_interchange_mins,
            _ => self.small_interchange_mins,
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            speed_km_per_min: 0.58,
            dwell_mins: 0.5,
            default_distance_km: 1.2,
            large_interchange_mins: 6.0,
            two_line_interchange_mins: 4.0,
            small_interchange_mins: 3.0,
        }
    }
}
