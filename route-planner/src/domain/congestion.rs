//! Discrete crowding levels.

use std::fmt;

use serde::Serialize;

use super::DomainError;

/// Crowding indicator for a station, line and hour.
///
/// Level 1 is the least crowded. `Normal` is the neutral level used whenever
/// real data is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum CongestionLevel {
    Low,
    #[default]
    Normal,
    Busy,
    Crowded,
}

impl CongestionLevel {
    /// All levels, least crowded first.
    pub const ALL: [CongestionLevel; 4] = [
        CongestionLevel::Low,
        CongestionLevel::Normal,
        CongestionLevel::Busy,
        CongestionLevel::Crowded,
    ];

    /// Convert from the 1..=4 wire value.
    pub fn from_level(level: u8) -> Result<Self, DomainError> {
        match level {
            1 => Ok(Self::Low),
            2 => Ok(Self::Normal),
            3 => Ok(Self::Busy),
            4 => Ok(Self::Crowded),
            other => Err(DomainError::InvalidCongestionLevel(other)),
        }
    }

    /// The 1..=4 wire value.
    pub fn level(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Normal => 2,
            Self::Busy => 3,
            Self::Crowded => 4,
        }
    }

    /// Cost multiplier applied to edges entered at this level.
    pub fn multiplier(self) -> f64 {
        match self {
            Self::Low => 0.5,
            Self::Normal => 1.0,
            Self::Busy => 1.5,
            Self::Crowded => 2.0,
        }
    }

    /// Position on the 0..=100 scale (1 -> 0, 4 -> 100).
    pub fn score(self) -> f64 {
        f64::from(self.level() - 1) * 100.0 / 3.0
    }
}

impl fmt::Display for CongestionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.level())
    }
}

impl Serialize for CongestionLevel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.level())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_values_roundtrip() {
        for level in CongestionLevel::ALL {
            assert_eq!(CongestionLevel::from_level(level.level()).unwrap(), level);
        }
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(CongestionLevel::from_level(0).is_err());
        assert!(CongestionLevel::from_level(5).is_err());
    }

    #[test]
    fn multipliers() {
        assert_eq!(CongestionLevel::Low.multiplier(), 0.5);
        assert_eq!(CongestionLevel::Normal.multiplier(), 1.0);
        assert_eq!(CongestionLevel::Busy.multiplier(), 1.5);
        assert_eq!(CongestionLevel::Crowded.multiplier(), 2.0);
    }

    #[test]
    fn scores_are_evenly_spaced() {
        assert_eq!(CongestionLevel::Low.score(), 0.0);
        assert!((CongestionLevel::Normal.score() - 33.333).abs() < 0.01);
        assert!((CongestionLevel::Busy.score() - 66.667).abs() < 0.01);
        assert_eq!(CongestionLevel::Crowded.score(), 100.0);
    }

    #[test]
    fn default_is_normal() {
        assert_eq!(CongestionLevel::default(), CongestionLevel::Normal);
    }
}
