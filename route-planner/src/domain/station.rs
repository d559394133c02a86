//! Validated station and line reference data.

use super::{DomainError, LineId, StationId};

/// Mean Earth radius used for great-circle distances.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 position.
///
/// Always finite and within range; construct with [`Coordinates::new`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    lat: f64,
    lng: f64,
}

impl Coordinates {
    /// Create coordinates, rejecting non-finite or out-of-range values.
    pub fn new(lat: f64, lng: f64) -> Result<Self, DomainError> {
        let valid = lat.is_finite()
            && lng.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lng);
        if !valid {
            return Err(DomainError::InvalidCoordinates { lat, lng });
        }
        Ok(Self { lat, lng })
    }

    /// Great-circle distance in kilometres (Haversine formula).
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos() * other.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_KM * c
    }
}

/// One line-specific station record from the reference catalog.
///
/// Several stations may share a `name` when they are the same physical
/// interchange served by different lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    /// Lines this record declares it serves. May be empty; the graph
    /// builder adds every line whose sequence references the station.
    pub lines: Vec<LineId>,
    pub coordinates: Option<Coordinates>,
}

impl Station {
    /// Create a station with no coordinates.
    pub fn new(id: StationId, name: impl Into<String>, lines: Vec<LineId>) -> Self {
        Self {
            id,
            name: name.into(),
            lines,
            coordinates: None,
        }
    }

    /// Attach coordinates.
    pub fn with_coordinates(mut self, coordinates: Coordinates) -> Self {
        self.coordinates = Some(coordinates);
        self
    }
}

/// A branch hanging off a line's main sequence.
///
/// Branch hops are ridden on the parent line.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub name: Option<String>,
    pub stations: Vec<StationId>,
}

/// A line: an ordered main sequence plus optional branches.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub id: LineId,
    pub name: String,
    pub stations: Vec<StationId>,
    /// Whether the last station connects back to the first.
    pub circular: bool,
    pub branches: Vec<Branch>,
}

impl Line {
    /// Create a non-circular line without branches, named after its id.
    pub fn new(id: LineId, stations: Vec<StationId>) -> Self {
        Self {
            name: id.as_str().to_string(),
            id,
            stations,
            circular: false,
            branches: Vec::new(),
        }
    }

    pub fn circular(mut self) -> Self {
        self.circular = true;
        self
    }

    pub fn with_branch(mut self, branch: Branch) -> Self {
        self.branches.push(branch);
        self
    }

    /// Every station sequence of the line: the main one first, then branches.
    pub fn sequences(&self) -> impl Iterator<Item = &[StationId]> {
        std::iter::once(self.stations.as_slice())
            .chain(self.branches.iter().map(|b| b.stations.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sid(s: &str) -> StationId {
        StationId::parse(s).unwrap()
    }

    #[test]
    fn coordinates_reject_out_of_range() {
        assert!(Coordinates::new(37.5, 127.0).is_ok());
        assert!(Coordinates::new(90.1, 0.0).is_err());
        assert!(Coordinates::new(0.0, -180.5).is_err());
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
        assert!(Coordinates::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn distance_to_self_is_zero() {
        let c = Coordinates::new(37.5547, 126.9707).unwrap();
        assert!(c.distance_km(&c).abs() < 1e-9);
    }

    #[test]
    fn distance_is_symmetric_and_plausible() {
        // Seoul Station -> City Hall, roughly 1 km apart
        let a = Coordinates::new(37.5547, 126.9707).unwrap();
        let b = Coordinates::new(37.5657, 126.9769).unwrap();
        let ab = a.distance_km(&b);
        let ba = b.distance_km(&a);
        assert!((ab - ba).abs() < 1e-9);
        assert!(ab > 1.0 && ab < 1.6, "got {ab}");
    }

    #[test]
    fn one_degree_of_latitude() {
        let a = Coordinates::new(0.0, 0.0).unwrap();
        let b = Coordinates::new(1.0, 0.0).unwrap();
        assert!((a.distance_km(&b) - 111.19).abs() < 0.1);
    }

    #[test]
    fn sequences_lists_main_then_branches() {
        let line = Line::new(LineId::parse("2").unwrap(), vec![sid("A"), sid("B")]).with_branch(
            Branch {
                name: Some("spur".into()),
                stations: vec![sid("B"), sid("C")],
            },
        );
        let seqs: Vec<_> = line.sequences().collect();
        assert_eq!(seqs.len(), 2);
        assert_eq!(seqs[0], &[sid("A"), sid("B")]);
        assert_eq!(seqs[1], &[sid("B"), sid("C")]);
    }
}
