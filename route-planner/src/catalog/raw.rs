//! Raw catalog records and their validation.
//!
//! The reference provider hands us loosely-typed JSON. Records are checked
//! once here and converted into the domain `Station`/`Line`/`Branch` model;
//! nothing downstream sees a raw record.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{Branch, Coordinates, DomainError, Line, LineId, Station, StationId};

/// Top-level catalog document.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawCatalog {
    #[serde(default)]
    pub stations: Vec<RawStation>,
    #[serde(default)]
    pub lines: Vec<RawLine>,
}

/// A station record as supplied by the reference provider.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawStation {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub lines: Vec<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

/// A line record: main sequence plus branches.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawLine {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub stations: Vec<String>,
    #[serde(default)]
    pub circular: bool,
    #[serde(default)]
    pub branches: Vec<RawBranch>,
}

/// A branch record.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawBranch {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub stations: Vec<String>,
}

/// Validated reference data, ready for graph building.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub stations: Vec<Station>,
    pub lines: Vec<Line>,
}

impl Catalog {
    /// Create a catalog from already-validated parts.
    pub fn new(stations: Vec<Station>, lines: Vec<Line>) -> Self {
        Self { stations, lines }
    }

    /// Validate a raw document.
    ///
    /// Invalid records are skipped with a warning rather than failing the
    /// whole catalog: a station with an empty id or name, a duplicate station
    /// id (the first wins), or a line with an empty id. Invalid coordinates
    /// are dropped while keeping the station.
    pub fn from_raw(raw: RawCatalog) -> Self {
        let mut seen: HashSet<StationId> = HashSet::new();
        let mut stations = Vec::with_capacity(raw.stations.len());

        for record in raw.stations {
            let Some(station) = validate_station(record) else {
                continue;
            };
            if !seen.insert(station.id.clone()) {
                warn!(station = %station.id, "Skipping duplicate station record");
                continue;
            }
            stations.push(station);
        }

        let lines = raw.lines.into_iter().filter_map(validate_line).collect();

        Self { stations, lines }
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

/// Trimmed display name; blank names are rejected.
fn required_name(raw: &str, kind: &'static str) -> Result<String, DomainError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(DomainError::EmptyName(kind));
    }
    Ok(name.to_string())
}

fn validate_station(record: RawStation) -> Option<Station> {
    let id = match StationId::parse(&record.id) {
        Ok(id) => id,
        Err(e) => {
            warn!(name = %record.name, error = %e, "Skipping station record");
            return None;
        }
    };

    let name = match required_name(&record.name, "station") {
        Ok(name) => name,
        Err(e) => {
            warn!(station = %id, error = %e, "Skipping station record");
            return None;
        }
    };

    let lines = parse_ids(&record.lines, |s| LineId::parse(s).ok());

    let coordinates = match (record.lat, record.lng) {
        (Some(lat), Some(lng)) => match Coordinates::new(lat, lng) {
            Ok(c) => Some(c),
            Err(e) => {
                warn!(station = %id, error = %e, "Ignoring station coordinates");
                None
            }
        },
        _ => None,
    };

    Some(Station {
        id,
        name,
        lines,
        coordinates,
    })
}

fn validate_line(record: RawLine) -> Option<Line> {
    let id = match LineId::parse(&record.id) {
        Ok(id) => id,
        Err(e) => {
            warn!(error = %e, "Skipping line record");
            return None;
        }
    };

    let stations = parse_station_refs(&id, &record.stations);
    let branches = record
        .branches
        .into_iter()
        .map(|b| Branch {
            name: b.id.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            stations: parse_station_refs(&id, &b.stations),
        })
        .collect();

    let name = record
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| id.as_str().to_string());

    Some(Line {
        id,
        name,
        stations,
        circular: record.circular,
        branches,
    })
}

fn parse_station_refs(line: &LineId, refs: &[String]) -> Vec<StationId> {
    parse_ids(refs, |s| match StationId::parse(s) {
        Ok(id) => Some(id),
        Err(_) => {
            warn!(line = %line, "Dropping empty station reference");
            None
        }
    })
}

fn parse_ids<T>(values: &[String], parse: impl Fn(&str) -> Option<T>) -> Vec<T> {
    values.iter().filter_map(|v| parse(v.as_str())).collect()
}
