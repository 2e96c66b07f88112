//! Location string -> coordinate resolution.
//!
//! Reports carry whatever the submitter typed: a `"lat,lng"` pair from the
//! map picker, or a free-text address. Free text is matched against the
//! district table by substring, longest district name first, so
//! `"Barangay 1 (Poblacion)"` wins over `"Poblacion"`.
//!
//! Any address mentioning "poblacion" is also taken by the longest poblacion
//! district, even over a shorter name that appears in the address verbatim.
//! This is a coarse heuristic and is kept as such.

use serde::Serialize;
use std::cmp::Reverse;
use tracing::debug;

use super::models::DistrictTable;
use crate::common::utils::parse_coordinate_pair;
use crate::common::Coordinate;
use crate::domains::reports::ReportKind;

const POBLACION: &str = "poblacion";

/// How a location string was turned into a coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "district", rename_all = "snake_case")]
pub enum LocationMatch {
    /// The string itself was a coordinate pair.
    Exact,
    /// Matched a district with a known coordinate.
    District(String),
    /// Matched a district that has no coordinate; the city center was used.
    DistrictFallback(String),
}

impl LocationMatch {
    pub fn district(&self) -> Option<&str> {
        match self {
            LocationMatch::Exact => None,
            LocationMatch::District(name) | LocationMatch::DistrictFallback(name) => Some(name),
        }
    }
}

/// A single report's location after resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedCoordinate {
    pub lat: f64,
    pub lng: f64,
    pub intensity: u32,
    /// Unset when produced by the resolver; filled in per report.
    #[serde(rename = "type")]
    pub kind: Option<ReportKind>,
    /// The original string for exact pairs, the district name otherwise.
    pub location: String,
    pub matched: LocationMatch,
}

impl ResolvedCoordinate {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }

    pub fn with_kind(mut self, kind: ReportKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

#[derive(Debug, Clone)]
struct Candidate {
    index: usize,
    lowered: String,
    stripped: String,
}

/// Resolves location strings against a fixed district table.
///
/// Both the heat map aggregation and the statistics panel go through the same
/// resolver, so a report is attributed to the same district everywhere.
#[derive(Debug, Clone)]
pub struct LocationResolver {
    table: DistrictTable,
    /// Table indices, longest name first; equal lengths keep table order.
    candidates: Vec<Candidate>,
}

impl LocationResolver {
    pub fn new(table: DistrictTable) -> Self {
        let mut candidates: Vec<Candidate> = table
            .names()
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let lowered = name.to_lowercase();
                let stripped = lowered.chars().filter(|c| !c.is_whitespace()).collect();
                Candidate {
                    index,
                    lowered,
                    stripped,
                }
            })
            .collect();
        // sort_by_key is stable
        candidates.sort_by_key(|c| Reverse(table.names()[c.index].chars().count()));

        Self { table, candidates }
    }

    pub fn table(&self) -> &DistrictTable {
        &self.table
    }

    /// Resolve one location string. `None` means the report is not mappable.
    pub fn resolve(&self, location: Option<&str>) -> Option<ResolvedCoordinate> {
        let location = location.filter(|l| !l.is_empty())?;

        if let Some(coordinate) = parse_coordinate_pair(location) {
            return Some(ResolvedCoordinate {
                lat: coordinate.lat,
                lng: coordinate.lng,
                intensity: 1,
                kind: None,
                location: location.to_string(),
                matched: LocationMatch::Exact,
            });
        }

        let Some(district) = self.match_district(location) else {
            debug!(location, "Location matched no district");
            return None;
        };

        let (coordinate, matched) = match self.table.coordinate_of(district) {
            Some(coordinate) => (coordinate, LocationMatch::District(district.to_string())),
            None => (
                self.table.city_center(),
                LocationMatch::DistrictFallback(district.to_string()),
            ),
        };

        Some(ResolvedCoordinate {
            lat: coordinate.lat,
            lng: coordinate.lng,
            intensity: 1,
            kind: None,
            location: district.to_string(),
            matched,
        })
    }

    /// The district a location string belongs to, if any.
    ///
    /// Coordinate pairs belong to no named district.
    pub fn district_of(&self, location: Option<&str>) -> Option<String> {
        self.resolve(location)
            .and_then(|resolved| resolved.matched.district().map(str::to_string))
    }

    /// First district, longest name first, that the address refers to.
    ///
    /// A district matches if the lower-cased address contains its lower-cased
    /// name, or its name with whitespace removed, or if both the address and
    /// the name contain "poblacion".
    fn match_district(&self, address: &str) -> Option<&str> {
        let address = address.to_lowercase();
        let mentions_poblacion = address.contains(POBLACION);

        let hit = self.candidates.iter().find(|c| {
            address.contains(&c.lowered)
                || address.contains(&c.stripped)
                || (mentions_poblacion && c.lowered.contains(POBLACION))
        })?;

        Some(self.table.names()[hit.index].as_str())
    }
}
