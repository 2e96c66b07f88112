use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::common::Coordinate;

#[derive(Debug, Error, PartialEq)]
pub enum DistrictTableError {
    #[error("District table has no districts")]
    Empty,

    #[error("District name must not be blank")]
    BlankName,

    #[error("Duplicate district name: {0}")]
    DuplicateName(String),

    #[error("Invalid coordinate for district {0}")]
    InvalidCoordinate(String),

    #[error("Invalid city center coordinate")]
    InvalidCityCenter,
}

/// One row of a district table as stored in configuration files.
///
/// `lat`/`lng` are optional: a district may be known by name only, in which
/// case lookups fall back to the city center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

impl DistrictEntry {
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng)),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DistrictTableFile {
    city_center: Coordinate,
    districts: Vec<DistrictEntry>,
}

/// Ordered canonical district (barangay) names plus their fixed coordinates.
///
/// Read-only reference data. Table order matters: it breaks ties between
/// equally long names during address matching.
#[derive(Debug, Clone)]
pub struct DistrictTable {
    names: Vec<String>,
    coordinates: HashMap<String, Coordinate>,
    city_center: Coordinate,
}

impl DistrictTable {
    pub fn new(
        names: Vec<String>,
        coordinates: HashMap<String, Coordinate>,
        city_center: Coordinate,
    ) -> Result<Self, DistrictTableError> {
        if names.is_empty() {
            return Err(DistrictTableError::Empty);
        }
        if !city_center.is_valid() {
            return Err(DistrictTableError::InvalidCityCenter);
        }

        let mut seen = std::collections::HashSet::new();
        for name in &names {
            if name.trim().is_empty() {
                return Err(DistrictTableError::BlankName);
            }
            if !seen.insert(name.as_str()) {
                return Err(DistrictTableError::DuplicateName(name.clone()));
            }
        }
        for (name, coordinate) in &coordinates {
            if !coordinate.is_valid() {
                return Err(DistrictTableError::InvalidCoordinate(name.clone()));
            }
        }

        Ok(Self {
            names,
            coordinates,
            city_center,
        })
    }

    /// Build a table from entries, keeping their order.
    pub fn from_entries(
        entries: Vec<DistrictEntry>,
        city_center: Coordinate,
    ) -> Result<Self, DistrictTableError> {
        let coordinates = entries
            .iter()
            .filter_map(|entry| entry.coordinate().map(|c| (entry.name.clone(), c)))
            .collect();
        let names = entries.into_iter().map(|entry| entry.name).collect();
        Self::new(names, coordinates, city_center)
    }

    /// Parse a JSON table: `{"cityCenter": {...}, "districts": [{"name", "lat", "lng"}]}`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: DistrictTableFile =
            serde_json::from_str(json).context("Failed to parse district table JSON")?;
        Ok(Self::from_entries(file.districts, file.city_center)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read district table: {:?}", path))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Invalid district table: {:?}", path))
    }

    /// Canonical names in table order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn coordinate_of(&self, name: &str) -> Option<Coordinate> {
        self.coordinates.get(name).copied()
    }

    pub fn city_center(&self) -> Coordinate {
        self.city_center
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Entries in table order, for listing districts to clients.
    pub fn entries(&self) -> Vec<DistrictEntry> {
        self.names
            .iter()
            .map(|name| {
                let coordinate = self.coordinate_of(name);
                DistrictEntry {
                    name: name.clone(),
                    lat: coordinate.map(|c| c.lat),
                    lng: coordinate.map(|c| c.lng),
                }
            })
            .collect()
    }
}
