use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::common::utils::{from_micro_degrees, to_micro_degrees};
use crate::common::Coordinate;
use crate::domains::reports::ReportKind;

/// Map key of one aggregated location.
///
/// Coordinates are rounded to micro-degrees, so two spellings of the same
/// float (`13.9411` / `13.94110`) share a key while any two locations that
/// differ by more than ~0.1m stay separate. There is no radius merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CoordinateKey {
    lat_micro: i64,
    lng_micro: i64,
}

impl CoordinateKey {
    pub fn from_coordinate(coordinate: Coordinate) -> Self {
        Self {
            lat_micro: to_micro_degrees(coordinate.lat),
            lng_micro: to_micro_degrees(coordinate.lng),
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(
            from_micro_degrees(self.lat_micro),
            from_micro_degrees(self.lng_micro),
        )
    }
}

impl fmt::Display for CoordinateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let coordinate = self.coordinate();
        write!(f, "{},{}", coordinate.lat, coordinate.lng)
    }
}

impl Serialize for CoordinateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// All reports that resolved to one exact location.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedPoint {
    pub key: CoordinateKey,
    pub lat: f64,
    pub lng: f64,
    pub count: u32,
    pub types: BTreeSet<ReportKind>,
    /// Location label of the first report seen at this key.
    pub location_name: String,
}

impl AggregatedPoint {
    pub fn new(key: CoordinateKey, kind: ReportKind, location_name: String) -> Self {
        let coordinate = key.coordinate();
        Self {
            key,
            lat: coordinate.lat,
            lng: coordinate.lng,
            count: 1,
            types: BTreeSet::from([kind]),
            location_name,
        }
    }

    pub fn record(&mut self, kind: ReportKind) {
        self.count += 1;
        self.types.insert(kind);
    }
}

/// Result of one aggregation pass over every report.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatMapSnapshot {
    pub points: BTreeMap<CoordinateKey, AggregatedPoint>,
    /// Highest `count` over all points, 0 when there are none.
    pub max_count: u32,
    /// Reports considered, mapped or not.
    pub total_reports: usize,
    /// Reports skipped for a missing or unresolvable location.
    pub unresolved: usize,
}

impl HeatMapSnapshot {
    /// Reports that made it onto the map.
    pub fn mapped_reports(&self) -> usize {
        self.total_reports - self.unresolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_merges_float_spellings() {
        let a = CoordinateKey::from_coordinate(Coordinate::new(13.9411, 121.1639));
        let b = CoordinateKey::from_coordinate(Coordinate::new(13.94110, 121.163900000001));
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "13.9411,121.1639");
    }

    #[test]
    fn test_key_keeps_nearby_points_separate() {
        let a = CoordinateKey::from_coordinate(Coordinate::new(13.9411, 121.1639));
        let b = CoordinateKey::from_coordinate(Coordinate::new(13.9412, 121.1639));
        assert_ne!(a, b);
    }

    #[test]
    fn test_key_serializes_as_lat_lng_string() {
        let key = CoordinateKey::from_coordinate(Coordinate::new(-33.8688, 151.2093));
        assert_eq!(
            serde_json::to_value(key).unwrap(),
            serde_json::json!("-33.8688,151.2093")
        );
    }

    #[test]
    fn test_record_counts_and_collects_types() {
        let key = CoordinateKey::from_coordinate(Coordinate::new(13.95, 121.15));
        let mut point = AggregatedPoint::new(key, ReportKind::Lost, "Marawoy".to_string());
        point.record(ReportKind::Found);
        point.record(ReportKind::Lost);

        assert_eq!(point.count, 3);
        assert_eq!(
            point.types,
            BTreeSet::from([ReportKind::Lost, ReportKind::Found])
        );
        assert_eq!(point.location_name, "Marawoy");
    }
}
