use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;

use crate::domains::heat_map::models::{AggregatedPoint, HeatMapSnapshot, IntensityBand};
use crate::domains::reports::ReportKind;

pub const HEAT_RADIUS: u32 = 25;
pub const HEAT_BLUR: u32 = 15;
pub const HEAT_MIN_OPACITY: f64 = 0.4;

/// `[lat, lng, intensity]`, the shape heat layer libraries consume.
pub type HeatPoint = (f64, f64, u32);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradientStop {
    pub stop: f64,
    pub color: &'static str,
}

/// Heat layer options derived from a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatLayer {
    pub radius: u32,
    pub blur: u32,
    /// Intensity mapped to the top of the gradient.
    pub max_intensity: u32,
    pub min_opacity: f64,
    pub gradient: Vec<GradientStop>,
}

impl HeatLayer {
    pub fn for_max_count(max_count: u32) -> Self {
        Self {
            radius: HEAT_RADIUS,
            blur: HEAT_BLUR,
            max_intensity: max_count.max(1),
            min_opacity: HEAT_MIN_OPACITY,
            gradient: IntensityBand::ALL
                .iter()
                .map(|band| GradientStop {
                    stop: band.gradient_stop(),
                    color: band.color(),
                })
                .collect(),
        }
    }
}

/// Count badge for one aggregated location.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapMarker {
    pub key: String,
    pub lat: f64,
    pub lng: f64,
    pub count: u32,
    pub band: IntensityBand,
    pub color: &'static str,
    pub location_name: String,
    pub types: BTreeSet<ReportKind>,
}

impl From<&AggregatedPoint> for MapMarker {
    fn from(point: &AggregatedPoint) -> Self {
        let band = IntensityBand::from_count(point.count);
        Self {
            key: point.key.to_string(),
            lat: point.lat,
            lng: point.lng,
            count: point.count,
            band,
            color: band.color(),
            location_name: point.location_name.clone(),
            types: point.types.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub band: IntensityBand,
    pub label: &'static str,
    pub min: u32,
    pub max: Option<u32>,
    pub color: &'static str,
}

pub fn legend() -> Vec<LegendEntry> {
    IntensityBand::ALL
        .iter()
        .rev()
        .map(|band| {
            let (min, max) = band.range();
            LegendEntry {
                band: *band,
                label: band.label(),
                min,
                max,
                color: band.color(),
            }
        })
        .collect()
}

/// Everything the admin map page needs to draw the heat map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatMapView {
    pub heat_points: Vec<HeatPoint>,
    pub layer: HeatLayer,
    pub markers: Vec<MapMarker>,
    pub legend: Vec<LegendEntry>,
    pub max_count: u32,
    pub total_reports: usize,
    pub total_mapped: usize,
    pub feed_available: bool,
    pub generated_at: DateTime<Utc>,
}

impl HeatMapView {
    pub fn from_snapshot(
        snapshot: &HeatMapSnapshot,
        feed_available: bool,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            heat_points: snapshot
                .points
                .values()
                .map(|p| (p.lat, p.lng, p.count))
                .collect(),
            layer: HeatLayer::for_max_count(snapshot.max_count),
            markers: snapshot.points.values().map(MapMarker::from).collect(),
            legend: legend(),
            max_count: snapshot.max_count,
            total_reports: snapshot.total_reports,
            total_mapped: snapshot.mapped_reports(),
            feed_available,
            generated_at,
        }
    }
}
