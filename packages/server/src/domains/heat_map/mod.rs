pub mod activities;
pub mod data;
pub mod models;
pub mod service;

pub use data::HeatMapView;
pub use models::{AggregatedPoint, CoordinateKey, HeatMapSnapshot, IntensityBand};
pub use service::{HeatMapService, HEAT_MAP_EVENT, HEAT_MAP_TOPIC};
