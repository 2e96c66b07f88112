use axum::{extract::Extension, Json};
use serde::Serialize;

use crate::common::Coordinate;
use crate::domains::locations::DistrictEntry;
use crate::server::app::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictsResponse {
    city_center: Coordinate,
    districts: Vec<DistrictEntry>,
}

/// District names in table order, with their coordinates where known.
pub async fn districts_handler(Extension(state): Extension<AppState>) -> Json<DistrictsResponse> {
    Json(DistrictsResponse {
        city_center: state.heat_map.city_center(),
        districts: state.heat_map.districts(),
    })
}
