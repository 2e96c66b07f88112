use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domains::heat_map::activities::{StatisticsFilter, StatisticsSummary};
use crate::domains::heat_map::HeatMapView;
use crate::server::app::AppState;

/// Raw statistics panel query. Parsed into a [`StatisticsFilter`].
#[derive(Debug, Default, Deserialize)]
pub struct StatisticsQuery {
    from: Option<String>,
    to: Option<String>,
    /// Comma-separated, e.g. `lost,abuse`.
    types: Option<String>,
    district: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    error: String,
}

pub async fn heat_map_handler(Extension(state): Extension<AppState>) -> Json<HeatMapView> {
    Json(state.heat_map.current_view())
}

pub async fn statistics_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<StatisticsQuery>,
) -> Result<Json<StatisticsSummary>, (StatusCode, Json<ErrorResponse>)> {
    let filter = StatisticsFilter::parse(
        query.from.as_deref(),
        query.to.as_deref(),
        query.types.as_deref(),
        query.district.as_deref(),
    )
    .map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    })?;

    Ok(Json(state.heat_map.statistics(&filter)))
}
