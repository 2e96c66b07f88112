use axum::{extract::Extension, Json};
use serde::Serialize;

use crate::domains::heat_map::HEAT_MAP_TOPIC;
use crate::domains::reports::ReportKind;
use crate::server::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    feed: FeedHealth,
    stream_subscribers: usize,
}

#[derive(Serialize)]
pub struct FeedHealth {
    available: bool,
    lost: usize,
    found: usize,
    abuse: usize,
}

/// Health check endpoint
///
/// Always 200: an unavailable report feed degrades the heat map to empty but
/// the server itself keeps serving.
pub async fn health_handler(Extension(state): Extension<AppState>) -> Json<HealthResponse> {
    let feed = state.heat_map.feed();

    let mut health = FeedHealth {
        available: feed.is_available(),
        lost: 0,
        found: 0,
        abuse: 0,
    };
    for (kind, count) in feed.counts() {
        match kind {
            ReportKind::Lost => health.lost = count,
            ReportKind::Found => health.found = count,
            ReportKind::Abuse => health.abuse = count,
        }
    }

    let status = if health.available { "healthy" } else { "degraded" };

    Json(HealthResponse {
        status: status.to_string(),
        feed: health,
        stream_subscribers: state.stream_hub.subscriber_count(HEAT_MAP_TOPIC).await,
    })
}
