//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::domains::heat_map::HeatMapService;
use crate::kernel::StreamHub;
use crate::server::routes::{
    districts_handler, health_handler, heat_map_handler, heat_map_stream_handler,
    statistics_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub heat_map: Arc<HeatMapService>,
    pub stream_hub: StreamHub,
}

impl AppState {
    pub fn new(heat_map: Arc<HeatMapService>, stream_hub: StreamHub) -> Self {
        Self {
            heat_map,
            stream_hub,
        }
    }
}

/// Build the Axum application router
pub fn build_app(state: AppState, allowed_origins: &[String]) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(cors_origins(allowed_origins))
        .allow_methods([Method::GET])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/heat-map", get(heat_map_handler))
        .route("/api/heat-map/statistics", get(statistics_handler))
        .route("/api/districts", get(districts_handler))
        .route("/api/streams/heat-map", get(heat_map_stream_handler))
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// No configured origins allows any origin (development).
fn cors_origins(allowed_origins: &[String]) -> AllowOrigin {
    if allowed_origins.is_empty() {
        return Any.into();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    AllowOrigin::list(origins)
}
