//! Test fixtures for creating reports and an in-memory app.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use tower::ServiceExt;

use shelter_core::domains::heat_map::HeatMapService;
use shelter_core::domains::locations::models::lipa_city_districts;
use shelter_core::domains::locations::LocationResolver;
use shelter_core::domains::reports::{Report, ReportKind};
use shelter_core::kernel::{InMemoryReportStore, StreamHub};
use shelter_core::server::{build_app, AppState};

/// Midday UTC on the given day.
pub fn day(year: i32, month: u32, date: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, date, 12, 0, 0)
        .single()
        .expect("valid date")
}

pub fn lost(location: &str, created_at: DateTime<Utc>) -> Report {
    Report::new(ReportKind::Lost, Some(location), created_at)
}

pub fn found(location: &str, created_at: DateTime<Utc>) -> Report {
    Report::new(ReportKind::Found, Some(location), created_at)
}

pub fn abuse(location: &str, created_at: DateTime<Utc>) -> Report {
    Report::new(ReportKind::Abuse, Some(location), created_at)
}

/// App over an in-memory store seeded with `reports`, using the built-in
/// Lipa City district table.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryReportStore>,
    pub heat_map: Arc<HeatMapService>,
}

impl TestApp {
    pub fn new(reports: Vec<Report>) -> Self {
        let store = Arc::new(InMemoryReportStore::with_reports(reports));
        let hub = StreamHub::new();
        let heat_map = Arc::new(HeatMapService::new(
            Arc::new(LocationResolver::new(lipa_city_districts().unwrap())),
            store.feed(),
            hub.clone(),
        ));
        let router = build_app(AppState::new(heat_map.clone(), hub), &[]);

        Self {
            router,
            store,
            heat_map,
        }
    }

    /// GET `uri` and decode the JSON body.
    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }
}
