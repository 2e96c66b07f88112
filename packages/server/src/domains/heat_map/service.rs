use chrono::Utc;
use futures::StreamExt;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::common::Coordinate;
use crate::domains::heat_map::activities::{
    compute_heat_map_snapshot, compute_statistics, StatisticsFilter, StatisticsSummary,
};
use crate::domains::heat_map::data::HeatMapView;
use crate::domains::locations::models::DistrictEntry;
use crate::domains::locations::LocationResolver;
use crate::kernel::{ReportFeed, StreamHub};

/// Stream hub topic carrying recomputed heat map views.
pub const HEAT_MAP_TOPIC: &str = "heat_map";

/// SSE event name for a recomputed view.
pub const HEAT_MAP_EVENT: &str = "heat_map";

/// Heat map and statistics over the live report feed.
///
/// Views are recomputed from the latest snapshots on demand; nothing is
/// cached between calls.
pub struct HeatMapService {
    resolver: Arc<LocationResolver>,
    feed: ReportFeed,
    stream_hub: StreamHub,
}

impl HeatMapService {
    pub fn new(resolver: Arc<LocationResolver>, feed: ReportFeed, stream_hub: StreamHub) -> Self {
        Self {
            resolver,
            feed,
            stream_hub,
        }
    }

    pub fn feed(&self) -> &ReportFeed {
        &self.feed
    }

    pub fn current_view(&self) -> HeatMapView {
        let reports = self.feed.merged();
        let snapshot = compute_heat_map_snapshot(&reports, &self.resolver);
        HeatMapView::from_snapshot(&snapshot, self.feed.is_available(), Utc::now())
    }

    pub fn statistics(&self, filter: &StatisticsFilter) -> StatisticsSummary {
        let reports = self.feed.merged();
        compute_statistics(&reports, filter, &self.resolver, self.feed.is_available())
    }

    pub fn districts(&self) -> Vec<DistrictEntry> {
        self.resolver.table().entries()
    }

    pub fn city_center(&self) -> Coordinate {
        self.resolver.table().city_center()
    }

    /// Recompute the view and push it to stream subscribers.
    pub async fn publish_current(&self) -> usize {
        let view = self.current_view();
        info!(
            points = view.markers.len(),
            max_count = view.max_count,
            mapped = view.total_mapped,
            "Computed heat map snapshot"
        );
        self.stream_hub
            .publish_event(HEAT_MAP_TOPIC, HEAT_MAP_EVENT, &view)
            .await
    }

    /// Republish on every collection change until the feed closes.
    pub async fn run_publisher(self: Arc<Self>) {
        let mut changes = self.feed.changes();
        while let Some(kind) = changes.next().await {
            debug!(collection = kind.collection(), "Report collection changed");
            let delivered = self.publish_current().await;
            debug!(subscribers = delivered, "Heat map update published");
        }
        info!("Report feed closed, heat map publisher stopping");
    }

    pub fn spawn_publisher(self: &Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(Arc::clone(self).run_publisher())
    }
}
