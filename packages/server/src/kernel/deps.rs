//! Server dependencies (using traits for testability)
//!
//! The report store sits behind `BaseReportStore` so tests can swap in the
//! in-memory store. Without a configured store the server still runs, on an
//! unavailable feed.

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;
use crate::domains::locations::models::{lipa_city_districts, DistrictTable};
use crate::domains::locations::LocationResolver;
use crate::kernel::pg_store::PgReportStore;
use crate::kernel::report_feed::FeedSubscription;
use crate::kernel::{BaseReportStore, StreamHub};

#[derive(Clone)]
pub struct ServerDeps {
    /// `None` when no database is configured
    pub store: Option<Arc<dyn BaseReportStore>>,
    pub resolver: Arc<LocationResolver>,
    /// In-process pub/sub hub for real-time streaming to SSE endpoints
    pub stream_hub: StreamHub,
}

impl ServerDeps {
    pub fn new(
        store: Option<Arc<dyn BaseReportStore>>,
        resolver: Arc<LocationResolver>,
        stream_hub: StreamHub,
    ) -> Self {
        Self {
            store,
            resolver,
            stream_hub,
        }
    }

    /// Build dependencies from configuration.
    ///
    /// Fails on a bad district table or database URL; an unreachable feed is
    /// handled later by [`ServerDeps::open_feed`].
    pub async fn from_config(config: &Config) -> Result<Self> {
        let table = match &config.district_table_path {
            Some(path) => DistrictTable::load(path)?,
            None => lipa_city_districts().context("Built-in district table is invalid")?,
        };
        info!(districts = table.len(), "District table loaded");

        let store: Option<Arc<dyn BaseReportStore>> = match &config.database_url {
            Some(url) => {
                let pool = PgPoolOptions::new()
                    .max_connections(10)
                    .connect_lazy(url)
                    .context("Invalid DATABASE_URL")?;
                Some(Arc::new(PgReportStore::new(pool)))
            }
            None => {
                warn!("DATABASE_URL not set, report feed will be unavailable");
                None
            }
        };

        Ok(Self::new(
            store,
            Arc::new(LocationResolver::new(table)),
            StreamHub::with_capacity(config.stream_capacity),
        ))
    }

    /// Subscribe to the report collections. If there is no store, or it
    /// cannot be reached, the server keeps running on an empty, unavailable
    /// feed.
    pub async fn open_feed(&self) -> FeedSubscription {
        let Some(store) = &self.store else {
            return FeedSubscription::unavailable();
        };
        match store.subscribe().await {
            Ok(subscription) => subscription,
            Err(e) => {
                warn!(error = %e, "Report feed unavailable, serving empty heat map");
                FeedSubscription::unavailable()
            }
        }
    }
}
