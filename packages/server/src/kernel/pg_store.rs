//! Postgres-backed report store.
//!
//! Each report table carries a trigger that calls
//! `pg_notify('reports_changed', TG_TABLE_NAME)`. One listener task per
//! collection waits for its own table name and reloads that collection's full
//! snapshot, so a change to `reports_found` never touches the lost or abuse
//! snapshots.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::postgres::PgListener;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::common::ReportId;
use crate::domains::reports::{Report, ReportKind};
use crate::kernel::report_feed::{FeedSubscription, FeedTasks, ReportFeed, Snapshot};
use crate::kernel::BaseReportStore;

/// Notification channel the report table triggers publish on.
pub const REPORTS_CHANGED_CHANNEL: &str = "reports_changed";

/// Pause before retrying after the listener itself fails.
const RETRY_DELAY: Duration = Duration::from_secs(1);

#[derive(Clone)]
pub struct PgReportStore {
    pool: PgPool,
}

impl PgReportStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Start listening before loading the first snapshot so no change between
    /// the two is missed.
    async fn watch_collection(
        &self,
        kind: ReportKind,
    ) -> Result<(watch::Receiver<Snapshot>, JoinHandle<()>)> {
        let mut listener = PgListener::connect_with(&self.pool)
            .await
            .context("Failed to open report change listener")?;
        listener
            .listen(REPORTS_CHANGED_CHANNEL)
            .await
            .with_context(|| format!("Failed to LISTEN on {}", REPORTS_CHANGED_CHANNEL))?;

        let initial = Report::find_all(kind, &self.pool)
            .await
            .with_context(|| format!("Failed to load {} collection", kind.collection()))?;
        info!(collection = kind.collection(), reports = initial.len(), "Loaded report collection");

        let (tx, rx) = watch::channel(Arc::new(initial));
        let pool = self.pool.clone();
        let task = tokio::spawn(follow_collection(kind, listener, tx, pool));

        Ok((rx, task))
    }
}

/// Keeps one collection's snapshot current until every feed receiver is gone.
///
/// Listener and reload failures are logged and retried; the last good snapshot
/// stays published in the meantime.
async fn follow_collection(
    kind: ReportKind,
    mut listener: PgListener,
    tx: watch::Sender<Snapshot>,
    pool: PgPool,
) {
    while !tx.is_closed() {
        match listener.try_recv().await {
            Ok(Some(notification)) if notification.payload() != kind.table() => continue,
            Ok(Some(_)) => {}
            // Connection dropped and was re-established; notifications may
            // have been lost in between, so reload anyway.
            Ok(None) => warn!(collection = kind.collection(), "Report listener reconnected"),
            Err(e) => {
                warn!(error = %e, collection = kind.collection(), "Report listener failed, retrying");
                tokio::time::sleep(RETRY_DELAY).await;
                continue;
            }
        }

        match Report::find_all(kind, &pool).await {
            Ok(reports) => {
                debug!(collection = kind.collection(), reports = reports.len(), "Reloaded report collection");
                tx.send_replace(Arc::new(reports));
            }
            // Retried on the next notification or reconnect
            Err(e) => warn!(error = %e, collection = kind.collection(), "Failed to reload report collection"),
        }
    }
    debug!(collection = kind.collection(), "No feed subscribers left");
}

#[async_trait]
impl BaseReportStore for PgReportStore {
    #[instrument(skip(self))]
    async fn subscribe(&self) -> Result<FeedSubscription> {
        let mut tasks = FeedTasks::default();

        let (lost, task) = self.watch_collection(ReportKind::Lost).await?;
        tasks.push(task);
        let (found, task) = self.watch_collection(ReportKind::Found).await?;
        tasks.push(task);
        let (abuse, task) = self.watch_collection(ReportKind::Abuse).await?;
        tasks.push(task);

        Ok(FeedSubscription::new(
            ReportFeed::new(lost, found, abuse),
            tasks,
        ))
    }

    #[instrument(skip(self, report), fields(report_id = %report.id, kind = %report.kind()))]
    async fn insert(&self, report: &Report) -> Result<()> {
        report.insert(&self.pool).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, kind: ReportKind, id: ReportId) -> Result<bool> {
        Report::delete(kind, id, &self.pool).await
    }
}
