//! In-memory report store for tests and embedding.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::warn;

use crate::common::ReportId;
use crate::domains::reports::{Report, ReportKind};
use crate::kernel::report_feed::{FeedSubscription, FeedTasks, ReportFeed, Snapshot};
use crate::kernel::BaseReportStore;

pub struct InMemoryReportStore {
    lost: watch::Sender<Snapshot>,
    found: watch::Sender<Snapshot>,
    abuse: watch::Sender<Snapshot>,
}

impl InMemoryReportStore {
    pub fn new() -> Self {
        Self {
            lost: watch::channel(Snapshot::default()).0,
            found: watch::channel(Snapshot::default()).0,
            abuse: watch::channel(Snapshot::default()).0,
        }
    }

    /// Seed a store, routing each report to its own collection.
    pub fn with_reports(reports: Vec<Report>) -> Self {
        let store = Self::new();
        for kind in ReportKind::ALL {
            let collection = reports
                .iter()
                .filter(|r| r.kind() == kind)
                .cloned()
                .collect();
            store.replace(kind, collection);
        }
        store
    }

    fn sender(&self, kind: ReportKind) -> &watch::Sender<Snapshot> {
        match kind {
            ReportKind::Lost => &self.lost,
            ReportKind::Found => &self.found,
            ReportKind::Abuse => &self.abuse,
        }
    }

    /// Replace a whole collection. Reports of another kind are dropped.
    pub fn replace(&self, kind: ReportKind, reports: Vec<Report>) {
        let (matching, stray): (Vec<Report>, Vec<Report>) =
            reports.into_iter().partition(|r| r.kind() == kind);
        if !stray.is_empty() {
            warn!(collection = %kind, dropped = stray.len(), "Ignoring reports of another kind");
        }
        self.sender(kind).send_replace(Arc::new(matching));
    }

    pub fn feed(&self) -> ReportFeed {
        ReportFeed::new(
            self.lost.subscribe(),
            self.found.subscribe(),
            self.abuse.subscribe(),
        )
    }
}

impl Default for InMemoryReportStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseReportStore for InMemoryReportStore {
    async fn subscribe(&self) -> Result<FeedSubscription> {
        Ok(FeedSubscription::new(self.feed(), FeedTasks::default()))
    }

    async fn insert(&self, report: &Report) -> Result<()> {
        self.sender(report.kind())
            .send_modify(|snapshot| Arc::make_mut(snapshot).push(report.clone()));
        Ok(())
    }

    async fn delete(&self, kind: ReportKind, id: ReportId) -> Result<bool> {
        Ok(self.sender(kind).send_if_modified(|snapshot| {
            if !snapshot.iter().any(|r| r.id == id) {
                return false;
            }
            Arc::make_mut(snapshot).retain(|r| r.id != id);
            true
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use futures::StreamExt;
    use std::time::Duration;

    fn report(kind: ReportKind, location: &str) -> Report {
        Report::new(kind, Some(location), Utc::now())
    }

    #[tokio::test]
    async fn test_seeded_store_routes_by_kind() {
        let store = InMemoryReportStore::with_reports(vec![
            report(ReportKind::Lost, "Sabang"),
            report(ReportKind::Abuse, "Tambo"),
            report(ReportKind::Lost, "Sico"),
        ]);

        let subscription = store.subscribe().await.unwrap();
        let feed = subscription.feed();
        assert!(feed.is_available());
        assert_eq!(feed.snapshot(ReportKind::Lost).len(), 2);
        assert_eq!(feed.snapshot(ReportKind::Found).len(), 0);
        assert_eq!(feed.snapshot(ReportKind::Abuse).len(), 1);
    }

    #[tokio::test]
    async fn test_insert_and_delete_push_to_subscribers() {
        let store = InMemoryReportStore::new();
        let subscription = store.subscribe().await.unwrap();
        let feed = subscription.feed().clone();
        let mut changes = feed.changes();

        let found = report(ReportKind::Found, "Marawoy");
        store.insert(&found).await.unwrap();

        let changed = tokio::time::timeout(Duration::from_secs(1), changes.next())
            .await
            .unwrap();
        assert_eq!(changed, Some(ReportKind::Found));
        assert_eq!(feed.merged(), vec![found.clone()]);

        assert!(store.delete(ReportKind::Found, found.id).await.unwrap());
        let changed = tokio::time::timeout(Duration::from_secs(1), changes.next())
            .await
            .unwrap();
        assert_eq!(changed, Some(ReportKind::Found));
        assert!(feed.merged().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_report_is_silent() {
        let store = InMemoryReportStore::with_reports(vec![report(ReportKind::Lost, "Sabang")]);
        let feed = store.feed();
        let mut changes = feed.changes();

        assert!(!store.delete(ReportKind::Lost, ReportId::new()).await.unwrap());
        // Wrong collection for an existing id
        let existing = feed.snapshot(ReportKind::Lost)[0].id;
        assert!(!store.delete(ReportKind::Abuse, existing).await.unwrap());

        let next = tokio::time::timeout(Duration::from_millis(50), changes.next()).await;
        assert!(next.is_err(), "no change should have been published");
    }

    #[test]
    fn test_replace_drops_foreign_kinds() {
        let store = InMemoryReportStore::new();
        store.replace(
            ReportKind::Lost,
            vec![report(ReportKind::Lost, "Sabang"), report(ReportKind::Found, "Sico")],
        );
        assert_eq!(store.feed().snapshot(ReportKind::Lost).len(), 1);
    }
}
