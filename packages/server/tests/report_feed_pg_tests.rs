//! Live report collections on Postgres: LISTEN/NOTIFY producers feeding the
//! heat map.

mod common;

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use test_context::test_context;

use common::*;
use shelter_core::domains::heat_map::HeatMapService;
use shelter_core::domains::locations::models::lipa_city_districts;
use shelter_core::domains::locations::LocationResolver;
use shelter_core::domains::reports::{Report, ReportKind};
use shelter_core::kernel::{BaseReportStore, PgReportStore, ReportFeed, StreamHub};

/// Wait until `kind`'s snapshot holds `len` reports.
async fn wait_for_len(feed: &ReportFeed, kind: ReportKind, len: usize) {
    let mut changes = feed.changes();
    tokio::time::timeout(Duration::from_secs(5), async {
        while feed.snapshot(kind).len() != len {
            changes.next().await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("{} never reached {} reports", kind.collection(), len));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn subscribe_loads_existing_reports(ctx: &TestHarness) {
    let existing = lost("Marawoy", day(2026, 3, 1));
    existing.insert(&ctx.db_pool).await.unwrap();

    let store = PgReportStore::new(ctx.db_pool.clone());
    let subscription = store.subscribe().await.unwrap();
    let feed = subscription.feed();

    assert!(feed.is_available());
    let snapshot = feed.snapshot(ReportKind::Lost);
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].id, existing.id);
    assert_eq!(snapshot[0].location(), Some("Marawoy"));
    assert!(feed.snapshot(ReportKind::Found).is_empty());
    assert!(feed.snapshot(ReportKind::Abuse).is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn collections_update_independently(ctx: &TestHarness) {
    let store = PgReportStore::new(ctx.db_pool.clone());
    let subscription = store.subscribe().await.unwrap();
    let feed = subscription.feed().clone();

    store.insert(&lost("Sabang", day(2026, 3, 1))).await.unwrap();
    wait_for_len(&feed, ReportKind::Lost, 1).await;
    let lost_before = feed.snapshot(ReportKind::Lost);

    store.insert(&found("Tambo", day(2026, 3, 2))).await.unwrap();
    wait_for_len(&feed, ReportKind::Found, 1).await;

    // The found notification must not reload the lost collection
    assert!(Arc::ptr_eq(&lost_before, &feed.snapshot(ReportKind::Lost)));
    assert_eq!(feed.merged().len(), 2);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn delete_is_reflected_through_notification(ctx: &TestHarness) {
    let store = PgReportStore::new(ctx.db_pool.clone());
    let subscription = store.subscribe().await.unwrap();
    let feed = subscription.feed().clone();

    let report = abuse("Poblacion", day(2026, 3, 1));
    store.insert(&report).await.unwrap();
    wait_for_len(&feed, ReportKind::Abuse, 1).await;

    assert!(store.delete(ReportKind::Abuse, report.id).await.unwrap());
    wait_for_len(&feed, ReportKind::Abuse, 0).await;

    assert!(!store.delete(ReportKind::Abuse, report.id).await.unwrap());
    assert_eq!(Report::count(ReportKind::Abuse, &ctx.db_pool).await.unwrap(), 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn listener_recovers_after_failed_reload(ctx: &TestHarness) {
    let store = PgReportStore::new(ctx.db_pool.clone());
    let subscription = store.subscribe().await.unwrap();
    let feed = subscription.feed().clone();

    // Break the reload query, then trigger a notification for the collection
    sqlx::query("ALTER TABLE reports_lost RENAME COLUMN location TO location_old")
        .execute(&ctx.db_pool)
        .await
        .unwrap();
    sqlx::query(
        "INSERT INTO reports_lost (id, location_old, created_at) VALUES (gen_random_uuid(), 'Sabang', NOW())",
    )
    .execute(&ctx.db_pool)
    .await
    .unwrap();
    ctx.settle().await;

    // The failed reload keeps the last good snapshot
    assert!(feed.snapshot(ReportKind::Lost).is_empty());

    sqlx::query("ALTER TABLE reports_lost RENAME COLUMN location_old TO location")
        .execute(&ctx.db_pool)
        .await
        .unwrap();
    store.insert(&lost("Marawoy", day(2026, 3, 1))).await.unwrap();

    // The same listener picks up the next notification
    wait_for_len(&feed, ReportKind::Lost, 2).await;
    assert!(feed.is_available());
    assert!(feed
        .snapshot(ReportKind::Lost)
        .iter()
        .any(|report| report.location() == Some("Marawoy")));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn heat_map_follows_database_changes(ctx: &TestHarness) {
    let store = PgReportStore::new(ctx.db_pool.clone());
    let subscription = store.subscribe().await.unwrap();
    let hub = StreamHub::new();
    let mut rx = hub.subscribe(shelter_core::domains::heat_map::HEAT_MAP_TOPIC).await;

    let service = Arc::new(HeatMapService::new(
        Arc::new(LocationResolver::new(lipa_city_districts().unwrap())),
        subscription.feed().clone(),
        hub,
    ));
    let publisher = service.spawn_publisher();

    store.insert(&lost("Marawoy", day(2026, 3, 1))).await.unwrap();
    store.insert(&found("marawoy", day(2026, 3, 2))).await.unwrap();

    let view = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let event = rx.recv().await.unwrap();
            if event["data"]["maxCount"] == 2 {
                return event["data"].clone();
            }
        }
    })
    .await
    .unwrap();

    assert_eq!(view["markers"][0]["locationName"], "Marawoy");
    assert_eq!(view["totalMapped"], 2);

    publisher.abort();
}
