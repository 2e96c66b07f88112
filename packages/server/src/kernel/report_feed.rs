//! Live report collections.
//!
//! Each collection (lost / found / abuse) is its own `watch` channel holding
//! the latest full snapshot of that collection. A producer replaces the whole
//! snapshot whenever anything in its collection changes, so updates are
//! last-write-wins per collection and the three channels never need to be
//! ordered against each other. [`ReportFeed::merged`] is the one place the
//! three are combined.

use futures::stream::{self, BoxStream, SelectAll, StreamExt};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::WatchStream;

use crate::domains::reports::{Report, ReportKind};

/// Full contents of one collection at some point in time.
pub type Snapshot = Arc<Vec<Report>>;

/// Read side of the three report collections.
#[derive(Clone)]
pub struct ReportFeed {
    lost: watch::Receiver<Snapshot>,
    found: watch::Receiver<Snapshot>,
    abuse: watch::Receiver<Snapshot>,
    available: bool,
}

impl ReportFeed {
    pub fn new(
        lost: watch::Receiver<Snapshot>,
        found: watch::Receiver<Snapshot>,
        abuse: watch::Receiver<Snapshot>,
    ) -> Self {
        Self {
            lost,
            found,
            abuse,
            available: true,
        }
    }

    /// A feed for when the report store could not be reached: three empty
    /// collections that never change.
    pub fn unavailable() -> Self {
        let (_, rx) = watch::channel(Snapshot::default());
        Self {
            lost: rx.clone(),
            found: rx.clone(),
            abuse: rx,
            available: false,
        }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    fn receiver(&self, kind: ReportKind) -> &watch::Receiver<Snapshot> {
        match kind {
            ReportKind::Lost => &self.lost,
            ReportKind::Found => &self.found,
            ReportKind::Abuse => &self.abuse,
        }
    }

    /// Latest snapshot of one collection.
    pub fn snapshot(&self, kind: ReportKind) -> Snapshot {
        self.receiver(kind).borrow().clone()
    }

    /// Union of the latest snapshot of every collection, in kind order.
    pub fn merged(&self) -> Vec<Report> {
        let snapshots: Vec<Snapshot> = ReportKind::ALL
            .into_iter()
            .map(|kind| self.snapshot(kind))
            .collect();

        let mut merged = Vec::with_capacity(snapshots.iter().map(|s| s.len()).sum());
        for snapshot in &snapshots {
            merged.extend(snapshot.iter().cloned());
        }
        merged
    }

    /// Report count per collection.
    pub fn counts(&self) -> Vec<(ReportKind, usize)> {
        ReportKind::ALL
            .into_iter()
            .map(|kind| (kind, self.receiver(kind).borrow().len()))
            .collect()
    }

    /// Yields the kind of each collection that publishes a new snapshot.
    ///
    /// The current snapshots are not replayed. The stream ends once every
    /// producer has gone away.
    pub fn changes(&self) -> SelectAll<BoxStream<'static, ReportKind>> {
        stream::select_all(ReportKind::ALL.into_iter().map(|kind| {
            WatchStream::from_changes(self.receiver(kind).clone())
                .map(move |_| kind)
                .boxed()
        }))
    }
}

/// Producer tasks behind a feed. Aborted together when dropped.
#[derive(Default)]
pub struct FeedTasks(Vec<JoinHandle<()>>);

impl FeedTasks {
    pub fn push(&mut self, task: JoinHandle<()>) {
        self.0.push(task);
    }
}

impl Drop for FeedTasks {
    fn drop(&mut self) {
        for task in &self.0 {
            task.abort();
        }
    }
}

/// A live feed plus the tasks keeping it current.
///
/// Dropping the subscription tears down all three collection listeners at
/// once; receivers already cloned out of it simply stop seeing updates.
pub struct FeedSubscription {
    feed: ReportFeed,
    _tasks: FeedTasks,
}

impl FeedSubscription {
    pub fn new(feed: ReportFeed, tasks: FeedTasks) -> Self {
        Self {
            feed,
            _tasks: tasks,
        }
    }

    pub fn unavailable() -> Self {
        Self::new(ReportFeed::unavailable(), FeedTasks::default())
    }

    pub fn feed(&self) -> &ReportFeed {
        &self.feed
    }
}
