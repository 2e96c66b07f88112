//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod memory_store;
pub mod pg_store;
pub mod report_feed;
pub mod stream_hub;
pub mod traits;

pub use deps::ServerDeps;
pub use memory_store::InMemoryReportStore;
pub use pg_store::{PgReportStore, REPORTS_CHANGED_CHANNEL};
pub use report_feed::{FeedSubscription, FeedTasks, ReportFeed, Snapshot};
pub use stream_hub::StreamHub;
pub use traits::*;
