// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Naming convention: Base* for trait names (e.g., BaseReportStore)

use anyhow::Result;
use async_trait::async_trait;

use crate::common::ReportId;
use crate::domains::reports::{Report, ReportKind};
use crate::kernel::report_feed::FeedSubscription;

// =============================================================================
// Report store (Infrastructure - document collections with change push)
// =============================================================================

#[async_trait]
pub trait BaseReportStore: Send + Sync {
    /// Open a live subscription to all three report collections.
    async fn subscribe(&self) -> Result<FeedSubscription>;

    /// Add a report to its collection.
    async fn insert(&self, report: &Report) -> Result<()>;

    /// Single-shot delete. Subscribers see the change through the store's
    /// own push, not through this call. Returns `false` if nothing matched.
    async fn delete(&self, kind: ReportKind, id: ReportId) -> Result<bool>;
}
