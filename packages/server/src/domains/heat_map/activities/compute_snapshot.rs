use std::collections::btree_map::Entry;
use tracing::debug;

use crate::domains::heat_map::models::{AggregatedPoint, CoordinateKey, HeatMapSnapshot};
use crate::domains::locations::LocationResolver;
use crate::domains::reports::Report;

/// Fold every report into per-location counts.
///
/// All reports are mapped regardless of any statistics filter, so the heat
/// map always shows full historical density. Reports with an empty or
/// unresolvable location are skipped and never affect `max_count`.
pub fn compute_heat_map_snapshot(
    reports: &[Report],
    resolver: &LocationResolver,
) -> HeatMapSnapshot {
    let mut snapshot = HeatMapSnapshot {
        total_reports: reports.len(),
        ..HeatMapSnapshot::default()
    };

    for report in reports {
        let Some(resolved) = resolver.resolve(report.location()) else {
            debug!(report_id = %report.id, kind = %report.kind(), "Report has no mappable location");
            snapshot.unresolved += 1;
            continue;
        };
        let resolved = resolved.with_kind(report.kind());

        let key = CoordinateKey::from_coordinate(resolved.coordinate());
        let count = match snapshot.points.entry(key) {
            Entry::Occupied(mut entry) => {
                let point = entry.get_mut();
                point.record(report.kind());
                point.count
            }
            Entry::Vacant(entry) => {
                entry
                    .insert(AggregatedPoint::new(key, report.kind(), resolved.location))
                    .count
            }
        };
        snapshot.max_count = snapshot.max_count.max(count);
    }

    snapshot
}
