use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

use crate::domains::locations::LocationResolver;
use crate::domains::reports::{Report, ReportKind, UnknownReportKind};

#[derive(Debug, Error, PartialEq)]
pub enum StatisticsFilterError {
    #[error("Invalid {field} date '{value}', expected YYYY-MM-DD")]
    InvalidDate { field: &'static str, value: String },

    #[error(transparent)]
    UnknownType(#[from] UnknownReportKind),
}

/// Statistics panel filter: date range, enabled report types, district.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatisticsFilter {
    /// Inclusive, by UTC calendar day.
    pub from: Option<NaiveDate>,
    /// Inclusive, by UTC calendar day.
    pub to: Option<NaiveDate>,
    /// Enabled types. Empty means every type.
    pub kinds: BTreeSet<ReportKind>,
    pub district: Option<String>,
}

impl StatisticsFilter {
    /// Build a filter from raw query values. Blank values count as absent;
    /// `types` is a comma-separated list such as `lost,abuse`.
    pub fn parse(
        from: Option<&str>,
        to: Option<&str>,
        types: Option<&str>,
        district: Option<&str>,
    ) -> Result<Self, StatisticsFilterError> {
        let kinds = non_blank(types)
            .map(|types| {
                types
                    .split(',')
                    .filter(|t| !t.trim().is_empty())
                    .map(str::parse)
                    .collect::<Result<BTreeSet<ReportKind>, _>>()
            })
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            from: parse_date("from", from)?,
            to: parse_date("to", to)?,
            kinds,
            district: non_blank(district).map(str::to_string),
        })
    }

    pub fn includes_kind(&self, kind: ReportKind) -> bool {
        self.kinds.is_empty() || self.kinds.contains(&kind)
    }

    pub fn includes_date(&self, report: &Report) -> bool {
        let day = report.created_at.date_naive();
        self.from.map_or(true, |from| day >= from) && self.to.map_or(true, |to| day <= to)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_date(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<NaiveDate>, StatisticsFilterError> {
    non_blank(value)
        .map(|v| {
            NaiveDate::parse_from_str(v, "%Y-%m-%d").map_err(|_| {
                StatisticsFilterError::InvalidDate {
                    field,
                    value: v.to_string(),
                }
            })
        })
        .transpose()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TypeCounts {
    pub lost: usize,
    pub found: usize,
    pub abuse: usize,
}

impl TypeCounts {
    fn record(&mut self, kind: ReportKind) {
        match kind {
            ReportKind::Lost => self.lost += 1,
            ReportKind::Found => self.found += 1,
            ReportKind::Abuse => self.abuse += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistrictCount {
    pub district: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsSummary {
    pub total: usize,
    pub by_type: TypeCounts,
    /// Most reports first, ties by district name.
    pub by_district: Vec<DistrictCount>,
    /// Matching reports that belong to no named district.
    pub unassigned: usize,
    pub no_reports_found: bool,
    pub feed_available: bool,
}

/// Count reports for the statistics panel.
///
/// District membership comes from the same resolver the heat map uses, so
/// the panel and the markers always agree on which district a report is in.
/// An unavailable feed is a normal, empty result.
pub fn compute_statistics(
    reports: &[Report],
    filter: &StatisticsFilter,
    resolver: &LocationResolver,
    feed_available: bool,
) -> StatisticsSummary {
    let mut by_type = TypeCounts::default();
    let mut by_district: BTreeMap<String, usize> = BTreeMap::new();
    let mut unassigned = 0;
    let mut total = 0;

    let selected = filter.district.as_deref();

    for report in reports {
        if !filter.includes_kind(report.kind()) || !filter.includes_date(report) {
            continue;
        }

        let district = resolver.district_of(report.location());
        if let Some(selected) = selected {
            let in_selected = district
                .as_deref()
                .is_some_and(|d| d.eq_ignore_ascii_case(selected));
            if !in_selected {
                continue;
            }
        }

        total += 1;
        by_type.record(report.kind());
        match district {
            Some(district) => *by_district.entry(district).or_default() += 1,
            None => unassigned += 1,
        }
    }

    let mut by_district: Vec<DistrictCount> = by_district
        .into_iter()
        .map(|(district, count)| DistrictCount { district, count })
        .collect();
    // stable: BTreeMap order already sorts ties by name
    by_district.sort_by(|a, b| b.count.cmp(&a.count));

    StatisticsSummary {
        total,
        by_type,
        by_district,
        unassigned,
        no_reports_found: total == 0,
        feed_available,
    }
}
