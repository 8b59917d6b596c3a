//! The structured report: every engine aggregate under a stable key.
//!
//! `build_report` is the only place that decides which sections exist and
//! with which parameters. Renderers (text, ASCII, SVG, JSON, CSV series)
//! consume a `Report` and never call the engine themselves.

pub mod charts;
pub mod format;
pub mod insights;

pub use charts::*;
pub use format::*;
pub use insights::*;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{
    AnomalyReport, CategoryShare, ColdWarShare, ComparisonEntry, CorrelationEntry, CountryStats, CountryTrend,
    CrossTab, CumulativePoint, ExplosionRecord, Field, Granularity, GroupField, MissingField, OverallStats,
    PeakYear, Purpose, RankedTest, RegionCount, Section, TemporalBreakdown, TestLocation, TestType,
    Unavailable, YearlyYield, YieldDistribution,
};
use crate::engine;

/// Countries shown in the per-year trend chart.
pub const TREND_COUNTRIES: usize = 5;
/// Regions listed in `by_region`.
pub const REGION_LIMIT: usize = 15;
/// Rows of the country × purpose table.
pub const CROSSTAB_COUNTRIES: usize = 8;
/// Countries whose test sites appear in `locations`.
pub const LOCATION_COUNTRIES: usize = 5;

/// Group comparisons included in every report.
pub const DEFAULT_COMPARISONS: [(GroupField, &str, &str, Field); 2] = [
    (GroupField::Country, "USA", "USSR", Field::Yield),
    (GroupField::Type, "underground", "atmospheric", Field::Yield),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub overall: Section<OverallStats>,
    pub by_country: Section<Vec<CountryStats>>,
    pub by_year: Section<TemporalBreakdown>,
    pub by_decade: Section<TemporalBreakdown>,
    pub by_era: Section<TemporalBreakdown>,
    pub yield_distribution: Section<YieldDistribution>,
    pub by_purpose: Section<Vec<CategoryShare<Purpose>>>,
    pub by_type: Section<Vec<CategoryShare<TestType>>>,
    pub top_n: Section<Vec<RankedTest>>,
    /// Independent of the `top_n` size, so it survives `--top 0`.
    pub largest_test: Section<RankedTest>,
    pub correlations: Vec<CorrelationEntry>,
    pub comparisons: Vec<ComparisonEntry>,
    pub anomalies: AnomalyReport,
    pub missing_values: Vec<MissingField>,
    pub peak_year: Section<PeakYear>,
    pub cumulative_by_year: Section<Vec<CumulativePoint>>,
    pub yearly_mean_yield: Section<Vec<YearlyYield>>,
    pub country_trends: Section<Vec<CountryTrend>>,
    pub by_region: Section<Vec<RegionCount>>,
    pub country_purpose: Section<CrossTab>,
    pub cold_war: Section<ColdWarShare>,
    pub locations: Section<Vec<TestLocation>>,
    pub insights: Vec<String>,
}

/// Run every aggregate over `records`.
///
/// Always produces a report; sections that cannot be computed are marked
/// not available.
pub fn build_report(records: &[ExplosionRecord], top_n: usize) -> Report {
    debug!(records = records.len(), top_n, "building report");

    let comparisons = DEFAULT_COMPARISONS
        .iter()
        .map(|&(group_field, first, second, metric)| ComparisonEntry {
            group_field,
            first: first.to_string(),
            second: second.to_string(),
            metric,
            result: engine::compare_groups(records, group_field, first, second, metric).into(),
        })
        .collect();

    let mut report = Report {
        overall: engine::compute_overall_stats(records).into(),
        by_country: engine::compute_country_stats(records).into(),
        by_year: engine::compute_temporal_breakdown(records, Granularity::Year).into(),
        by_decade: engine::compute_temporal_breakdown(records, Granularity::Decade).into(),
        by_era: engine::compute_temporal_breakdown(records, Granularity::Era).into(),
        yield_distribution: engine::compute_yield_distribution(records).into(),
        by_purpose: engine::compute_purpose_breakdown(records).into(),
        by_type: engine::compute_type_breakdown(records).into(),
        top_n: engine::compute_top_n(records, top_n).into(),
        largest_test: engine::compute_top_n(records, 1)
            .and_then(|top| top.into_iter().next().ok_or(Unavailable::NoYieldData))
            .into(),
        correlations: engine::compute_correlation_matrix(records, &engine::CORRELATION_FIELDS),
        comparisons,
        anomalies: engine::scan_anomalies(records),
        missing_values: engine::compute_missing_values(records),
        peak_year: engine::compute_peak_year(records).into(),
        cumulative_by_year: engine::compute_cumulative_by_year(records).into(),
        yearly_mean_yield: engine::compute_yearly_mean_yield(records).into(),
        country_trends: engine::compute_country_trends(records, TREND_COUNTRIES).into(),
        by_region: engine::compute_region_ranking(records, REGION_LIMIT).into(),
        country_purpose: engine::compute_country_purpose(records, CROSSTAB_COUNTRIES).into(),
        cold_war: engine::compute_cold_war_share(records).into(),
        locations: engine::compute_locations(records, LOCATION_COUNTRIES).into(),
        insights: Vec::new(),
    };
    report.insights = key_insights(&report);
    report
}
