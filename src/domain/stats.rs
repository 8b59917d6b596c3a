//! Aggregate entities produced by the engine.
//!
//! All of these are plain serializable records, created fresh per run and
//! never written back into the dataset.

use serde::{Deserialize, Serialize};

use super::outcome::Section;
use super::types::{Country, ExplosionRecord, Field, Granularity, GroupField, Purpose, YieldCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub first: i32,
    pub last: i32,
}

/// Descriptive statistics over representative yields (kilotons).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldSummary {
    /// Records contributing a representative yield.
    pub n: usize,
    pub total: f64,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation; `None` with fewer than two values.
    pub std_dev: Option<f64>,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallStats {
    /// Every record, including those without yield data.
    pub count: usize,
    pub year_range: Section<YearRange>,
    /// Distinct known countries.
    pub country_count: usize,
    pub yield_stats: Section<YieldSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryStats {
    pub country: Country,
    pub count: usize,
    /// Tests of this country with usable yield data.
    pub yields_counted: usize,
    pub total_yield: Option<f64>,
    pub average_yield: Option<f64>,
    pub max_yield: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalBucket {
    /// First year of the period (inclusive).
    pub start: i32,
    /// Last year of the period (inclusive).
    pub end: i32,
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalBreakdown {
    pub granularity: Granularity,
    pub buckets: Vec<TemporalBucket>,
    /// Records excluded because their year lies outside the study period.
    pub out_of_range: usize,
}

/// Count and percentage for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare<K> {
    pub category: K,
    pub label: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldDistribution {
    /// Denominator of the percentages.
    pub with_yield: usize,
    /// One entry per category, in category order.
    pub shares: Vec<CategoryShare<YieldCategory>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTest {
    pub rank: usize,
    pub representative_yield: f64,
    pub record: ExplosionRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    pub field_a: Field,
    pub field_b: Field,
    /// Records where both fields are present.
    pub n: usize,
    pub coefficient: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationEntry {
    pub field_a: Field,
    pub field_b: Field,
    pub result: Section<Correlation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub label: String,
    pub n: usize,
    pub mean: f64,
    pub std_dev: f64,
}

/// Welch's unequal-variance t-test between two groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupComparison {
    pub group_field: GroupField,
    pub metric: Field,
    pub first: GroupSummary,
    pub second: GroupSummary,
    pub statistic: f64,
    pub degrees_of_freedom: f64,
    /// Two-sided.
    pub p_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonEntry {
    pub group_field: GroupField,
    pub first: String,
    pub second: String,
    pub metric: Field,
    pub result: Section<GroupComparison>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    YearOutOfRange,
    InvalidDate,
    MissingYield,
    InvertedYieldBounds,
    NegativeYield,
    UnknownCountry,
    UnknownPurpose,
    UnknownType,
}

impl AnomalyKind {
    pub const ALL: [AnomalyKind; 8] = [
        AnomalyKind::YearOutOfRange,
        AnomalyKind::InvalidDate,
        AnomalyKind::MissingYield,
        AnomalyKind::InvertedYieldBounds,
        AnomalyKind::NegativeYield,
        AnomalyKind::UnknownCountry,
        AnomalyKind::UnknownPurpose,
        AnomalyKind::UnknownType,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AnomalyKind::YearOutOfRange => "year outside 1945-1998",
            AnomalyKind::InvalidDate => "impossible calendar date",
            AnomalyKind::MissingYield => "missing yield bounds",
            AnomalyKind::InvertedYieldBounds => "yield_upper < yield_lower",
            AnomalyKind::NegativeYield => "negative yield",
            AnomalyKind::UnknownCountry => "unknown country",
            AnomalyKind::UnknownPurpose => "unknown purpose",
            AnomalyKind::UnknownType => "unknown type",
        }
    }
}

/// A data-quality finding for one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataQualityIssue {
    /// Position of the record in the input slice.
    pub index: usize,
    pub name: String,
    pub kind: AnomalyKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyCount {
    pub kind: AnomalyKind,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyReport {
    pub records_scanned: usize,
    /// Records with at least one issue.
    pub flagged_records: usize,
    /// Non-zero tallies, in kind order.
    pub counts: Vec<AnomalyCount>,
    pub issues: Vec<DataQualityIssue>,
}

impl AnomalyReport {
    pub fn count(&self, kind: AnomalyKind) -> usize {
        self.counts
            .iter()
            .find(|c| c.kind == kind)
            .map(|c| c.count)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingField {
    pub field: String,
    pub missing: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakYear {
    pub year: i32,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CumulativePoint {
    pub year: i32,
    pub count: usize,
    pub cumulative: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyYield {
    pub year: i32,
    pub n: usize,
    pub mean: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryTrend {
    pub country: Country,
    pub points: Vec<YearCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionCount {
    pub region: String,
    pub count: usize,
}

/// Country × purpose counts. `counts[i][j]` is `countries[i]` × `purposes[j]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossTab {
    pub countries: Vec<Country>,
    pub purposes: Vec<Purpose>,
    pub counts: Vec<Vec<usize>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColdWarShare {
    /// Tests in 1947-1991.
    pub cold_war: usize,
    pub cold_war_percentage: f64,
    /// Tests after 1991.
    pub post_cold_war: usize,
}

/// Location of a single test, for geographic scatter charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestLocation {
    pub country: Country,
    pub latitude: f64,
    pub longitude: f64,
}
