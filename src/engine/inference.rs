use crate::domain::{
    Correlation, CorrelationEntry, ExplosionRecord, Field, GroupComparison, GroupField, GroupSummary,
    Unavailable,
};
use crate::math::{describe, pearson, welch_t_test};

use super::require_records;

/// Fields included in the report's correlation matrix.
pub const CORRELATION_FIELDS: [Field; 5] = [
    Field::Year,
    Field::Latitude,
    Field::Longitude,
    Field::Depth,
    Field::Yield,
];

/// Pearson correlation between two numeric fields.
///
/// Only records where both fields are present take part. Fewer than two
/// such records, or a field with no variation, is not available.
pub fn compute_correlation(records: &[ExplosionRecord], a: Field, b: Field) -> Result<Correlation, Unavailable> {
    require_records(records)?;

    let pairs: Vec<(f64, f64)> = records
        .iter()
        .filter_map(|r| Some((r.field(a)?, r.field(b)?)))
        .collect();
    if pairs.len() < 2 {
        return Err(Unavailable::TooFewRecords {
            needed: 2,
            found: pairs.len(),
        });
    }

    let coefficient = pearson(&pairs).ok_or(Unavailable::ZeroVariance)?;
    Ok(Correlation {
        field_a: a,
        field_b: b,
        n: pairs.len(),
        coefficient,
    })
}

/// Correlations for every unordered pair of `fields`, in field order.
pub fn compute_correlation_matrix(records: &[ExplosionRecord], fields: &[Field]) -> Vec<CorrelationEntry> {
    let mut out = Vec::new();
    for (i, &a) in fields.iter().enumerate() {
        for &b in &fields[i + 1..] {
            out.push(CorrelationEntry {
                field_a: a,
                field_b: b,
                result: compute_correlation(records, a, b).into(),
            });
        }
    }
    out
}

/// Welch's t-test on `metric` between two groups of `group_field`.
///
/// Group values are parsed leniently (`"USA"`, `"underground"`, `"1960s"`,
/// `"1963-1974"`); a value that names no group yields an empty group. Each
/// group needs at least two records carrying `metric`.
pub fn compare_groups(
    records: &[ExplosionRecord],
    group_field: GroupField,
    first: &str,
    second: &str,
    metric: Field,
) -> Result<GroupComparison, Unavailable> {
    require_records(records)?;

    let values = |raw: &str| -> Vec<f64> {
        match group_field.key(raw) {
            Some(key) => records
                .iter()
                .filter(|r| r.belongs_to(key))
                .filter_map(|r| r.field(metric))
                .collect(),
            None => Vec::new(),
        }
    };
    let (a, b) = (values(first), values(second));

    let found = a.len().min(b.len());
    if found < 2 {
        return Err(Unavailable::TooFewRecords { needed: 2, found });
    }

    let too_few = Unavailable::TooFewRecords { needed: 2, found };
    let da = describe(a).ok_or(too_few)?;
    let db = describe(b).ok_or(too_few)?;
    let test = welch_t_test(&da, &db).ok_or(Unavailable::ZeroVariance)?;

    let summary = |label: &str, d: &crate::math::Describe| GroupSummary {
        label: label.trim().to_string(),
        n: d.n,
        mean: d.mean,
        std_dev: d.std_dev().unwrap_or(0.0),
    };

    Ok(GroupComparison {
        group_field,
        metric,
        first: summary(first, &da),
        second: summary(second, &db),
        statistic: test.statistic,
        degrees_of_freedom: test.degrees_of_freedom,
        p_value: test.p_value,
    })
}
