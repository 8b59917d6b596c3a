use std::cmp::Ordering;

use crate::domain::{ExplosionRecord, RankedTest, Unavailable};

use super::require_records;

/// The `n` largest tests by representative yield.
///
/// Ties break by year (ascending), then name, then the remaining fields, so
/// the ranking is a total order and does not depend on input order. Records
/// without usable yield data are not ranked.
pub fn compute_top_n(records: &[ExplosionRecord], n: usize) -> Result<Vec<RankedTest>, Unavailable> {
    require_records(records)?;

    let mut ranked: Vec<(f64, &ExplosionRecord)> = records
        .iter()
        .filter_map(|r| r.representative_yield().map(|y| (y, r)))
        .collect();
    if ranked.is_empty() {
        return Err(Unavailable::NoYieldData);
    }

    ranked.sort_by(|(ya, a), (yb, b)| yb.total_cmp(ya).then_with(|| tie_break(a, b)));

    Ok(ranked
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(i, (representative_yield, record))| RankedTest {
            rank: i + 1,
            representative_yield,
            record: record.clone(),
        })
        .collect())
}

fn tie_break(a: &ExplosionRecord, b: &ExplosionRecord) -> Ordering {
    a.year
        .cmp(&b.year)
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.country.cmp(&b.country))
        .then_with(|| (a.month, a.day).cmp(&(b.month, b.day)))
        .then_with(|| a.region.cmp(&b.region))
        .then_with(|| cmp_opt(a.latitude, b.latitude))
        .then_with(|| cmp_opt(a.longitude, b.longitude))
        .then_with(|| cmp_opt(a.depth, b.depth))
        .then_with(|| cmp_opt(a.yield_lower, b.yield_lower))
        .then_with(|| cmp_opt(a.yield_upper, b.yield_upper))
        .then_with(|| a.purpose.cmp(&b.purpose))
        .then_with(|| a.test_type.cmp(&b.test_type))
}

fn cmp_opt(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
    }
}
