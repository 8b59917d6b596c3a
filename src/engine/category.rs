use std::collections::BTreeMap;

use crate::domain::{
    CategoryShare, ExplosionRecord, Purpose, RegionCount, TestType, Unavailable, YieldCategory,
    YieldDistribution,
};

use super::{percentage, require_records};

/// Shown in place of a blank region.
pub const UNSPECIFIED_REGION: &str = "(unspecified)";

/// Counts per yield category over records with usable yield data.
///
/// All four categories are listed, in category order, even when empty.
pub fn compute_yield_distribution(records: &[ExplosionRecord]) -> Result<YieldDistribution, Unavailable> {
    require_records(records)?;

    let categories: Vec<YieldCategory> = records.iter().filter_map(ExplosionRecord::yield_category).collect();
    if categories.is_empty() {
        return Err(Unavailable::NoYieldData);
    }

    let with_yield = categories.len();
    let shares = YieldCategory::ALL
        .into_iter()
        .map(|category| {
            let count = categories.iter().filter(|c| **c == category).count();
            CategoryShare {
                category,
                label: category.label().to_string(),
                count,
                percentage: percentage(count, with_yield),
            }
        })
        .collect();

    Ok(YieldDistribution { with_yield, shares })
}

/// Count and share of each purpose, over every record.
pub fn compute_purpose_breakdown(records: &[ExplosionRecord]) -> Result<Vec<CategoryShare<Purpose>>, Unavailable> {
    breakdown(records, |r| r.purpose, Purpose::label)
}

/// Count and share of each test type, over every record.
pub fn compute_type_breakdown(records: &[ExplosionRecord]) -> Result<Vec<CategoryShare<TestType>>, Unavailable> {
    breakdown(records, |r| r.test_type, TestType::label)
}

/// Full partition of `records` by `key`. Categories with no records are
/// left out; the rest sort by count (descending), then category order.
fn breakdown<K: Copy + Ord>(
    records: &[ExplosionRecord],
    key: impl Fn(&ExplosionRecord) -> K,
    label: impl Fn(K) -> &'static str,
) -> Result<Vec<CategoryShare<K>>, Unavailable> {
    require_records(records)?;

    let mut counts: BTreeMap<K, usize> = BTreeMap::new();
    for r in records {
        *counts.entry(key(r)).or_default() += 1;
    }

    let mut out: Vec<CategoryShare<K>> = counts
        .into_iter()
        .map(|(category, count)| CategoryShare {
            category,
            label: label(category).to_string(),
            count,
            percentage: percentage(count, records.len()),
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then(a.category.cmp(&b.category)));
    Ok(out)
}

/// The `n` regions with the most tests; ties broken by region name.
pub fn compute_region_ranking(records: &[ExplosionRecord], n: usize) -> Result<Vec<RegionCount>, Unavailable> {
    require_records(records)?;

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for r in records {
        let region = r.region.trim();
        let region = if region.is_empty() { UNSPECIFIED_REGION } else { region };
        *counts.entry(region).or_default() += 1;
    }

    let mut out: Vec<RegionCount> = counts
        .into_iter()
        .map(|(region, count)| RegionCount {
            region: region.to_string(),
            count,
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.region.cmp(&b.region)));
    out.truncate(n);
    Ok(out)
}
