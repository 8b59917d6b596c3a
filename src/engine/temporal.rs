use std::collections::BTreeMap;

use crate::domain::{
    ColdWarShare, CumulativePoint, Era, ExplosionRecord, Granularity, PeakYear, TemporalBreakdown,
    TemporalBucket, Unavailable, YearlyYield,
};
use crate::math::describe;

use super::{percentage, require_records};

const COLD_WAR_START: i32 = 1947;
const COLD_WAR_END: i32 = 1991;

/// Test counts per year, decade, or era, ascending by period start.
///
/// Records dated outside the study period are left out of every bucket and
/// counted in `out_of_range`. Era breakdowns always list all five eras.
pub fn compute_temporal_breakdown(
    records: &[ExplosionRecord],
    granularity: Granularity,
) -> Result<TemporalBreakdown, Unavailable> {
    require_records(records)?;

    let in_range = records.iter().filter(|r| r.in_study_period());
    let out_of_range = records.len() - in_range.clone().count();

    let buckets = match granularity {
        Granularity::Year => {
            let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
            for r in in_range {
                *counts.entry(r.year).or_default() += 1;
            }
            counts
                .into_iter()
                .map(|(year, count)| TemporalBucket {
                    start: year,
                    end: year,
                    label: year.to_string(),
                    count,
                })
                .collect()
        }
        Granularity::Decade => {
            let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
            for r in in_range {
                *counts.entry(r.decade()).or_default() += 1;
            }
            counts
                .into_iter()
                .map(|(decade, count)| TemporalBucket {
                    start: decade,
                    end: decade + 9,
                    label: format!("{decade}s"),
                    count,
                })
                .collect()
        }
        Granularity::Era => {
            let mut counts: BTreeMap<Era, usize> = Era::ALL.iter().map(|e| (*e, 0)).collect();
            for era in in_range.filter_map(ExplosionRecord::era) {
                *counts.entry(era).or_default() += 1;
            }
            counts
                .into_iter()
                .map(|(era, count)| {
                    let (start, end) = era.span();
                    TemporalBucket {
                        start,
                        end,
                        label: era.label().to_string(),
                        count,
                    }
                })
                .collect()
        }
    };

    Ok(TemporalBreakdown {
        granularity,
        buckets,
        out_of_range,
    })
}

/// Year with the most tests; ties resolve to the earliest year.
pub fn compute_peak_year(records: &[ExplosionRecord]) -> Result<PeakYear, Unavailable> {
    let by_year = compute_temporal_breakdown(records, Granularity::Year)?;
    by_year
        .buckets
        .iter()
        .fold(None::<PeakYear>, |best, b| match best {
            Some(p) if p.count >= b.count => Some(p),
            _ => Some(PeakYear {
                year: b.start,
                count: b.count,
            }),
        })
        .ok_or(Unavailable::TooFewRecords { needed: 1, found: 0 })
}

/// Running total of tests per year.
pub fn compute_cumulative_by_year(records: &[ExplosionRecord]) -> Result<Vec<CumulativePoint>, Unavailable> {
    let by_year = compute_temporal_breakdown(records, Granularity::Year)?;
    let mut running = 0;
    Ok(by_year
        .buckets
        .into_iter()
        .map(|b| {
            running += b.count;
            CumulativePoint {
                year: b.start,
                count: b.count,
                cumulative: running,
            }
        })
        .collect())
}

/// Mean representative yield per year, for years with any yield data.
pub fn compute_yearly_mean_yield(records: &[ExplosionRecord]) -> Result<Vec<YearlyYield>, Unavailable> {
    require_records(records)?;

    let mut per_year: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    for r in records.iter().filter(|r| r.in_study_period()) {
        if let Some(y) = r.representative_yield() {
            per_year.entry(r.year).or_default().push(y);
        }
    }

    Ok(per_year
        .into_iter()
        .filter_map(|(year, yields)| {
            let d = describe(yields)?;
            Some(YearlyYield {
                year,
                n: d.n,
                mean: d.mean,
            })
        })
        .collect())
}

/// Share of tests during the Cold War (1947-1991) and count after it.
///
/// The percentage is taken over every record, matching the headline count.
pub fn compute_cold_war_share(records: &[ExplosionRecord]) -> Result<ColdWarShare, Unavailable> {
    require_records(records)?;

    let in_range = records.iter().filter(|r| r.in_study_period());
    let cold_war = in_range
        .clone()
        .filter(|r| (COLD_WAR_START..=COLD_WAR_END).contains(&r.year))
        .count();
    let post_cold_war = in_range.filter(|r| r.year > COLD_WAR_END).count();

    Ok(ColdWarShare {
        cold_war,
        cold_war_percentage: percentage(cold_war, records.len()),
        post_cold_war,
    })
}
