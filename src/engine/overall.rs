use crate::domain::{Country, ExplosionRecord, OverallStats, Section, Unavailable, YearRange, YieldSummary};
use crate::math::describe;

use super::require_records;

/// Headline numbers: counts, study period, and yield statistics.
///
/// Records without usable yield data count toward `count` but not toward
/// the yield statistics.
pub fn compute_overall_stats(records: &[ExplosionRecord]) -> Result<OverallStats, Unavailable> {
    require_records(records)?;

    let mut countries: Vec<_> = records
        .iter()
        .map(|r| r.country)
        .filter(|c| *c != Country::Unknown)
        .collect();
    countries.sort_unstable();
    countries.dedup();

    Ok(OverallStats {
        count: records.len(),
        year_range: year_range(records).into(),
        country_count: countries.len(),
        yield_stats: Section::from(compute_yield_summary(records)),
    })
}

/// Descriptive statistics over representative yields.
pub fn compute_yield_summary(records: &[ExplosionRecord]) -> Result<YieldSummary, Unavailable> {
    require_records(records)?;

    let d = describe(records.iter().filter_map(ExplosionRecord::representative_yield))
        .ok_or(Unavailable::NoYieldData)?;

    Ok(YieldSummary {
        n: d.n,
        total: d.sum,
        mean: d.mean,
        median: d.median,
        std_dev: d.std_dev(),
        min: d.min,
        max: d.max,
    })
}

fn year_range(records: &[ExplosionRecord]) -> Result<YearRange, Unavailable> {
    let years = records.iter().filter(|r| r.in_study_period()).map(|r| r.year);
    let first = years.clone().min();
    let last = years.max();
    match (first, last) {
        (Some(first), Some(last)) => Ok(YearRange { first, last }),
        _ => Err(Unavailable::TooFewRecords { needed: 1, found: 0 }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fixtures::{rec, scenario};

    #[test]
    fn scenario_overall() {
        let stats = compute_overall_stats(&scenario()).unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.country_count, 2);
        assert_eq!(
            stats.year_range.value(),
            Some(&YearRange { first: 1962, last: 1970 })
        );

        let y = stats.yield_stats.value().unwrap();
        assert_eq!(y.max, 50_000.0);
        assert_eq!(y.min, 15.0);
        assert!((y.mean - 16_705.0).abs() < 1e-9);
        assert_eq!(y.median, 100.0);
    }

    #[test]
    fn records_without_yield_still_count() {
        let records = vec![
            rec(Country::Usa, 1960, Some(10.0), "A"),
            rec(Country::Usa, 1961, None, "B"),
        ];
        let stats = compute_overall_stats(&records).unwrap();
        assert_eq!(stats.count, 2);
        let y = stats.yield_stats.value().unwrap();
        assert_eq!(y.n, 1);
        assert_eq!(y.std_dev, None);
    }

    #[test]
    fn no_yield_data_is_not_available() {
        let records = vec![rec(Country::Uk, 1957, None, "A")];
        let stats = compute_overall_stats(&records).unwrap();
        assert_eq!(stats.yield_stats.reason(), Some(Unavailable::NoYieldData));
    }

    #[test]
    fn empty_input_is_not_available() {
        assert_eq!(compute_overall_stats(&[]), Err(Unavailable::EmptyInput));
        assert_eq!(compute_yield_summary(&[]), Err(Unavailable::EmptyInput));
    }

    #[test]
    fn out_of_range_years_do_not_widen_the_period() {
        let records = vec![
            rec(Country::Usa, 1944, Some(10.0), "A"),
            rec(Country::Usa, 1950, Some(10.0), "B"),
        ];
        let stats = compute_overall_stats(&records).unwrap();
        assert_eq!(
            stats.year_range.value(),
            Some(&YearRange { first: 1950, last: 1950 })
        );
    }
}
