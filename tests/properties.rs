//! Property-based tests for the report engine.
//!
//! Random record sets (including out-of-range years, missing and inverted
//! yields, unknown categories) must keep every aggregate consistent.

use nuclear_report::domain::{Country, ExplosionRecord, Purpose, TestType, YieldCategory};
use nuclear_report::engine::{
    compute_country_stats, compute_purpose_breakdown, compute_temporal_breakdown, compute_type_breakdown,
    compute_yield_distribution,
};
use nuclear_report::domain::Granularity;
use nuclear_report::report::{Report, build_report};
use proptest::prelude::*;

/// Tolerance on percentage sums.
const PCT_TOL: f64 = 0.05;

fn record_strategy() -> impl Strategy<Value = ExplosionRecord> {
    let place = (
        prop::sample::select(Country::ALL.to_vec()),
        prop::sample::select(vec!["NTS", "SEMI KAZAKH", "MURUROA", "LOP NOR", ""]),
        1935..2010i32,
        0..13u32,
        0..32u32,
        prop::option::of(-60.0..75.0f64),
        prop::option::of(-180.0..180.0f64),
    );
    let data = (
        prop::option::of(-1.0..3.0f64),
        prop::option::of(-5.0..60_000.0f64),
        prop::option::of(0.0..60_000.0f64),
        prop::sample::select(Purpose::ALL.to_vec()),
        prop::sample::select(TestType::ALL.to_vec()),
        "[A-Z]{1,8}",
    );
    (place, data).prop_map(
        |(
            (country, region, year, month, day, latitude, longitude),
            (depth, yield_lower, yield_upper, purpose, test_type, name),
        )| ExplosionRecord {
            country,
            region: region.to_string(),
            year,
            month,
            day,
            latitude,
            longitude,
            depth,
            yield_lower,
            yield_upper,
            purpose,
            test_type,
            name,
        },
    )
}

fn records_and_permutation() -> impl Strategy<Value = (Vec<ExplosionRecord>, Vec<ExplosionRecord>)> {
    prop::collection::vec(record_strategy(), 0..60)
        .prop_flat_map(|records| (Just(records.clone()), Just(records).prop_shuffle()))
}

/// Issue details carry record positions; everything else must match exactly.
fn without_positions(mut report: Report) -> Report {
    report.anomalies.issues.clear();
    report
}

fn pct_sum<'a>(it: impl Iterator<Item = &'a f64>) -> f64 {
    it.sum()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Permuting the input leaves every aggregate unchanged.
    #[test]
    fn report_is_order_invariant((records, shuffled) in records_and_permutation()) {
        let a = without_positions(build_report(&records, 5));
        let b = without_positions(build_report(&shuffled, 5));
        prop_assert_eq!(a, b);
    }

    /// Full partitions account for every record.
    #[test]
    fn counts_are_conserved(records in prop::collection::vec(record_strategy(), 1..80)) {
        let n = records.len();

        let countries = compute_country_stats(&records).unwrap();
        prop_assert_eq!(countries.iter().map(|c| c.count).sum::<usize>(), n);

        let purposes = compute_purpose_breakdown(&records).unwrap();
        prop_assert_eq!(purposes.iter().map(|s| s.count).sum::<usize>(), n);

        let types = compute_type_breakdown(&records).unwrap();
        prop_assert_eq!(types.iter().map(|s| s.count).sum::<usize>(), n);

        for granularity in [Granularity::Year, Granularity::Decade, Granularity::Era] {
            let t = compute_temporal_breakdown(&records, granularity).unwrap();
            prop_assert_eq!(t.buckets.iter().map(|b| b.count).sum::<usize>() + t.out_of_range, n);
        }

        if let Ok(dist) = compute_yield_distribution(&records) {
            let with_yield = records.iter().filter(|r| r.representative_yield().is_some()).count();
            prop_assert_eq!(dist.with_yield, with_yield);
            prop_assert_eq!(dist.shares.iter().map(|s| s.count).sum::<usize>(), with_yield);
        }
    }

    /// Non-empty category breakdowns sum to 100%.
    #[test]
    fn percentages_close(records in prop::collection::vec(record_strategy(), 1..80)) {
        let purposes = compute_purpose_breakdown(&records).unwrap();
        prop_assert!((pct_sum(purposes.iter().map(|s| &s.percentage)) - 100.0).abs() <= PCT_TOL);

        let types = compute_type_breakdown(&records).unwrap();
        prop_assert!((pct_sum(types.iter().map(|s| &s.percentage)) - 100.0).abs() <= PCT_TOL);

        if let Ok(dist) = compute_yield_distribution(&records) {
            prop_assert!((pct_sum(dist.shares.iter().map(|s| &s.percentage)) - 100.0).abs() <= PCT_TOL);
        }
    }

    /// Categories respect their half-open boundaries.
    #[test]
    fn yield_buckets_are_monotonic(records in prop::collection::vec(record_strategy(), 1..80)) {
        for r in &records {
            let (Some(kt), Some(category)) = (r.representative_yield(), r.yield_category()) else {
                continue;
            };
            let in_bounds = match category {
                YieldCategory::Low => (0.0..20.0).contains(&kt),
                YieldCategory::Medium => (20.0..150.0).contains(&kt),
                YieldCategory::High => (150.0..1000.0).contains(&kt),
                YieldCategory::VeryHigh => kt >= 1000.0,
            };
            prop_assert!(in_bounds, "{kt} kt classified as {category:?}");
        }
    }

    /// Repeated top-N calls agree, and ranks follow yield.
    #[test]
    fn top_n_is_deterministic(records in prop::collection::vec(record_strategy(), 1..80)) {
        let first = nuclear_report::engine::compute_top_n(&records, 5);
        let second = nuclear_report::engine::compute_top_n(&records, 5);
        prop_assert_eq!(&first, &second);
        if let Ok(rows) = first {
            prop_assert!(rows.len() <= 5);
            prop_assert!(rows.windows(2).all(|w| w[0].representative_yield >= w[1].representative_yield));
        }
    }
}
