//! End-to-end checks on small fixed inputs through the public API.

use nuclear_report::domain::{
    Country, ExplosionRecord, Field, Granularity, GroupField, Purpose, Section, TestType, Unavailable, YieldCategory,
};
use nuclear_report::engine::*;
use nuclear_report::report::{build_charts, build_report, format_report};

fn rec(country: Country, year: i32, kt: f64, name: &str) -> ExplosionRecord {
    ExplosionRecord {
        country,
        region: "SITE".to_string(),
        year,
        month: 6,
        day: 1,
        latitude: Some(40.0),
        longitude: Some(60.0),
        depth: None,
        yield_lower: Some(kt),
        yield_upper: Some(kt),
        purpose: Purpose::WeaponsResearch,
        test_type: TestType::Atmospheric,
        name: name.to_string(),
    }
}

fn three_tests() -> Vec<ExplosionRecord> {
    vec![
        rec(Country::Usa, 1962, 100.0, "A"),
        rec(Country::Ussr, 1962, 50_000.0, "B"),
        rec(Country::Usa, 1970, 15.0, "C"),
    ]
}

#[test]
fn three_test_overall() {
    let overall = compute_overall_stats(&three_tests()).unwrap();
    assert_eq!(overall.count, 3);
    let y = overall.yield_stats.value().unwrap();
    assert_eq!(y.max, 50_000.0);
    assert_eq!(y.min, 15.0);
    assert!((y.mean - 16_705.0).abs() < 1e-9);
}

#[test]
fn three_test_countries() {
    let stats = compute_country_stats(&three_tests()).unwrap();
    assert_eq!(stats.len(), 2);
    let usa = stats.iter().find(|c| c.country == Country::Usa).unwrap();
    let ussr = stats.iter().find(|c| c.country == Country::Ussr).unwrap();
    assert_eq!((usa.count, ussr.count), (2, 1));
}

#[test]
fn three_test_yield_distribution() {
    let dist = compute_yield_distribution(&three_tests()).unwrap();
    let categories: Vec<YieldCategory> = dist.shares.iter().map(|s| s.category).collect();
    assert_eq!(categories, YieldCategory::ALL.to_vec());
    let pct: Vec<String> = dist.shares.iter().map(|s| format!("{:.1}", s.percentage)).collect();
    assert_eq!(pct, vec!["33.3", "33.3", "0.0", "33.3"]);
}

#[test]
fn twenty_kilotons_is_medium() {
    assert_eq!(YieldCategory::classify(20.0), Some(YieldCategory::Medium));
    assert_eq!(YieldCategory::classify(19.999), Some(YieldCategory::Low));
    assert_eq!(YieldCategory::classify(1000.0), Some(YieldCategory::VeryHigh));
}

#[test]
fn top_n_ties_break_by_year_then_name() {
    let records = vec![
        rec(Country::Usa, 1970, 100.0, "LATE"),
        rec(Country::Usa, 1955, 100.0, "ZULU"),
        rec(Country::Usa, 1955, 100.0, "ALPHA"),
        rec(Country::Ussr, 1961, 50_000.0, "BIG"),
    ];
    let top = compute_top_n(&records, 3).unwrap();
    let names: Vec<&str> = top.iter().map(|r| r.record.name.as_str()).collect();
    assert_eq!(names, vec!["BIG", "ALPHA", "ZULU"]);
    assert_eq!(top.iter().map(|r| r.rank).collect::<Vec<_>>(), vec![1, 2, 3]);
}

#[test]
fn every_operation_is_safe_on_empty_input() {
    let empty: [ExplosionRecord; 0] = [];
    assert_eq!(compute_overall_stats(&empty), Err(Unavailable::EmptyInput));
    assert_eq!(compute_country_stats(&empty), Err(Unavailable::EmptyInput));
    for g in [Granularity::Year, Granularity::Decade, Granularity::Era] {
        assert_eq!(compute_temporal_breakdown(&empty, g), Err(Unavailable::EmptyInput));
    }
    assert_eq!(compute_yield_distribution(&empty), Err(Unavailable::EmptyInput));
    assert_eq!(compute_purpose_breakdown(&empty), Err(Unavailable::EmptyInput));
    assert_eq!(compute_type_breakdown(&empty), Err(Unavailable::EmptyInput));
    assert_eq!(compute_top_n(&empty, 5), Err(Unavailable::EmptyInput));
    assert_eq!(
        compute_correlation(&empty, Field::Year, Field::Yield),
        Err(Unavailable::EmptyInput)
    );
    assert_eq!(
        compare_groups(&empty, GroupField::Country, "USA", "USSR", Field::Yield),
        Err(Unavailable::EmptyInput)
    );

    let report = build_report(&empty, 10);
    assert!(!report.overall.is_available());
    assert!(report.correlations.iter().all(|c| !c.result.is_available()));
    assert!(report.insights.is_empty());
    assert!(build_charts(&report).is_empty());
    assert!(format_report(&report).contains("not available (no records)"));
}

#[test]
fn missing_yield_everywhere_is_reported_not_zeroed() {
    let mut records = three_tests();
    for r in &mut records {
        r.yield_lower = None;
        r.yield_upper = None;
    }
    let report = build_report(&records, 5);
    assert!(report.overall.is_available());
    let overall = report.overall.value().unwrap();
    assert_eq!(overall.yield_stats, Section::NotAvailable { reason: Unavailable::NoYieldData });
    assert_eq!(report.top_n, Section::NotAvailable { reason: Unavailable::NoYieldData });
    assert_eq!(
        report.yield_distribution,
        Section::NotAvailable { reason: Unavailable::NoYieldData }
    );
}

#[test]
fn group_comparison_needs_two_per_group() {
    let err = compare_groups(&three_tests(), GroupField::Country, "USA", "USSR", Field::Yield).unwrap_err();
    assert_eq!(err, Unavailable::TooFewRecords { needed: 2, found: 1 });

    let mut records = three_tests();
    records.push(rec(Country::Ussr, 1961, 30_000.0, "D"));
    let cmp = compare_groups(&records, GroupField::Country, "USA", "USSR", Field::Yield).unwrap();
    assert_eq!((cmp.first.n, cmp.second.n), (2, 2));
    assert!(cmp.statistic < 0.0);
    assert!(cmp.p_value > 0.0 && cmp.p_value < 1.0);
}
