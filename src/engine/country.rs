use std::collections::BTreeMap;

use crate::domain::{
    Country, CountryStats, CountryTrend, CrossTab, ExplosionRecord, Purpose, TestLocation, Unavailable,
    YearCount,
};
use crate::math::describe;

use super::require_records;

/// Per-country count and yield aggregates.
///
/// Sorted by test count (descending), ties broken by country code. Every
/// record lands in exactly one entry (unrecognized countries in `UNKNOWN`),
/// so the counts sum to the record count.
pub fn compute_country_stats(records: &[ExplosionRecord]) -> Result<Vec<CountryStats>, Unavailable> {
    require_records(records)?;

    let mut groups: BTreeMap<Country, (usize, Vec<f64>)> = BTreeMap::new();
    for r in records {
        let entry = groups.entry(r.country).or_default();
        entry.0 += 1;
        if let Some(y) = r.representative_yield() {
            entry.1.push(y);
        }
    }

    let mut out: Vec<CountryStats> = groups
        .into_iter()
        .map(|(country, (count, yields))| {
            let d = describe(yields);
            CountryStats {
                country,
                count,
                yields_counted: d.as_ref().map(|d| d.n).unwrap_or(0),
                total_yield: d.as_ref().map(|d| d.sum),
                average_yield: d.as_ref().map(|d| d.mean),
                max_yield: d.as_ref().map(|d| d.max),
            }
        })
        .collect();

    out.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.country.code().cmp(b.country.code()))
    });
    Ok(out)
}

/// The `n` most active countries, in `compute_country_stats` order.
fn top_countries(records: &[ExplosionRecord], n: usize) -> Result<Vec<Country>, Unavailable> {
    Ok(compute_country_stats(records)?
        .into_iter()
        .take(n)
        .map(|s| s.country)
        .collect())
}

/// Tests per year for each of the `n` most active countries.
pub fn compute_country_trends(records: &[ExplosionRecord], n: usize) -> Result<Vec<CountryTrend>, Unavailable> {
    let countries = top_countries(records, n)?;

    Ok(countries
        .into_iter()
        .map(|country| {
            let mut per_year: BTreeMap<i32, usize> = BTreeMap::new();
            for r in records.iter().filter(|r| r.country == country && r.in_study_period()) {
                *per_year.entry(r.year).or_default() += 1;
            }
            CountryTrend {
                country,
                points: per_year
                    .into_iter()
                    .map(|(year, count)| YearCount { year, count })
                    .collect(),
            }
        })
        .collect())
}

/// Country × purpose counts for the `n` most active countries.
///
/// Columns are every purpose present in the full dataset, in purpose order.
pub fn compute_country_purpose(records: &[ExplosionRecord], n: usize) -> Result<CrossTab, Unavailable> {
    let countries = top_countries(records, n)?;

    let mut purposes: Vec<Purpose> = records.iter().map(|r| r.purpose).collect();
    purposes.sort_unstable();
    purposes.dedup();

    let counts = countries
        .iter()
        .map(|&country| {
            purposes
                .iter()
                .map(|&purpose| {
                    records
                        .iter()
                        .filter(|r| r.country == country && r.purpose == purpose)
                        .count()
                })
                .collect()
        })
        .collect();

    Ok(CrossTab {
        countries,
        purposes,
        counts,
    })
}

/// Coordinates of every located test by the `n` most active countries.
///
/// Ordered by country rank, then by latitude/longitude, so the output does
/// not depend on record order.
pub fn compute_locations(records: &[ExplosionRecord], n: usize) -> Result<Vec<TestLocation>, Unavailable> {
    let countries = top_countries(records, n)?;

    let mut out = Vec::new();
    for country in countries {
        let mut points: Vec<TestLocation> = records
            .iter()
            .filter(|r| r.country == country)
            .filter_map(|r| {
                let latitude = r.latitude.filter(|v| v.is_finite())?;
                let longitude = r.longitude.filter(|v| v.is_finite())?;
                Some(TestLocation {
                    country,
                    latitude,
                    longitude,
                })
            })
            .collect();
        points.sort_by(|a, b| {
            a.latitude
                .total_cmp(&b.latitude)
                .then(a.longitude.total_cmp(&b.longitude))
        });
        out.extend(points);
    }
    Ok(out)
}
