//! Chart data series.
//!
//! Each chart is an ordered sequence of plain points, so any plotting
//! backend (ASCII, SVG, an external tool reading the CSV export) can draw it
//! without knowing about the engine.

use serde::{Deserialize, Serialize};

use super::Report;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Categorical x axis; `x` is the category's position.
    Bar,
    Line,
    Scatter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    /// File-name friendly identifier.
    pub id: String,
    pub title: String,
    pub kind: ChartKind,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
}

impl Chart {
    fn new(id: &str, title: &str, kind: ChartKind, x_label: &str, y_label: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            kind,
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            series: Vec::new(),
        }
    }

    fn with_series(mut self, name: &str, points: Vec<ChartPoint>) -> Self {
        self.series.push(Series {
            name: name.to_string(),
            points,
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.points.is_empty())
    }
}

fn year_point(year: i32, y: f64) -> ChartPoint {
    ChartPoint {
        label: year.to_string(),
        x: f64::from(year),
        y,
    }
}

fn bars<'a>(items: impl IntoIterator<Item = (&'a str, f64)>) -> Vec<ChartPoint> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, (label, y))| ChartPoint {
            label: label.to_string(),
            x: i as f64,
            y,
        })
        .collect()
}

/// Every chart the report supports, in presentation order. Charts whose
/// source section is not available are omitted.
pub fn build_charts(report: &Report) -> Vec<Chart> {
    let mut charts = Vec::new();

    if let Some(by_year) = report.by_year.value() {
        let points = by_year.buckets.iter().map(|b| year_point(b.start, b.count as f64)).collect();
        charts.push(
            Chart::new("tests_per_year", "Nuclear tests per year", ChartKind::Line, "year", "tests")
                .with_series("tests", points),
        );
    }

    if let Some(by_decade) = report.by_decade.value() {
        let points = bars(by_decade.buckets.iter().map(|b| (b.label.as_str(), b.count as f64)));
        charts.push(
            Chart::new("tests_per_decade", "Nuclear tests per decade", ChartKind::Bar, "decade", "tests")
                .with_series("tests", points),
        );
    }

    if let Some(cumulative) = report.cumulative_by_year.value() {
        let points = cumulative.iter().map(|p| year_point(p.year, p.cumulative as f64)).collect();
        charts.push(
            Chart::new("cumulative_tests", "Cumulative nuclear tests", ChartKind::Line, "year", "tests")
                .with_series("cumulative", points),
        );
    }

    if let Some(trends) = report.country_trends.value() {
        let mut chart = Chart::new(
            "country_trends",
            "Tests per year, most active countries",
            ChartKind::Line,
            "year",
            "tests",
        );
        for trend in trends {
            let points = trend.points.iter().map(|p| year_point(p.year, p.count as f64)).collect();
            chart = chart.with_series(trend.country.code(), points);
        }
        charts.push(chart);
    }

    if let Some(countries) = report.by_country.value() {
        let points = bars(countries.iter().take(10).map(|c| (c.country.code(), c.count as f64)));
        charts.push(
            Chart::new("top_countries", "Tests by country", ChartKind::Bar, "country", "tests")
                .with_series("tests", points),
        );
    }

    if let Some(purposes) = report.by_purpose.value() {
        let points = bars(purposes.iter().map(|s| (s.label.as_str(), s.percentage)));
        charts.push(
            Chart::new("purpose_share", "Share of tests by purpose", ChartKind::Bar, "purpose", "% of tests")
                .with_series("share", points),
        );
    }

    if let Some(types) = report.by_type.value() {
        let points = bars(types.iter().map(|s| (s.label.as_str(), s.percentage)));
        charts.push(
            Chart::new("type_share", "Share of tests by type", ChartKind::Bar, "type", "% of tests")
                .with_series("share", points),
        );
    }

    if let Some(dist) = report.yield_distribution.value() {
        let points = bars(dist.shares.iter().map(|s| (s.label.as_str(), s.count as f64)));
        charts.push(
            Chart::new("yield_categories", "Tests by yield category", ChartKind::Bar, "category", "tests")
                .with_series("tests", points),
        );
    }

    if let Some(yearly) = report.yearly_mean_yield.value() {
        let points = yearly.iter().map(|y| year_point(y.year, y.mean)).collect();
        charts.push(
            Chart::new("yearly_mean_yield", "Mean yield per year", ChartKind::Line, "year", "kilotons")
                .with_series("mean yield", points),
        );
    }

    if let Some(regions) = report.by_region.value() {
        let points = bars(regions.iter().map(|r| (r.region.as_str(), r.count as f64)));
        charts.push(
            Chart::new("top_regions", "Most used test regions", ChartKind::Bar, "region", "tests")
                .with_series("tests", points),
        );
    }

    if let Some(locations) = report.locations.value() {
        let mut chart = Chart::new(
            "test_locations",
            "Test locations, most active countries",
            ChartKind::Scatter,
            "longitude",
            "latitude",
        );
        let mut countries: Vec<_> = Vec::new();
        for loc in locations {
            if !countries.contains(&loc.country) {
                countries.push(loc.country);
            }
        }
        for country in countries {
            let points = locations
                .iter()
                .filter(|l| l.country == country)
                .map(|l| ChartPoint {
                    label: country.code().to_string(),
                    x: l.longitude,
                    y: l.latitude,
                })
                .collect();
            chart = chart.with_series(country.code(), points);
        }
        charts.push(chart);
    }

    charts
}
