//! Exports: the JSON report, one CSV per chart series, and record CSVs.
//!
//! All outputs are meant to be easy to consume in spreadsheets, notebooks or
//! downstream scripts.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::ExplosionRecord;
use crate::error::AppError;
use crate::io::ingest::COLUMNS;
use crate::report::{Chart, Report};

/// The JSON report as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEnvelope {
    pub generated_at: DateTime<Utc>,
    /// CSV path, or `synthetic(seed=.., count=..)`.
    pub source: String,
    pub report: Report,
}

pub fn write_report_json(path: &Path, report: &Report, source: &str) -> Result<(), AppError> {
    let envelope = ReportEnvelope {
        generated_at: Utc::now(),
        source: source.to_string(),
        report: report.clone(),
    };
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create JSON report '{}': {e}", path.display())))?;
    let mut w = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut w, &envelope)
        .map_err(|e| AppError::new(4, format!("Failed to serialize JSON report: {e}")))?;
    writeln!(w).map_err(|e| AppError::new(2, format!("Failed to write JSON report: {e}")))?;
    w.flush()
        .map_err(|e| AppError::new(2, format!("Failed to write JSON report: {e}")))?;
    info!(path = %path.display(), "wrote JSON report");
    Ok(())
}

pub fn read_report_json(path: &Path) -> Result<ReportEnvelope, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open JSON report '{}': {e}", path.display())))?;
    serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid JSON report '{}': {e}", path.display())))
}

#[derive(Debug, Serialize)]
struct SeriesRow<'a> {
    series: &'a str,
    label: &'a str,
    x: f64,
    y: f64,
}

/// Write `<dir>/<chart id>.csv` for every chart, with columns
/// `series,label,x,y`.
pub fn write_chart_series(dir: &Path, charts: &[Chart]) -> Result<Vec<PathBuf>, AppError> {
    fs::create_dir_all(dir)
        .map_err(|e| AppError::new(2, format!("Failed to create series directory '{}': {e}", dir.display())))?;

    let mut written = Vec::with_capacity(charts.len());
    for chart in charts {
        let path = dir.join(format!("{}.csv", chart.id));
        let mut w = csv::Writer::from_path(&path)
            .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", path.display())))?;
        for series in &chart.series {
            for p in &series.points {
                w.serialize(SeriesRow {
                    series: &series.name,
                    label: &p.label,
                    x: p.x,
                    y: p.y,
                })
                .map_err(|e| AppError::new(2, format!("Failed to write '{}': {e}", path.display())))?;
            }
        }
        w.flush()
            .map_err(|e| AppError::new(2, format!("Failed to write '{}': {e}", path.display())))?;
        debug!(path = %path.display(), "wrote chart series");
        written.push(path);
    }
    info!(count = written.len(), dir = %dir.display(), "chart series written");
    Ok(written)
}

/// Write records with the dataset's column headers, readable by `load_records`.
pub fn write_records_csv(path: &Path, records: &[ExplosionRecord]) -> Result<(), AppError> {
    let mut w = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create CSV '{}': {e}", path.display())))?;
    let err = |e: csv::Error| AppError::new(2, format!("Failed to write CSV '{}': {e}", path.display()));

    w.write_record(COLUMNS.iter().map(|c| c.canonical)).map_err(err)?;
    for r in records {
        let opt = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
        w.write_record([
            r.country.code().to_string(),
            r.region.clone(),
            r.year.to_string(),
            r.month.to_string(),
            r.day.to_string(),
            opt(r.latitude),
            opt(r.longitude),
            opt(r.depth),
            opt(r.yield_lower),
            opt(r.yield_upper),
            r.purpose.label().to_string(),
            r.test_type.label().to_string(),
            r.name.clone(),
        ])
        .map_err(err)?;
    }
    w.flush()
        .map_err(|e| AppError::new(2, format!("Failed to write CSV '{}': {e}", path.display())))?;
    info!(path = %path.display(), records = records.len(), "wrote records CSV");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Country, Purpose, TestType};
    use crate::io::ingest::load_records;
    use crate::report::{build_charts, build_report};

    fn records() -> Vec<ExplosionRecord> {
        vec![
            ExplosionRecord {
                country: Country::Usa,
                region: "BIKINI".to_string(),
                year: 1954,
                month: 3,
                day: 1,
                latitude: Some(11.69),
                longitude: Some(165.27),
                depth: None,
                yield_lower: Some(15_000.0),
                yield_upper: Some(15_000.0),
                purpose: Purpose::WeaponsResearch,
                test_type: TestType::Surface,
                name: "BRAVO".to_string(),
            },
            ExplosionRecord {
                country: Country::France,
                region: "MURUROA".to_string(),
                year: 1995,
                month: 9,
                day: 5,
                latitude: Some(-21.83),
                longitude: Some(-138.88),
                depth: Some(0.6),
                yield_lower: None,
                yield_upper: Some(20.0),
                purpose: Purpose::Safety,
                test_type: TestType::Underground,
                name: "THETIS, PHASE 2".to_string(),
            },
        ]
    }

    #[test]
    fn records_csv_round_trips_through_ingest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.csv");
        write_records_csv(&path, &records()).unwrap();

        let data = load_records(&path).unwrap();
        assert!(data.row_errors.is_empty());
        assert_eq!(data.records, records());
    }

    #[test]
    fn json_report_has_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let report = build_report(&records(), 5);
        write_report_json(&path, &report, "unit-test").unwrap();

        let back = read_report_json(&path).unwrap();
        assert_eq!(back.source, "unit-test");
        assert_eq!(back.report.by_country, report.by_country);
        assert_eq!(back.report.anomalies, report.anomalies);
    }

    #[test]
    fn chart_series_csv_per_chart() {
        let dir = tempfile::tempdir().unwrap();
        let charts = build_charts(&build_report(&records(), 5));
        let written = write_chart_series(dir.path(), &charts).unwrap();
        assert_eq!(written.len(), charts.len());

        let decade = std::fs::read_to_string(dir.path().join("tests_per_decade.csv")).unwrap();
        let mut lines = decade.lines();
        assert_eq!(lines.next(), Some("series,label,x,y"));
        assert_eq!(lines.next(), Some("tests,1950s,0.0,1.0"));
    }
}
