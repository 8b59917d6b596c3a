//! Shared report pipeline used by every subcommand.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load (CSV or synthetic) -> report -> charts
//!
//! The subcommands then only decide what to print and what to export.

use tracing::info;

use crate::data::{generate_sample, sample_source};
use crate::domain::{ExplosionRecord, ReportConfig};
use crate::error::AppError;
use crate::io::ingest::{RowError, load_records};
use crate::report::{Chart, Report, build_charts, build_report};

/// Records plus where they came from.
#[derive(Debug, Clone)]
pub struct LoadedRecords {
    pub records: Vec<ExplosionRecord>,
    /// CSV path, or a description of the synthetic sample.
    pub source: String,
    pub row_errors: Vec<RowError>,
}

/// All computed outputs of a single `nreport report` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub input: LoadedRecords,
    pub report: Report,
    pub charts: Vec<Chart>,
}

/// Read the configured CSV, or generate the synthetic sample.
pub fn load_input(config: &ReportConfig) -> Result<LoadedRecords, AppError> {
    match &config.csv_path {
        Some(path) => {
            let data = load_records(path)?;
            Ok(LoadedRecords {
                records: data.records,
                source: path.display().to_string(),
                row_errors: data.row_errors,
            })
        }
        None => {
            let records = generate_sample(config.sample_count, config.sample_seed)?;
            info!(count = records.len(), seed = config.sample_seed, "generated synthetic sample");
            Ok(LoadedRecords {
                records,
                source: sample_source(config.sample_count, config.sample_seed),
                row_errors: Vec::new(),
            })
        }
    }
}

/// Execute the full pipeline and return the computed outputs.
pub fn run_report(config: &ReportConfig) -> Result<RunOutput, AppError> {
    let input = load_input(config)?;
    Ok(run_report_with_records(config, input))
}

/// Execute the pipeline on records that are already loaded.
pub fn run_report_with_records(config: &ReportConfig, input: LoadedRecords) -> RunOutput {
    let report = build_report(&input.records, config.top_n);

    let anomalies = &report.anomalies;
    info!(
        scanned = anomalies.records_scanned,
        flagged = anomalies.flagged_records,
        "data quality scan"
    );
    for c in &anomalies.counts {
        info!(kind = c.kind.label(), count = c.count, "anomaly tally");
    }

    let charts = build_charts(&report);
    info!(charts = charts.len(), insights = report.insights.len(), "report built");

    RunOutput { input, report, charts }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_run_fills_every_section() {
        let config = ReportConfig {
            sample_count: 300,
            ..ReportConfig::default()
        };
        let run = run_report(&config).unwrap();
        assert_eq!(run.input.records.len(), 300);
        assert!(run.input.source.starts_with("synthetic"));
        assert!(run.report.overall.is_available());
        assert!(run.report.top_n.is_available());
        assert!(!run.charts.is_empty());
    }

    #[test]
    fn missing_csv_is_exit_code_2() {
        let config = ReportConfig {
            csv_path: Some("/definitely/not/here.csv".into()),
            ..ReportConfig::default()
        };
        assert_eq!(run_report(&config).unwrap_err().exit_code(), 2);
    }
}
