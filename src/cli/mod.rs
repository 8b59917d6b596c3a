//! Command-line parsing for the nuclear test report tool.
//!
//! Argument parsing and command dispatch are kept apart from the statistics
//! code; nothing under `engine` sees these types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{Field, GroupField};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "nreport", version, about = "Descriptive statistics over historical nuclear test records")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the full report: text on stdout, optional plots and exports.
    Report(ReportArgs),
    /// Print the N largest tests by representative yield.
    Top(TopArgs),
    /// Pearson correlation between two numeric fields.
    Correlate(CorrelateArgs),
    /// Compare a numeric field between two groups (Welch's t-test).
    Compare(CompareArgs),
    /// Write the synthetic dataset as CSV in the ingest schema.
    Sample(SampleArgs),
}

/// Where records come from.
#[derive(Debug, Args, Clone)]
pub struct InputArgs {
    /// Dataset CSV. Without it the synthetic sample is used.
    #[arg(long, value_name = "PATH", env = "NREPORT_CSV")]
    pub csv: Option<PathBuf>,

    /// Number of synthetic records when no CSV is given.
    #[arg(short = 'n', long, default_value_t = 500)]
    pub sample_count: usize,

    /// Random seed for the synthetic sample.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Rows in the largest-tests table.
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Write the structured report as JSON.
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// Write one SVG per chart into this directory.
    #[arg(long, value_name = "DIR")]
    pub charts: Option<PathBuf>,

    /// Write one CSV per chart series into this directory.
    #[arg(long, value_name = "DIR")]
    pub series: Option<PathBuf>,

    /// Default location for all exports: `report.json`, `charts/`, `series/`.
    /// Explicit `--json`, `--charts` and `--series` take precedence.
    #[arg(long, value_name = "DIR", env = "NREPORT_OUT_DIR")]
    pub out_dir: Option<PathBuf>,

    /// Disable the terminal charts.
    #[arg(long)]
    pub no_plot: bool,

    /// Terminal chart width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Terminal chart height (rows).
    #[arg(long, default_value_t = 16)]
    pub height: usize,
}

#[derive(Debug, Args, Clone)]
pub struct TopArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// How many tests to list.
    #[arg(long, default_value_t = 10)]
    pub count: usize,
}

#[derive(Debug, Args, Clone)]
pub struct CorrelateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[arg(long, value_enum)]
    pub a: Field,

    #[arg(long, value_enum)]
    pub b: Field,
}

#[derive(Debug, Args, Clone)]
pub struct CompareArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Categorical field that defines the groups.
    #[arg(long, value_enum)]
    pub by: GroupField,

    /// First group, e.g. `USA`, `underground`, `1960s`.
    #[arg(long)]
    pub first: String,

    /// Second group.
    #[arg(long)]
    pub second: String,

    /// Numeric field to compare.
    #[arg(long, value_enum, default_value_t = Field::Yield)]
    pub metric: Field,
}

#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    /// Output CSV path.
    #[arg(long, value_name = "PATH")]
    pub out: PathBuf,

    #[arg(short = 'n', long, default_value_t = 500)]
    pub sample_count: usize,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}
