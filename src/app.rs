//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and installs logging
//! - parses CLI arguments
//! - loads records (CSV or synthetic sample)
//! - builds the report and prints it
//! - writes optional exports

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, CompareArgs, CorrelateArgs, InputArgs, ReportArgs, SampleArgs, TopArgs};
use crate::domain::{ComparisonEntry, CorrelationEntry, ReportConfig, Section};
use crate::error::AppError;

pub mod pipeline;

/// Filter used when neither `NREPORT_LOG` nor `RUST_LOG` is set.
const DEFAULT_LOG_FILTER: &str = "warn";

/// Entry point for the `nreport` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_logging();

    // `nreport` and `nreport --csv x.csv` behave like `nreport report ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Report(args) => handle_report(args),
        Command::Top(args) => handle_top(args),
        Command::Correlate(args) => handle_correlate(args),
        Command::Compare(args) => handle_compare(args),
        Command::Sample(args) => handle_sample(args),
    }
}

/// Logs go to stderr; stdout carries only the report.
fn init_logging() {
    let filter = EnvFilter::try_from_env("NREPORT_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // A second init (e.g. in tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    let config = report_config_from_args(&args);
    let run = pipeline::run_report(&config)?;

    println!("{}", crate::report::format_report(&run.report));

    if config.plot {
        for chart in run.charts.iter().filter(|c| !c.is_empty()) {
            println!(
                "{}",
                crate::plot::render_ascii_chart(chart, config.plot_width, config.plot_height)
            );
        }
    }

    // Optional exports.
    if let Some(path) = &config.export_json {
        ensure_parent(path)?;
        crate::io::export::write_report_json(path, &run.report, &run.input.source)?;
    }
    if let Some(dir) = &config.export_charts {
        crate::plot::write_svg_charts(&run.charts, dir)?;
    }
    if let Some(dir) = &config.export_series {
        crate::io::export::write_chart_series(dir, &run.charts)?;
    }

    Ok(())
}

fn handle_top(args: TopArgs) -> Result<(), AppError> {
    let config = ReportConfig {
        top_n: args.count,
        ..input_config(&args.input)
    };
    let input = pipeline::load_input(&config)?;

    match crate::engine::compute_top_n(&input.records, config.top_n) {
        Ok(rows) => println!("{}", crate::report::format_top_table(&rows)),
        Err(reason) => println!("Largest tests: not available ({reason})"),
    }
    Ok(())
}

fn handle_correlate(args: CorrelateArgs) -> Result<(), AppError> {
    let input = pipeline::load_input(&input_config(&args.input))?;
    let entry = CorrelationEntry {
        field_a: args.a,
        field_b: args.b,
        result: Section::from(crate::engine::compute_correlation(&input.records, args.a, args.b)),
    };
    print!("{}", crate::report::format_correlation(&entry));
    Ok(())
}

fn handle_compare(args: CompareArgs) -> Result<(), AppError> {
    if args.by.key(&args.first).is_none() || args.by.key(&args.second).is_none() {
        tracing::warn!(by = ?args.by, first = %args.first, second = %args.second, "group value not recognised");
    }
    let input = pipeline::load_input(&input_config(&args.input))?;
    let result =
        crate::engine::compare_groups(&input.records, args.by, &args.first, &args.second, args.metric);
    let entry = ComparisonEntry {
        group_field: args.by,
        first: args.first,
        second: args.second,
        metric: args.metric,
        result: Section::from(result),
    };
    print!("{}", crate::report::format_comparison(&entry));
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let records = crate::data::generate_sample(args.sample_count, args.seed)?;
    ensure_parent(&args.out)?;
    crate::io::export::write_records_csv(&args.out, &records)?;
    println!("Wrote {} synthetic records to {}", records.len(), args.out.display());
    Ok(())
}

fn input_config(input: &InputArgs) -> ReportConfig {
    ReportConfig {
        csv_path: input.csv.clone(),
        sample_count: input.sample_count,
        sample_seed: input.seed,
        ..ReportConfig::default()
    }
}

pub fn report_config_from_args(args: &ReportArgs) -> ReportConfig {
    let out = args.out_dir.as_ref();
    ReportConfig {
        top_n: args.top,
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_json: args.json.clone().or_else(|| out.map(|d| d.join("report.json"))),
        export_charts: args.charts.clone().or_else(|| out.map(|d| d.join("charts"))),
        export_series: args.series.clone().or_else(|| out.map(|d| d.join("series"))),
        ..input_config(&args.input)
    }
}

fn ensure_parent(path: &std::path::Path) -> Result<(), AppError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir)
            .map_err(|e| AppError::new(2, format!("Failed to create directory '{}': {e}", dir.display()))),
        _ => Ok(()),
    }
}

/// Rewrite argv so `nreport` defaults to `nreport report`.
///
/// Rules:
/// - `nreport`                       -> `nreport report`
/// - `nreport --csv x.csv ...`       -> `nreport report --csv x.csv ...`
/// - `nreport --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("report".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "report" | "top" | "correlate" | "compare" | "sample");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "report flags".
    if arg1.starts_with('-') {
        argv.insert(1, "report".to_string());
        return argv;
    }

    argv
}
