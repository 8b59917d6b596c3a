use std::path::PathBuf;

/// A full run's configuration as understood by the pipeline.
///
/// Derived from CLI flags and environment (plus defaults); the engine itself
/// never sees CLI types.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Dataset CSV. `None` runs on the synthetic sample.
    pub csv_path: Option<PathBuf>,
    pub sample_count: usize,
    pub sample_seed: u64,

    pub top_n: usize,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_json: Option<PathBuf>,
    /// Directory for one SVG file per chart.
    pub export_charts: Option<PathBuf>,
    /// Directory for one CSV file per chart series.
    pub export_series: Option<PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            csv_path: None,
            sample_count: 500,
            sample_seed: 42,
            top_n: 10,
            plot: true,
            plot_width: 72,
            plot_height: 16,
            export_json: None,
            export_charts: None,
            export_series: None,
        }
    }
}
