//! SVG chart files via Plotters.
//!
//! One file per chart, named after `Chart::id`. Everything drawn here comes
//! from the plain chart series; bounds are computed up front so the drawing
//! code only has to draw.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use tracing::{debug, info};

use crate::error::AppError;
use crate::report::{Chart, ChartKind};

/// Pixel size of every SVG chart.
pub const SVG_SIZE: (u32, u32) = (960, 540);

/// Write every non-empty chart to `<dir>/<id>.svg`, creating `dir` if needed.
pub fn write_svg_charts(charts: &[Chart], dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    fs::create_dir_all(dir)
        .map_err(|e| AppError::new(4, format!("Failed to create chart directory {}: {e}", dir.display())))?;

    let mut written = Vec::new();
    for chart in charts.iter().filter(|c| !c.is_empty()) {
        let path = dir.join(format!("{}.svg", chart.id));
        render_svg(chart, &path, SVG_SIZE)?;
        debug!(path = %path.display(), "wrote chart");
        written.push(path);
    }
    info!(count = written.len(), dir = %dir.display(), "SVG charts written");
    Ok(written)
}

/// Render one chart to an SVG file.
pub fn render_svg(chart: &Chart, path: &Path, size: (u32, u32)) -> Result<(), AppError> {
    draw(chart, path, size)
        .map_err(|e| AppError::new(4, format!("Failed to render chart '{}' to {}: {e}", chart.id, path.display())))
}

struct Bounds {
    x: (f64, f64),
    y: (f64, f64),
}

fn bounds(chart: &Chart) -> Option<Bounds> {
    let points = || chart.series.iter().flat_map(|s| &s.points).filter(|p| p.x.is_finite() && p.y.is_finite());

    let (mut y0, mut y1) = points().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
    if !y0.is_finite() {
        return None;
    }
    // Counts and shares read best from a zero baseline.
    if chart.kind != ChartKind::Scatter && y0 > 0.0 {
        y0 = 0.0;
    }
    if y1 <= y0 {
        y1 = y0 + 1.0;
    }
    let pad = (y1 - y0) * 0.05;

    let x = match chart.kind {
        ChartKind::Bar => {
            let n = chart.series.first().map(|s| s.points.len()).unwrap_or(0);
            (-0.5, n as f64 - 0.5)
        }
        ChartKind::Line | ChartKind::Scatter => {
            let (x0, x1) = points().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p.x), hi.max(p.x)));
            if x1 > x0 {
                let pad = (x1 - x0) * 0.02;
                (x0 - pad, x1 + pad)
            } else {
                (x0 - 1.0, x1 + 1.0)
            }
        }
    };

    let y = if chart.kind == ChartKind::Scatter { (y0 - pad, y1 + pad) } else { (y0, y1 + pad) };
    Some(Bounds { x, y })
}

fn draw(chart: &Chart, path: &Path, size: (u32, u32)) -> Result<(), Box<dyn Error>> {
    let Some(b) = bounds(chart) else {
        return Ok(());
    };

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut ctx = ChartBuilder::on(&root)
        .caption(&chart.title, ("sans-serif", 22))
        .margin(14)
        .set_label_area_size(LabelAreaPosition::Left, 64)
        .set_label_area_size(LabelAreaPosition::Bottom, 48)
        .build_cartesian_2d(b.x.0..b.x.1, b.y.0..b.y.1)?;

    let bar_labels: Vec<&str> = match chart.kind {
        ChartKind::Bar => chart
            .series
            .first()
            .map(|s| s.points.iter().map(|p| p.label.as_str()).collect())
            .unwrap_or_default(),
        _ => Vec::new(),
    };
    let x_fmt = |v: &f64| -> String {
        if chart.kind == ChartKind::Bar {
            let i = v.round();
            if (v - i).abs() < 1e-6 && i >= 0.0 {
                return bar_labels.get(i as usize).map(|s| s.to_string()).unwrap_or_default();
            }
            return String::new();
        }
        format!("{v:.0}")
    };

    let mut mesh = ctx.configure_mesh();
    mesh.x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .x_label_formatter(&x_fmt);
    if chart.kind == ChartKind::Bar {
        mesh.disable_x_mesh().x_labels(bar_labels.len().max(1));
    }
    mesh.draw()?;

    for (i, series) in chart.series.iter().enumerate() {
        let color = Palette99::pick(i).to_rgba();
        match chart.kind {
            ChartKind::Bar => {
                ctx.draw_series(
                    series
                        .points
                        .iter()
                        .map(|p| Rectangle::new([(p.x - 0.4, 0.0), (p.x + 0.4, p.y)], color.filled())),
                )?;
            }
            ChartKind::Line => {
                ctx.draw_series(LineSeries::new(
                    series.points.iter().map(|p| (p.x, p.y)),
                    color.stroke_width(2),
                ))?
                .label(series.name.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
            }
            ChartKind::Scatter => {
                ctx.draw_series(
                    series
                        .points
                        .iter()
                        .map(|p| Circle::new((p.x, p.y), 3, color.filled())),
                )?
                .label(series.name.as_str())
                .legend(move |(x, y)| Circle::new((x + 10, y), 3, color.filled()));
            }
        }
    }

    if chart.kind != ChartKind::Bar && chart.series.len() > 1 {
        ctx.configure_series_labels()
            .background_style(&WHITE.mix(0.85))
            .border_style(&BLACK)
            .position(SeriesLabelPosition::UpperRight)
            .draw()?;
    }

    root.present()?;
    Ok(())
}
