//! ASCII plotting for terminal output.
//!
//! Fixed-size character grids, optimized for:
//! - quick visual checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Line and scatter charts share one grid: segments are drawn with `.`, then
//! each series' points are overlaid with its marker (`*`, `+`, `x`, ...).
//! Bar charts are drawn horizontally, one row per category.

use crate::report::{Chart, ChartKind, Series};

const MARKERS: [char; 6] = ['*', '+', 'x', 'o', '#', '@'];
const MAX_LABEL: usize = 24;

/// Render any chart at roughly `width` × `height` characters.
pub fn render_ascii_chart(chart: &Chart, width: usize, height: usize) -> String {
    match chart.kind {
        ChartKind::Bar => render_bars(chart, width),
        ChartKind::Line => render_grid(chart, width, height, true),
        ChartKind::Scatter => render_grid(chart, width, height, false),
    }
}

fn render_bars(chart: &Chart, width: usize) -> String {
    let mut out = format!("{} ({})\n", chart.title, chart.y_label);
    let Some(series) = chart.series.first() else {
        return out;
    };

    let label_w = series
        .points
        .iter()
        .map(|p| p.label.chars().count().min(MAX_LABEL))
        .max()
        .unwrap_or(0);
    let values: Vec<String> = series.points.iter().map(|p| fmt_value(p.y)).collect();
    let value_w = values.iter().map(String::len).max().unwrap_or(0);
    let bar_w = width.saturating_sub(label_w + value_w + 4).max(10);
    let max = series.points.iter().map(|p| p.y).fold(0.0_f64, f64::max);

    for (p, value) in series.points.iter().zip(&values) {
        let len = if max > 0.0 && p.y > 0.0 {
            ((p.y / max) * bar_w as f64).round().max(1.0) as usize
        } else {
            0
        };
        let row = format!(
            "{:<label_w$} |{:<bar_w$} {:>value_w$}",
            truncate(&p.label, MAX_LABEL),
            "#".repeat(len),
            value
        );
        out.push_str(row.trim_end());
        out.push('\n');
    }
    out
}

fn render_grid(chart: &Chart, width: usize, height: usize, connect: bool) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let mut out = String::new();
    let Some(((x_min, x_max), (y_min, y_max))) = bounds(&chart.series) else {
        out.push_str(&format!("{}: no data\n", chart.title));
        return out;
    };
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    if connect {
        for series in &chart.series {
            let cells: Vec<(usize, usize)> = series
                .points
                .iter()
                .map(|p| {
                    (
                        map_x(p.x, x_min, x_max, width),
                        map_y(p.y, y_min, y_max, height),
                    )
                })
                .collect();
            for pair in cells.windows(2) {
                draw_line(&mut grid, pair[0].0, pair[0].1, pair[1].0, pair[1].1, '.');
            }
        }
    }

    for (i, series) in chart.series.iter().enumerate() {
        let marker = MARKERS[i % MARKERS.len()];
        for p in &series.points {
            let x = map_x(p.x, x_min, x_max, width);
            let y = map_y(p.y, y_min, y_max, height);
            grid[y][x] = marker;
        }
    }

    out.push_str(&format!(
        "{}: {}=[{x_min:.0}, {x_max:.0}] | {}=[{y_min:.2}, {y_max:.2}]\n",
        chart.title, chart.x_label, chart.y_label
    ));
    if chart.series.len() > 1 {
        let legend: Vec<String> = chart
            .series
            .iter()
            .enumerate()
            .map(|(i, s)| format!("{} {}", MARKERS[i % MARKERS.len()], s.name))
            .collect();
        out.push_str(&legend.join("  "));
        out.push('\n');
    }

    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }

    out
}

fn bounds(series: &[Series]) -> Option<((f64, f64), (f64, f64))> {
    let mut x = (f64::INFINITY, f64::NEG_INFINITY);
    let mut y = (f64::INFINITY, f64::NEG_INFINITY);
    for p in series.iter().flat_map(|s| &s.points) {
        if !(p.x.is_finite() && p.y.is_finite()) {
            continue;
        }
        x = (x.0.min(p.x), x.1.max(p.x));
        y = (y.0.min(p.y), y.1.max(p.y));
    }
    if !x.0.is_finite() {
        return None;
    }
    Some((widen(x), widen(y)))
}

/// A degenerate range becomes one unit wide so the mapping stays defined.
fn widen((min, max): (f64, f64)) -> (f64, f64) {
    if max > min { (min, max) } else { (min - 0.5, max + 0.5) }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // Row 0 is the top (largest y).
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham). Only fills blank cells.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

fn fmt_value(v: f64) -> String {
    if v.fract() == 0.0 { format!("{v:.0}") } else { format!("{v:.1}") }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
