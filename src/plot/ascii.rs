//! ASCII plotting of a chart series for non-interactive output.
//!
//! Fixed-size grid, deterministic output (helpful for golden tests).
//!
//! Plot elements:
//! - log-return line: `-` (x = point index, y = value)
//! - change-point marker: `*`
//! - other point markers: `o` (only when the options give them a radius)
//! - non-finite values break the line (gap)

use crate::domain::ChartSeries;
use crate::series::ChartOptions;

/// Render the series into a `width` x `height` character grid with a header.
pub fn render_ascii_plot(series: &ChartSeries, options: &ChartOptions, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (y_min, y_max) = y_range(&series.values).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);
    let x_max = series.len().saturating_sub(1).max(1) as f64;

    let mut grid = vec![vec![' '; width]; height];

    let mut prev = None;
    for (i, &v) in series.values.iter().enumerate() {
        if !v.is_finite() {
            prev = None;
            continue;
        }
        let x = map_x(i as f64, x_max, width);
        let y = map_y(v, y_min, y_max, height);
        match prev {
            Some((x0, y0)) => draw_line(&mut grid, x0, y0, x, y, '-'),
            None => grid[y][x] = '-',
        }
        prev = Some((x, y));
    }

    for point in series
        .points()
        .filter(|p| p.value.is_finite() && options.has_marker(p.highlighted))
    {
        let x = map_x(point.index as f64, x_max, width);
        let y = map_y(point.value, y_min, y_max, height);
        grid[y][x] = if point.highlighted { '*' } else { 'o' };
    }

    let first = series.labels.first().map(String::as_str).unwrap_or("-");
    let last = series.labels.last().map(String::as_str).unwrap_or("-");

    let mut out = String::new();
    out.push_str(&format!("Plot: {first} .. {last} | y=[{y_min:.4}, {y_max:.4}]\n"));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn y_range(values: &[f64]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for &v in values.iter().filter(|v| v.is_finite()) {
        min_y = min_y.min(v);
        max_y = max_y.max(v);
    }

    if !(min_y.is_finite() && max_y.is_finite()) {
        return None;
    }
    if max_y > min_y {
        Some((min_y, max_y))
    } else {
        // Flat series: center it.
        let half = min_y.abs().max(1e-3);
        Some((min_y - half, max_y + half))
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(i: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = (i / x_max).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish).
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

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: Vec<f64>, highlight: Vec<bool>) -> ChartSeries {
        let labels = (1..=values.len()).map(|d| format!("2020-01-{d:02}")).collect();
        ChartSeries {
            labels,
            values,
            highlight,
        }
    }

    #[test]
    fn plot_golden_snapshot_with_gap() {
        let s = series(vec![0.0, f64::NAN, 1.0], vec![false, false, true]);
        let txt = render_ascii_plot(&s, &ChartOptions::default(), 10, 5);
        let expected = concat!(
            "Plot: 2020-01-01 .. 2020-01-03 | y=[-0.0500, 1.0500]\n",
            "         *\n",
            "          \n",
            "          \n",
            "          \n",
            "-         \n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn connected_points_draw_a_line() {
        let s = series(vec![0.0, 1.0], vec![false, false]);
        let txt = render_ascii_plot(&s, &ChartOptions::default(), 10, 5);
        let dashes = txt.chars().filter(|&c| c == '-').count();
        // Header has one '-' from "-0.0500".
        assert!(dashes > 6, "expected a drawn line, got:\n{txt}");
        assert!(!txt.contains('*'));
    }

    #[test]
    fn point_radius_shows_ordinary_markers() {
        let s = series(vec![0.0, 1.0], vec![false, true]);
        let opts = ChartOptions {
            point_radius: 2,
            ..ChartOptions::default()
        };
        let txt = render_ascii_plot(&s, &opts, 10, 5);
        let rows: Vec<&str> = txt.lines().skip(1).collect();
        assert_eq!(rows[4].chars().next(), Some('o'));
        assert_eq!(rows[0].chars().last(), Some('*'));
    }

    #[test]
    fn empty_series_renders_blank_grid() {
        let txt = render_ascii_plot(&ChartSeries::default(), &ChartOptions::default(), 10, 5);
        assert!(txt.starts_with("Plot: - .. - |"));
        assert_eq!(txt.lines().count(), 6);
    }
}
