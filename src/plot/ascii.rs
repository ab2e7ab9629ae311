//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks of a standard curve in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - standards: `o`
//! - fitted line: `-`
//! - footer: best-fit equation and R²

use crate::domain::{CurveFile, FitResult, Standard};
use crate::report::equation;

/// Render a plot for an in-memory fit.
pub fn render_ascii_plot(standards: &[Standard], fit: &FitResult, width: usize, height: usize) -> String {
    let (c_min, c_max) = concentration_range(standards).unwrap_or((0.0, 1.0));
    let line = sample_line(fit, c_min, c_max, width.max(2));
    render_plot(standards, &line, fit, c_min, c_max, width, height)
}

/// Render a plot from a saved curve JSON file.
pub fn render_ascii_plot_from_curve_file(curve: &CurveFile, width: usize, height: usize) -> String {
    let line: Vec<(f64, f64)> = curve
        .grid
        .concentration
        .iter()
        .zip(curve.grid.response.iter())
        .map(|(&c, &r)| (c, r))
        .collect();
    let (c_min, c_max) = concentration_range(&curve.standards)
        .or_else(|| grid_range(&line))
        .unwrap_or((0.0, 1.0));

    render_plot(&curve.standards, &line, &curve.fit, c_min, c_max, width, height)
}

fn render_plot(
    standards: &[Standard],
    line: &[(f64, f64)],
    fit: &FitResult,
    c_min: f64,
    c_max: f64,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (r_min, r_max) = response_range(standards, line).unwrap_or((0.0, 1.0));
    let (r_min, r_max) = pad_range(r_min, r_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Draw the line first so standards overlay it.
    draw_line_series(&mut grid, line, c_min, c_max, r_min, r_max);

    for s in standards {
        let x = map_x(s.concentration, c_min, c_max, width);
        let y = map_y(s.response, r_min, r_max, height);
        grid[y][x] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: concentration=[{c_min:.3}, {c_max:.3}] | response=[{r_min:.2}, {r_max:.2}]\n"
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out.push_str(&format!("{} | R2 = {:.4}\n", equation(fit), fit.r_squared));
    out
}

fn concentration_range(standards: &[Standard]) -> Option<(f64, f64)> {
    let mut min_c = f64::INFINITY;
    let mut max_c = f64::NEG_INFINITY;
    for s in standards {
        min_c = min_c.min(s.concentration);
        max_c = max_c.max(s.concentration);
    }
    if min_c.is_finite() && max_c.is_finite() && max_c > min_c {
        Some((min_c, max_c))
    } else {
        None
    }
}

fn grid_range(line: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_c = f64::INFINITY;
    let mut max_c = f64::NEG_INFINITY;
    for &(c, _) in line {
        min_c = min_c.min(c);
        max_c = max_c.max(c);
    }
    if min_c.is_finite() && max_c.is_finite() && max_c > min_c {
        Some((min_c, max_c))
    } else {
        None
    }
}

fn sample_line(fit: &FitResult, c_min: f64, c_max: f64, n: usize) -> Vec<(f64, f64)> {
    let n = n.max(2);
    (0..n)
        .map(|i| {
            let u = i as f64 / (n as f64 - 1.0);
            let c = c_min + u * (c_max - c_min);
            (c, fit.response_at(c))
        })
        .collect()
}

fn response_range(standards: &[Standard], line: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_r = f64::INFINITY;
    let mut max_r = f64::NEG_INFINITY;

    for s in standards {
        min_r = min_r.min(s.response);
        max_r = max_r.max(s.response);
    }
    for &(_, r) in line {
        min_r = min_r.min(r);
        max_r = max_r.max(r);
    }

    if min_r.is_finite() && max_r.is_finite() && max_r > min_r {
        Some((min_r, max_r))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(c: f64, c_min: f64, c_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((c - c_min) / (c_max - c_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(r: f64, r_min: f64, r_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((r - r_min) / (r_max - r_min)).clamp(0.0, 1.0);
    // Largest response is row 0.
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_line_series(grid: &mut [Vec<char>], line: &[(f64, f64)], c_min: f64, c_max: f64, r_min: f64, r_max: f64) {
    if line.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(c, r) in line {
        let x = map_x(c, c_min, c_max, width);
        let y = map_y(r, r_min, r_max, height);
        if let Some((x0, y0)) = prev {
            draw_segment(grid, x0, y0, x, y, '-');
        } else {
            grid[y][x] = '-';
        }
        prev = Some((x, y));
    }
}

/// Integer line drawing (Bresenham).
fn draw_segment(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
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

    fn identity_fit() -> (Vec<Standard>, FitResult) {
        let standards = vec![
            Standard { concentration: 0.0, response: 0.0 },
            Standard { concentration: 10.0, response: 10.0 },
        ];
        let fit = FitResult {
            slope: 1.0,
            intercept: 0.0,
            r_squared: 1.0,
            n: 2,
        };
        (standards, fit)
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let (standards, fit) = identity_fit();

        let txt = render_ascii_plot(&standards, &fit, 10, 5);
        let expected = concat!(
            "Plot: concentration=[0.000, 10.000] | response=[-0.50, 10.50]\n",
            "         o\n",
            "      --- \n",
            "    --    \n",
            " ---      \n",
            "o         \n",
            "y = 1.000x + 0.000 | R2 = 1.0000\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn curve_file_plot_matches_dimensions() {
        let (standards, fit) = identity_fit();
        let curve = crate::io::build_curve_file(&fit, &standards);

        let txt = render_ascii_plot_from_curve_file(&curve, 20, 8);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 1 + 8 + 1);
        assert!(lines[1..9].iter().all(|l| l.chars().count() == 20));
        assert!(lines[1].ends_with('o'));
        assert!(lines[8].starts_with('o'));
    }
}
