//! Read/write curve JSON files.
//!
//! Curve JSON is the "portable" representation of a fitted standard curve:
//! - slope, intercept, R² and the number of standards
//! - the standards themselves (so the fit can be reproduced)
//! - a precomputed fitted grid for quick plotting
//!
//! The schema is defined by `domain::CurveFile`.

use std::fs::File;
use std::path::Path;

use chrono::Utc;

use crate::domain::{CurveFile, CurveGrid, FitResult, Standard};
use crate::error::AppError;

const GRID_POINTS: usize = 101;

/// Assemble the portable curve representation.
pub fn build_curve_file(fit: &FitResult, standards: &[Standard]) -> CurveFile {
    let (c_min, c_max) = standards
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
            (lo.min(s.concentration), hi.max(s.concentration))
        });

    CurveFile {
        tool: "lab".to_string(),
        created: Utc::now(),
        fit: *fit,
        standards: standards.to_vec(),
        grid: build_grid(fit, c_min, c_max, GRID_POINTS),
    }
}

/// Write a curve JSON file.
pub fn write_curve_json(path: &Path, fit: &FitResult, standards: &[Standard]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create curve JSON '{}': {e}", path.display())))?;

    let curve = build_curve_file(fit, standards);
    serde_json::to_writer_pretty(file, &curve)
        .map_err(|e| AppError::new(2, format!("Failed to write curve JSON: {e}")))?;

    log::debug!("wrote curve JSON to {}", path.display());
    Ok(())
}

/// Read a curve JSON file.
pub fn read_curve_json(path: &Path) -> Result<CurveFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open curve JSON '{}': {e}", path.display())))?;
    let curve: CurveFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid curve JSON: {e}")))?;
    Ok(curve)
}

fn build_grid(fit: &FitResult, c_min: f64, c_max: f64, n: usize) -> CurveGrid {
    let n = n.max(2);
    let mut c0 = c_min;
    let mut c1 = c_max;
    if !(c0.is_finite() && c1.is_finite()) || c1 < c0 {
        c0 = 0.0;
        c1 = 1.0;
    }
    if (c1 - c0).abs() < 1e-12 {
        c0 -= 0.5;
        c1 += 0.5;
    }

    let mut concentration = Vec::with_capacity(n);
    let mut response = Vec::with_capacity(n);

    for i in 0..n {
        let u = i as f64 / (n as f64 - 1.0);
        let c = c0 + u * (c1 - c0);
        concentration.push(c);
        response.push(fit.response_at(c));
    }

    CurveGrid {
        concentration,
        response,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_fit() -> (FitResult, Vec<Standard>) {
        let fit = FitResult {
            slope: 2.0,
            intercept: 1.0,
            r_squared: 0.875,
            n: 3,
        };
        let standards = vec![
            Standard { concentration: 0.0, response: 1.25 },
            Standard { concentration: 5.0, response: 10.75 },
            Standard { concentration: 10.0, response: 21.0 },
        ];
        (fit, standards)
    }

    #[test]
    fn grid_spans_standards() {
        let (fit, standards) = sample_fit();
        let curve = build_curve_file(&fit, &standards);
        assert_eq!(curve.grid.concentration.len(), GRID_POINTS);
        assert_eq!(curve.grid.concentration[0], 0.0);
        assert_eq!(curve.grid.concentration[GRID_POINTS - 1], 10.0);
        assert_eq!(curve.grid.response[GRID_POINTS - 1], 21.0);
    }

    #[test]
    fn curve_json_round_trips_through_disk() {
        let (fit, standards) = sample_fit();
        let path = std::env::temp_dir().join(format!("lab_curve_{}.json", std::process::id()));

        write_curve_json(&path, &fit, &standards).unwrap();
        let back = read_curve_json(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(back.tool, "lab");
        assert_eq!(back.fit, fit);
        assert_eq!(back.standards, standards);
    }

    #[test]
    fn missing_file_is_exit_code_2() {
        let err = read_curve_json(Path::new("/nonexistent/lab/curve.json")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
