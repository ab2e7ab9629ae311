//! Shared fit workflow used by the `demo`, `fit` and `predict` commands.
//!
//! standards -> StandardCurve -> fit -> (summary | plot | export | predict)
//!
//! The command handlers in `app` only decide what to print.

use std::path::Path;

use crate::domain::{FitConfig, FitResult};
use crate::error::AppError;
use crate::fit::StandardCurve;
use crate::io::ingest::read_standards_csv;

/// Example standards (concentrations in nM, responses as peak areas).
pub const DEMO_CONCENTRATIONS: [f64; 7] = [0.0, 2.0, 10.0, 25.0, 50.0, 75.0, 100.0];
pub const DEMO_RESPONSES: [f64; 7] = [627.07, 940.99, 1032.87, 1442.51, 2384.65, 3643.81, 4417.69];
/// Response of the example unknown sample.
pub const DEMO_UNKNOWN_RESPONSE: f64 = 1600.0;

/// Outputs of a single fit run.
#[derive(Debug, Clone)]
pub struct FitRun {
    pub curve: StandardCurve,
    pub fit: FitResult,
}

/// Outputs of the built-in demonstration.
#[derive(Debug, Clone)]
pub struct DemoRun {
    pub run: FitRun,
    pub unknown_concentration: f64,
}

/// Read standards from CSV and fit them.
pub fn run_fit(config: &FitConfig) -> Result<FitRun, AppError> {
    let ingest = read_standards_csv(&config.csv_path, &config.conc_col, &config.resp_col)?;
    if !ingest.row_errors.is_empty() {
        log::warn!(
            "{} of {} rows in '{}' were skipped",
            ingest.row_errors.len(),
            ingest.rows_read,
            config.csv_path.display()
        );
    }

    fit_values(&ingest.concentrations(), &ingest.responses())
}

/// Fit in-memory standards.
pub fn fit_values(concentrations: &[f64], responses: &[f64]) -> Result<FitRun, AppError> {
    let mut curve = StandardCurve::new(concentrations, responses)?;
    let fit = curve.fit()?;
    Ok(FitRun { curve, fit })
}

/// Fit the example standards and estimate the example unknown.
pub fn run_demo() -> Result<DemoRun, AppError> {
    let run = fit_values(&DEMO_CONCENTRATIONS, &DEMO_RESPONSES)?;
    let unknown_concentration = run.curve.predict_concentration(DEMO_UNKNOWN_RESPONSE)?;
    Ok(DemoRun {
        run,
        unknown_concentration,
    })
}

/// Rebuild a fitted curve from a curve JSON file.
///
/// The standards stored in the file are refitted so that the returned curve
/// is in the fitted state; the refit must reproduce the stored parameters.
pub fn curve_from_json(path: &Path) -> Result<StandardCurve, AppError> {
    let file = crate::io::curve::read_curve_json(path)?;
    let mut curve = StandardCurve::from_standards(&file.standards)?;
    let fit = curve.fit()?;

    let tol = 1e-9 * (1.0 + file.fit.slope.abs().max(file.fit.intercept.abs()));
    if (fit.slope - file.fit.slope).abs() > tol || (fit.intercept - file.fit.intercept).abs() > tol {
        return Err(AppError::new(
            2,
            format!(
                "Curve JSON '{}' is inconsistent: stored fit does not match its standards.",
                path.display()
            ),
        ));
    }
    Ok(curve)
}
