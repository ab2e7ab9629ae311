//! Least squares solver.
//!
//! Standard curves are small straight-line regressions:
//!
//! ```text
//! minimize Σ (y_i - (b + m·x_i))^2
//! ```
//!
//! Both sides are centred on their means before solving, so standards that
//! sit far from zero stay well conditioned, and the intercept is recovered
//! as `ȳ - m·x̄`. The centred system is solved with SVD, which handles tall
//! systems and reports rank deficiency instead of panicking.
//! (Nalgebra's `QR::solve` is intended for square systems.)

use nalgebra::{DMatrix, DVector};

use super::stats::mean;

/// Singular values below this fraction of the largest one count as rank loss.
const RANK_TOL: f64 = 1e-12;

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is rank deficient or too ill-conditioned to
/// solve robustly; a truncated solution is never returned.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Singular values are compared relative to the largest one so that the
    // acceptance threshold does not depend on the units of the inputs.
    let scale = svd.singular_values.max();
    if !(scale.is_finite() && scale > 0.0) {
        return None;
    }
    let cutoff = RANK_TOL * scale;
    if svd.singular_values.iter().any(|&s| s <= cutoff) {
        return None;
    }

    match svd.solve(y, cutoff) {
        Ok(beta) if beta.iter().all(|v| v.is_finite()) => Some(beta),
        _ => None,
    }
}

/// Ordinary least squares line through `(x_i, y_i)` with an intercept.
///
/// Returns `(slope, intercept)`, or `None` when the inputs are too short or
/// every `x_i` is identical. A slope whose effect across the `x` range is
/// below the round-off of `y` is reported as exactly `0.0`.
pub fn fit_line(x: &[f64], y: &[f64]) -> Option<(f64, f64)> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    // SVD would return the minimum-norm solution here rather than failing.
    if x.iter().all(|&v| v == x[0]) {
        return None;
    }
    if y.iter().all(|&v| v == y[0]) {
        return Some((0.0, y[0]));
    }

    let x_mean = mean(x)?;
    let y_mean = mean(y)?;

    let design = DMatrix::from_fn(x.len(), 1, |r, _| x[r] - x_mean);
    let rhs = DVector::from_iterator(y.len(), y.iter().map(|v| v - y_mean));

    let beta = solve_least_squares(&design, &rhs)?;
    let mut slope = beta[0];

    let (x_min, x_max) = x
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let y_scale = y.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if slope.abs() * (x_max - x_min) <= x.len() as f64 * f64::EPSILON * y_scale {
        slope = 0.0;
    }

    Some((slope, y_mean - slope * x_mean))
}
