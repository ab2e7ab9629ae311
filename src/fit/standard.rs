//! Standard curve: linear calibration between known concentrations and
//! instrument responses.
//!
//! Workflow:
//! - construct from paired standards (validated once, then immutable)
//! - `fit()` solves OLS for `response = slope·concentration + intercept`
//! - `predict_concentration()` inverts the fitted line for new responses
//!
//! Presentation (summary text, plots) lives in `report` and `plot` and only
//! consumes the returned `FitResult`.

use crate::domain::{FitResult, Standard};
use crate::error::CurveError;
use crate::math::{fit_line, r_squared};

#[derive(Debug, Clone)]
pub struct StandardCurve {
    concentrations: Vec<f64>,
    responses: Vec<f64>,
    fit: Option<FitResult>,
}

impl StandardCurve {
    /// Build a curve from equal-length sequences of at least two finite values.
    pub fn new(concentrations: &[f64], responses: &[f64]) -> Result<Self, CurveError> {
        if concentrations.len() != responses.len() {
            return Err(CurveError::Validation(format!(
                "{} concentrations but {} responses",
                concentrations.len(),
                responses.len()
            )));
        }
        if concentrations.len() < 2 {
            return Err(CurveError::Validation(format!(
                "at least 2 standards are required (got {})",
                concentrations.len()
            )));
        }
        if let Some(i) = concentrations.iter().position(|v| !v.is_finite()) {
            return Err(CurveError::Validation(format!(
                "concentration #{} is not finite ({})",
                i + 1,
                concentrations[i]
            )));
        }
        if let Some(i) = responses.iter().position(|v| !v.is_finite()) {
            return Err(CurveError::Validation(format!(
                "response #{} is not finite ({})",
                i + 1,
                responses[i]
            )));
        }

        Ok(Self {
            concentrations: concentrations.to_vec(),
            responses: responses.to_vec(),
            fit: None,
        })
    }

    /// Build a curve from `Standard` records (e.g. a reloaded curve file).
    pub fn from_standards(standards: &[Standard]) -> Result<Self, CurveError> {
        let (c, r): (Vec<f64>, Vec<f64>) = standards
            .iter()
            .map(|s| (s.concentration, s.response))
            .unzip();
        Self::new(&c, &r)
    }

    pub fn standards(&self) -> Vec<Standard> {
        self.concentrations
            .iter()
            .zip(&self.responses)
            .map(|(&concentration, &response)| Standard {
                concentration,
                response,
            })
            .collect()
    }

    /// The most recent fit, if `fit()` has been called.
    pub fn fit_result(&self) -> Option<&FitResult> {
        self.fit.as_ref()
    }

    /// Fit the OLS line, store it, and return it.
    ///
    /// Calling this again recomputes and overwrites the stored result.
    pub fn fit(&mut self) -> Result<FitResult, CurveError> {
        let first = self.concentrations[0];
        if self.concentrations.iter().all(|&c| c == first) {
            return Err(CurveError::DegenerateInput {
                n: self.concentrations.len(),
                value: first,
            });
        }

        let (slope, intercept) = fit_line(&self.concentrations, &self.responses).ok_or(
            CurveError::DegenerateInput {
                n: self.concentrations.len(),
                value: first,
            },
        )?;

        let predicted: Vec<f64> = self
            .concentrations
            .iter()
            .map(|c| slope * c + intercept)
            .collect();
        let r2 = r_squared(&self.responses, &predicted);

        let fit = FitResult {
            slope,
            intercept,
            r_squared: r2,
            n: self.concentrations.len(),
        };
        log::debug!(
            "fitted standard curve: n={} slope={slope:.6} intercept={intercept:.6} r2={r2:.6}",
            fit.n
        );

        self.fit = Some(fit);
        Ok(fit)
    }

    /// Estimate the concentration that produced `response`.
    pub fn predict_concentration(&self, response: f64) -> Result<f64, CurveError> {
        let fit = self.fit.as_ref().ok_or(CurveError::NotFitted)?;
        invert(fit, response)
    }

    /// Elementwise `predict_concentration`, preserving order and length.
    pub fn predict_concentrations(&self, responses: &[f64]) -> Result<Vec<f64>, CurveError> {
        let fit = self.fit.as_ref().ok_or(CurveError::NotFitted)?;
        responses.iter().map(|&r| invert(fit, r)).collect()
    }
}

/// Inverse prediction against an existing fit: `(response - intercept) / slope`.
///
/// `fit()` reports slopes lost in round-off as exactly `0.0`, so a flat
/// curve is always caught here.
pub fn invert(fit: &FitResult, response: f64) -> Result<f64, CurveError> {
    if fit.slope == 0.0 {
        return Err(CurveError::ZeroSlope);
    }
    Ok((response - fit.intercept) / fit.slope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const CONCS: [f64; 7] = [0.0, 2.0, 10.0, 25.0, 50.0, 75.0, 100.0];
    const RESPONSES: [f64; 7] = [627.07, 940.99, 1032.87, 1442.51, 2384.65, 3643.81, 4417.69];

    #[test]
    fn reference_standards_fit() {
        let mut curve = StandardCurve::new(&CONCS, &RESPONSES).unwrap();
        let fit = curve.fit().unwrap();

        // Closed-form OLS on these standards.
        assert!((fit.slope - 37.604_639).abs() < 1e-5, "slope={}", fit.slope);
        assert!((fit.intercept - 662.453_527).abs() < 1e-5, "intercept={}", fit.intercept);
        assert!((fit.r_squared - 0.990_772).abs() < 1e-5, "r2={}", fit.r_squared);
        assert_eq!(fit.n, 7);

        let c = curve.predict_concentration(1600.0).unwrap();
        assert!((c - 24.931_671).abs() < 1e-5, "c={c}");
    }

    #[test]
    fn perfect_line_recovers_parameters() {
        let x = [1.0, 2.0, 4.0, 8.0];
        let y: Vec<f64> = x.iter().map(|c| 2.5 * c - 3.0).collect();
        let mut curve = StandardCurve::new(&x, &y).unwrap();
        let fit = curve.fit().unwrap();

        assert!((fit.slope - 2.5).abs() < 1e-10);
        assert!((fit.intercept + 3.0).abs() < 1e-10);
        assert!((fit.r_squared - 1.0).abs() < 1e-12);
    }

    #[test]
    fn two_points_are_enough() {
        let mut curve = StandardCurve::new(&[0.0, 10.0], &[5.0, 25.0]).unwrap();
        let fit = curve.fit().unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-10);
        assert!((fit.intercept - 5.0).abs() < 1e-10);
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let err = StandardCurve::new(&[1.0, 2.0, 3.0], &[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, CurveError::Validation(_)));
    }

    #[test]
    fn single_standard_is_rejected() {
        let err = StandardCurve::new(&[1.0], &[1.0]).unwrap_err();
        assert!(matches!(err, CurveError::Validation(_)));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let err = StandardCurve::new(&[1.0, f64::NAN], &[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, CurveError::Validation(_)));
        let err = StandardCurve::new(&[1.0, 2.0], &[1.0, f64::INFINITY]).unwrap_err();
        assert!(matches!(err, CurveError::Validation(_)));
    }

    #[test]
    fn identical_concentrations_are_degenerate() {
        let mut curve = StandardCurve::new(&[5.0, 5.0, 5.0], &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(
            curve.fit().unwrap_err(),
            CurveError::DegenerateInput { n: 3, value: 5.0 }
        );
        assert!(curve.fit_result().is_none());
    }

    #[test]
    fn predict_before_fit_fails() {
        let curve = StandardCurve::new(&CONCS, &RESPONSES).unwrap();
        assert_eq!(curve.predict_concentration(1600.0), Err(CurveError::NotFitted));
        assert_eq!(curve.predict_concentrations(&[1.0, 2.0]), Err(CurveError::NotFitted));
    }

    #[test]
    fn constant_responses_fit_flat_line() {
        for level in [7.0, 1234.567, -0.3] {
            let mut curve = StandardCurve::new(&[1.0, 2.0, 3.0, 10.0], &[level; 4]).unwrap();
            let fit = curve.fit().unwrap();
            assert_eq!(fit.slope, 0.0);
            assert_eq!(fit.intercept, level);
            assert_eq!(fit.r_squared, 1.0);
            assert_eq!(curve.predict_concentration(8.0), Err(CurveError::ZeroSlope));
        }
    }

    #[test]
    fn standards_far_from_zero_fit_exactly() {
        for base in [1e7, 1e8, 1e9] {
            let x = [base, base + 1.0, base + 2.0, base + 3.0];
            let mut curve = StandardCurve::new(&x, &[1.0, 3.0, 5.0, 7.0]).unwrap();
            let fit = curve.fit().unwrap();

            assert!((fit.slope - 2.0).abs() < 1e-9, "base={base} slope={}", fit.slope);
            assert!(fit.r_squared > 1.0 - 1e-9, "base={base} r2={}", fit.r_squared);

            let c = curve.predict_concentration(5.0).unwrap();
            assert!((c - (base + 2.0)).abs() < 1e-5, "base={base} c={c}");
        }
    }

    #[test]
    fn zero_slope_is_reported() {
        let fit = FitResult {
            slope: 0.0,
            intercept: 1.0,
            r_squared: 1.0,
            n: 2,
        };
        assert_eq!(invert(&fit, 3.0), Err(CurveError::ZeroSlope));
    }

    #[test]
    fn batch_prediction_preserves_order() {
        let mut curve = StandardCurve::new(&[0.0, 1.0], &[1.0, 3.0]).unwrap();
        curve.fit().unwrap();
        let out = curve.predict_concentrations(&[5.0, 1.0, 3.0]).unwrap();
        assert_eq!(out.len(), 3);
        assert!((out[0] - 2.0).abs() < 1e-10);
        assert!((out[1] - 0.0).abs() < 1e-10);
        assert!((out[2] - 1.0).abs() < 1e-10);
        assert!(curve.predict_concentrations(&[]).unwrap().is_empty());
    }

    #[test]
    fn refit_overwrites_previous_result() {
        let mut curve = StandardCurve::new(&CONCS, &RESPONSES).unwrap();
        let first = curve.fit().unwrap();
        let second = curve.fit().unwrap();
        assert_eq!(first, second);
        assert_eq!(curve.fit_result(), Some(&second));
    }

    #[test]
    fn random_standards_satisfy_fit_invariants() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let n = rng.gen_range(2..20);
            let slope = rng.gen_range(-50.0..50.0);
            let intercept = rng.gen_range(-1000.0..1000.0);
            let base = if rng.gen_bool(0.5) { 0.0 } else { rng.gen_range(-1e9..1e9) };
            let x: Vec<f64> = (0..n).map(|i| base + i as f64 * rng.gen_range(0.5..5.0)).collect();
            let y: Vec<f64> = x
                .iter()
                .map(|c| slope * c + intercept + rng.gen_range(-10.0..10.0))
                .collect();

            let mut curve = StandardCurve::new(&x, &y).unwrap();
            let fit = curve.fit().unwrap();
            assert!(fit.slope.is_finite() && fit.intercept.is_finite());
            assert!((0.0..=1.0).contains(&fit.r_squared));

            // Closed form on centred data: m = Sxy / Sxx.
            let mx = x.iter().sum::<f64>() / n as f64;
            let my = y.iter().sum::<f64>() / n as f64;
            let sxy: f64 = x.iter().zip(&y).map(|(a, b)| (a - mx) * (b - my)).sum();
            let sxx: f64 = x.iter().map(|a| (a - mx).powi(2)).sum();
            let expected = sxy / sxx;
            let flattened = fit.slope == 0.0 && expected.abs() < 1e-3;
            assert!(
                flattened || (fit.slope - expected).abs() < 1e-9 * (1.0 + expected.abs()),
                "base={base} slope={} expected={expected}",
                fit.slope
            );

            if fit.slope.abs() > 0.1 {
                let c = base + rng.gen_range(-100.0..100.0);
                let back = curve.predict_concentration(fit.response_at(c)).unwrap();
                assert!((back - c).abs() < 1e-6 * (1.0 + c.abs()), "c={c} back={back}");
            }
        }
    }
}
