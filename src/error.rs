//! Error types.
//!
//! The library surfaces typed errors per component (`CurveError`,
//! `DilutionError`, `BinningError`). The binary folds them into `AppError`,
//! which carries the process exit code:
//!
//! - `2`: input/output files (missing, unreadable, malformed)
//! - `3`: invalid user input (lengths, dilution unknowns, bin settings)
//! - `4`: numerical failures (degenerate data, flat fit, not fitted)

use thiserror::Error;

/// Errors raised by [`crate::fit::StandardCurve`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    /// Mismatched, insufficient or non-finite observations.
    #[error("invalid standards: {0}")]
    Validation(String),

    /// Every concentration is identical, so the slope is undefined.
    #[error("degenerate standards: all {n} concentrations equal {value}")]
    DegenerateInput { n: usize, value: f64 },

    #[error("standard curve has not been fitted; call fit() first")]
    NotFitted,

    /// The fitted line is flat and cannot be inverted.
    #[error("fitted slope is zero; concentration cannot be recovered from a response")]
    ZeroSlope,
}

/// Errors raised by the dilution helpers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DilutionError {
    #[error("exactly one of C1, V1, C2, V2 must be unknown (got {0} unknowns)")]
    Unknowns(usize),

    #[error("cannot solve for {0}: divisor is zero")]
    ZeroDivisor(&'static str),

    #[error("{field} must be finite (got {value})")]
    NonFinite { field: &'static str, value: f64 },

    #[error("a dilution series needs at least 2 standards (got {0})")]
    TooFewStandards(usize),

    #[error("total volume must be positive (got {0})")]
    NonPositiveVolume(f64),
}

/// Errors raised by [`crate::binning::bin1d`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BinningError {
    #[error("column '{0}' is not present in the table")]
    MissingColumn(String),

    #[error("bin width must be positive and finite (got {0})")]
    InvalidWidth(f64),

    #[error("no bins: the largest '{column}' value ({max}) is below one bin width")]
    NoBins { column: String, max: f64 },

    #[error("table row {row} has {got} values, expected {expected}")]
    RaggedRow { row: usize, got: usize, expected: usize },
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<CurveError> for AppError {
    fn from(err: CurveError) -> Self {
        let code = match err {
            CurveError::Validation(_) => 3,
            CurveError::DegenerateInput { .. } | CurveError::NotFitted | CurveError::ZeroSlope => 4,
        };
        AppError::new(code, err.to_string())
    }
}

impl From<DilutionError> for AppError {
    fn from(err: DilutionError) -> Self {
        AppError::new(3, err.to_string())
    }
}

impl From<BinningError> for AppError {
    fn from(err: BinningError) -> Self {
        AppError::new(3, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_errors_map_to_exit_codes() {
        assert_eq!(AppError::from(CurveError::Validation("x".into())).exit_code(), 3);
        assert_eq!(AppError::from(CurveError::NotFitted).exit_code(), 4);
        assert_eq!(
            AppError::from(CurveError::DegenerateInput { n: 3, value: 1.0 }).exit_code(),
            4
        );
    }

    #[test]
    fn app_error_displays_message_only() {
        let err = AppError::from(DilutionError::Unknowns(2));
        assert_eq!(err.to_string(), "exactly one of C1, V1, C2, V2 must be unknown (got 2 unknowns)");
    }
}
