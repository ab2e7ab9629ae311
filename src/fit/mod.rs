//! Curve fitting.
//!
//! Responsibilities:
//!
//! - hold validated standards and their linear fit (`StandardCurve`)
//! - invert a fit to estimate concentrations from responses

pub mod standard;

pub use standard::*;
