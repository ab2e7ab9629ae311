//! `lab-curves` library crate.
//!
//! The binary (`lab`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the standard curve, dilution and binning helpers are usable from other tools

pub mod app;
pub mod binning;
pub mod cli;
pub mod dilution;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;

pub use fit::StandardCurve;
