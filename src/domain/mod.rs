//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - fit outputs (`FitResult`) and their portable form (`CurveFile`)
//! - the explicit numeric `Table` used for binning, and its binned form

pub mod types;

pub use types::*;
