//! Terminal plots of fitted standard curves.

pub mod ascii;

pub use ascii::*;
