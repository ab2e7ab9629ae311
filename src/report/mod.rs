//! Reporting: text summaries of fits, predictions, dilutions and bins.

pub mod format;

pub use format::*;
