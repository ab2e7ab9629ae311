//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting and binning
//! - exported to JSON/CSV
//! - reloaded later for prediction or plotting

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Runtime configuration for a `fit` run (built from CLI arguments).
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub csv_path: PathBuf,
    pub conc_col: String,
    pub resp_col: String,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub export_curve: Option<PathBuf>,
}

/// Parameters of a fitted standard curve `response = slope·concentration + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination, in `[0, 1]`.
    pub r_squared: f64,
    /// Number of standards the fit was computed from.
    pub n: usize,
}

impl FitResult {
    /// Response predicted by the fitted line.
    pub fn response_at(&self, concentration: f64) -> f64 {
        self.slope * concentration + self.intercept
    }
}

/// A single standard: known concentration and measured response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Standard {
    pub concentration: f64,
    pub response: f64,
}

/// Precomputed fitted values for quick plotting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveGrid {
    pub concentration: Vec<f64>,
    pub response: Vec<f64>,
}

/// Portable representation of a fitted standard curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveFile {
    pub tool: String,
    pub created: DateTime<Utc>,
    pub fit: FitResult,
    pub standards: Vec<Standard>,
    pub grid: CurveGrid,
}

/// Row-major numeric table with named columns.
///
/// This is the explicit input to binning; conversion from CSV lives in
/// `io::ingest`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Index of a column by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One right-closed interval `(lower, upper]` of a binned table.
#[derive(Debug, Clone, PartialEq)]
pub struct BinRow {
    pub lower: f64,
    pub upper: f64,
    /// Rows of the source table that fell in this bin.
    pub count: usize,
    /// Per-column means, `None` for empty bins.
    ///
    /// The binning column holds the ceiling of its in-bin mean.
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinnedTable {
    pub columns: Vec<String>,
    pub bin_column: String,
    pub bin_width: f64,
    pub rows: Vec<BinRow>,
}
