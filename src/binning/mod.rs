//! 1-D binning of depth/interval-indexed measurements.
//!
//! Bins are right-closed intervals `(k·w, (k+1)·w]` starting at zero. Every
//! column of the table is averaged within each bin, and the binning column
//! reports the ceiling of its in-bin mean so that rows line up with whole
//! bin labels (e.g. 1 m depth intervals).

use crate::domain::{BinRow, BinnedTable, Table};
use crate::error::BinningError;

/// Bin every column of `table` by `bin_column` with bins of `bin_width`.
///
/// Edges run `0, w, 2w, …` strictly below `floor(max) + w`. Values `<= 0`
/// or above the last edge fall outside every bin and are dropped, as are
/// rows whose binning value is not finite. Empty bins are kept with
/// `count = 0` and `None` values.
pub fn bin1d(table: &Table, bin_width: f64, bin_column: &str) -> Result<BinnedTable, BinningError> {
    if !(bin_width.is_finite() && bin_width > 0.0) {
        return Err(BinningError::InvalidWidth(bin_width));
    }
    let key = table
        .column_index(bin_column)
        .ok_or_else(|| BinningError::MissingColumn(bin_column.to_string()))?;

    let width = table.columns.len();
    for (row, values) in table.rows.iter().enumerate() {
        if values.len() != width {
            return Err(BinningError::RaggedRow {
                row,
                got: values.len(),
                expected: width,
            });
        }
    }

    let max = table
        .rows
        .iter()
        .map(|r| r[key])
        .filter(|v| v.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);

    let edges = bin_edges(max, bin_width);
    if edges.len() < 2 {
        return Err(BinningError::NoBins {
            column: bin_column.to_string(),
            max,
        });
    }
    let n_bins = edges.len() - 1;

    let mut sums = vec![vec![0.0; width]; n_bins];
    let mut counts = vec![vec![0usize; width]; n_bins];
    let mut rows_in_bin = vec![0usize; n_bins];
    let mut dropped = 0usize;

    for values in &table.rows {
        let Some(bin) = locate(&edges, values[key]) else {
            dropped += 1;
            continue;
        };
        rows_in_bin[bin] += 1;
        for (col, &v) in values.iter().enumerate() {
            // Missing cells (NaN) are skipped per column, like a pandas mean.
            if v.is_finite() {
                sums[bin][col] += v;
                counts[bin][col] += 1;
            }
        }
    }

    if dropped > 0 {
        log::debug!("bin1d: {dropped} rows fell outside (0, {}]", edges[n_bins]);
    }

    let rows = (0..n_bins)
        .map(|bin| {
            let values = (0..width)
                .map(|col| {
                    let n = counts[bin][col];
                    if n == 0 {
                        return None;
                    }
                    let mean = sums[bin][col] / n as f64;
                    Some(if col == key { mean.ceil() } else { mean })
                })
                .collect();
            BinRow {
                lower: edges[bin],
                upper: edges[bin + 1],
                count: rows_in_bin[bin],
                values,
            }
        })
        .collect();

    Ok(BinnedTable {
        columns: table.columns.clone(),
        bin_column: bin_column.to_string(),
        bin_width,
        rows,
    })
}

fn bin_edges(max: f64, width: f64) -> Vec<f64> {
    if !max.is_finite() {
        return Vec::new();
    }
    let stop = max.floor() + width;
    if stop <= 0.0 {
        return Vec::new();
    }
    let n = (stop / width).ceil() as usize;
    (0..n).map(|i| i as f64 * width).collect()
}

/// Index of the bin `(edges[i], edges[i + 1]]` containing `v`.
fn locate(edges: &[f64], v: f64) -> Option<usize> {
    if !v.is_finite() {
        return None;
    }
    let last = *edges.last()?;
    if v <= edges[0] || v > last {
        return None;
    }
    // First edge >= v closes the bin.
    let upper = edges.partition_point(|&e| e < v);
    Some(upper - 1)
}
