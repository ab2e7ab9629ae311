//! Export binned tables to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::BinnedTable;
use crate::error::AppError;

/// Write a binned table to a CSV file.
pub fn write_binned_csv(path: &Path, binned: &BinnedTable) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_binned(file, binned)
}

/// Write a binned table as CSV: bin bounds, row count, then one column per
/// source column. Empty bins leave their value cells blank.
pub fn write_binned<W: Write>(out: W, binned: &BinnedTable) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(out);

    let mut header = vec!["bin_lower", "bin_upper", "count"];
    header.extend(binned.columns.iter().map(String::as_str));
    writer
        .write_record(&header)
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for row in &binned.rows {
        let mut record = vec![row.lower.to_string(), row.upper.to_string(), row.count.to_string()];
        record.extend(row.values.iter().map(|v| v.map(|x| x.to_string()).unwrap_or_default()));
        writer
            .write_record(&record)
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}
