//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the fitting/dilution/binning code stays free of presentation
//! - output changes are localized (important for snapshot tests)

use crate::dilution::{Dilution, DilutionSeries, QuantityKind, format_quantity};
use crate::domain::{BinnedTable, FitResult};

/// Best-fit equation, e.g. `y = 37.605x + 662.454`.
pub fn equation(fit: &FitResult) -> String {
    let sign = if fit.intercept < 0.0 { '-' } else { '+' };
    format!("y = {:.3}x {sign} {:.3}", fit.slope, fit.intercept.abs())
}

/// Fit diagnostics: n, slope, intercept, R² and the equation line.
pub fn format_fit_summary(fit: &FitResult) -> String {
    let mut out = String::new();

    out.push_str("=== lab - Standard Curve ===\n");
    out.push_str(&format!("Standards: n={}\n", fit.n));
    out.push_str(&format!("Slope:     {:.6}\n", fit.slope));
    out.push_str(&format!("Intercept: {:.6}\n", fit.intercept));
    out.push_str(&format!("R2:        {:.4}\n", fit.r_squared));
    out.push_str(&format!("Best fit:  {}\n", equation(fit)));

    out
}

/// Response → concentration table for a batch of predictions.
pub fn format_predictions(responses: &[f64], concentrations: &[f64]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:>14} {:>14}\n", "response", "concentration"));
    out.push_str(&format!("{:-<14} {:-<14}\n", "", ""));
    for (r, c) in responses.iter().zip(concentrations) {
        out.push_str(&format!("{r:>14.4} {c:>14.4}\n"));
    }
    out
}

/// Solved dilution term with a readable unit, e.g. `V1 = 250.0 uL`.
pub fn format_dilution(d: &Dilution) -> String {
    format!("{} = {}", d.solved.label(), d.formatted())
}

pub fn format_series(series: &DilutionSeries) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<4} {:>14} {:>14}\n", "#", "stock volume", "concentration"));
    out.push_str(&format!("{:-<4} {:-<14} {:-<14}\n", "", "", ""));
    for (i, (v, c)) in series
        .stock_volumes
        .iter()
        .zip(&series.concentrations)
        .enumerate()
    {
        out.push_str(&format!(
            "{:<4} {:>14} {:>14}\n",
            i + 1,
            format_quantity(*v, QuantityKind::Volume),
            format_quantity(*c, QuantityKind::Concentration),
        ));
    }
    out
}

pub fn format_binned(binned: &BinnedTable) -> String {
    let mut out = format!("Binned by {} (width {})\n", binned.bin_column, binned.bin_width);

    let mut header = format!("{:<16} {:>6}", "bin", "n");
    for c in &binned.columns {
        header.push_str(&format!(" {:>12}", truncate(c, 12)));
    }
    out.push_str(header.trim_end());
    out.push('\n');

    for row in &binned.rows {
        let label = format!("({}, {}]", row.lower, row.upper);
        let mut line = format!("{:<16} {:>6}", truncate(&label, 16), row.count);
        for v in &row.values {
            line.push_str(&format!(" {:>12}", fmt_opt(*v)));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.3}"),
        _ => "-".to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
