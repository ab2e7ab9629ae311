//! Dilution helpers built on `C1·V1 = C2·V2`.
//!
//! - `dilute` solves for whichever of the four quantities is missing
//! - `dilution_series` lays out stock volumes for a set of standards
//!
//! Concentrations are in mol/L and volumes in L throughout; see `units` for
//! display formatting.

pub mod units;

pub use units::*;

use crate::error::DilutionError;

/// The quantity `dilute` solved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unknown {
    C1,
    V1,
    C2,
    V2,
}

impl Unknown {
    pub fn label(self) -> &'static str {
        match self {
            Unknown::C1 => "C1",
            Unknown::V1 => "V1",
            Unknown::C2 => "C2",
            Unknown::V2 => "V2",
        }
    }

    pub fn kind(self) -> QuantityKind {
        match self {
            Unknown::C1 | Unknown::C2 => QuantityKind::Concentration,
            Unknown::V1 | Unknown::V2 => QuantityKind::Volume,
        }
    }
}

/// Known and unknown terms of a single dilution.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DilutionInput {
    /// Initial (stock) concentration.
    pub c1: Option<f64>,
    /// Volume of stock to add.
    pub v1: Option<f64>,
    /// Final concentration.
    pub c2: Option<f64>,
    /// Final volume.
    pub v2: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dilution {
    pub solved: Unknown,
    pub value: f64,
}

impl Dilution {
    pub fn formatted(&self) -> String {
        format_quantity(self.value, self.solved.kind())
    }
}

/// Solve `C1·V1 = C2·V2` for the single missing term.
pub fn dilute(input: DilutionInput) -> Result<Dilution, DilutionError> {
    let terms = [
        ("C1", input.c1),
        ("V1", input.v1),
        ("C2", input.c2),
        ("V2", input.v2),
    ];

    let unknowns = terms.iter().filter(|(_, v)| v.is_none()).count();
    if unknowns != 1 {
        return Err(DilutionError::Unknowns(unknowns));
    }
    for (field, value) in terms {
        if let Some(value) = value {
            if !value.is_finite() {
                return Err(DilutionError::NonFinite { field, value });
            }
        }
    }

    let (solved, numerator, divisor) = match (input.c1, input.v1, input.c2, input.v2) {
        (None, Some(v1), Some(c2), Some(v2)) => (Unknown::C1, c2 * v2, v1),
        (Some(c1), None, Some(c2), Some(v2)) => (Unknown::V1, c2 * v2, c1),
        (Some(c1), Some(v1), None, Some(v2)) => (Unknown::C2, c1 * v1, v2),
        (Some(c1), Some(v1), Some(c2), None) => (Unknown::V2, c1 * v1, c2),
        _ => return Err(DilutionError::Unknowns(unknowns)),
    };

    if divisor == 0.0 {
        return Err(DilutionError::ZeroDivisor(solved.label()));
    }

    Ok(Dilution {
        solved,
        value: numerator / divisor,
    })
}

/// Stock volumes and resulting concentrations for a dilution series.
#[derive(Debug, Clone, PartialEq)]
pub struct DilutionSeries {
    pub concentrations: Vec<f64>,
    pub stock_volumes: Vec<f64>,
}

/// Lay out `n_std` standards made up to `total_vol` from a stock at `stock_conc`.
///
/// Stock volumes step down linearly from `total_vol` to zero; each standard's
/// concentration is `stock_conc · volume / total_vol`.
pub fn dilution_series(
    n_std: usize,
    total_vol: f64,
    stock_conc: f64,
) -> Result<DilutionSeries, DilutionError> {
    if n_std < 2 {
        return Err(DilutionError::TooFewStandards(n_std));
    }
    if !total_vol.is_finite() {
        return Err(DilutionError::NonFinite {
            field: "total volume",
            value: total_vol,
        });
    }
    if total_vol <= 0.0 {
        return Err(DilutionError::NonPositiveVolume(total_vol));
    }

    let step = total_vol / (n_std - 1) as f64;
    let mut concentrations = Vec::with_capacity(n_std);
    let mut stock_volumes = Vec::with_capacity(n_std);

    for i in 0..n_std {
        let volume = total_vol - i as f64 * step;
        let conc = dilute(DilutionInput {
            c1: Some(stock_conc),
            v1: Some(volume),
            c2: None,
            v2: Some(total_vol),
        })?;
        stock_volumes.push(volume);
        concentrations.push(conc.value);
    }

    Ok(DilutionSeries {
        concentrations,
        stock_volumes,
    })
}
