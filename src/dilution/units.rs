//! SI-prefix formatting for volumes and concentrations.
//!
//! Quantities are carried in base units (L, mol/L) and formatted with the
//! prefix that keeps the printed number readable, rounded to one decimal.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantityKind {
    /// Litres.
    Volume,
    /// Moles per litre.
    Concentration,
}

impl QuantityKind {
    pub fn base_unit(self) -> &'static str {
        match self {
            QuantityKind::Volume => "L",
            QuantityKind::Concentration => "M",
        }
    }
}

/// Format a base-unit value with an n/u/m prefix.
///
/// Thresholds: `< 1e-6` nano, `[1e-6, 1e-3)` micro, `[1e-3, 0.1)` milli,
/// `>= 0.1` base unit.
pub fn format_quantity(value: f64, kind: QuantityKind) -> String {
    let unit = kind.base_unit();
    let magnitude = value.abs();

    let (scaled, prefix) = if magnitude >= 0.1 {
        (value, "")
    } else if magnitude >= 1e-3 {
        (value * 1e3, "m")
    } else if magnitude >= 1e-6 {
        (value * 1e6, "u")
    } else {
        (value * 1e9, "n")
    };

    format!("{scaled:.1} {prefix}{unit}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volumes_pick_readable_prefix() {
        assert_eq!(format_quantity(1.5, QuantityKind::Volume), "1.5 L");
        assert_eq!(format_quantity(0.1, QuantityKind::Volume), "0.1 L");
        assert_eq!(format_quantity(0.05, QuantityKind::Volume), "50.0 mL");
        assert_eq!(format_quantity(1e-3, QuantityKind::Volume), "1.0 mL");
        assert_eq!(format_quantity(2.5e-4, QuantityKind::Volume), "250.0 uL");
        assert_eq!(format_quantity(1e-6, QuantityKind::Volume), "1.0 uL");
        assert_eq!(format_quantity(5e-8, QuantityKind::Volume), "50.0 nL");
    }

    #[test]
    fn concentrations_use_molar_suffix() {
        assert_eq!(format_quantity(1.5e-3, QuantityKind::Concentration), "1.5 mM");
        assert_eq!(format_quantity(2.0, QuantityKind::Concentration), "2.0 M");
    }

    #[test]
    fn zero_is_printed_in_nano_units() {
        assert_eq!(format_quantity(0.0, QuantityKind::Volume), "0.0 nL");
    }
}
