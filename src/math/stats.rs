//! Small descriptive statistics used by the fit diagnostics.

pub fn mean(v: &[f64]) -> Option<f64> {
    if v.is_empty() {
        return None;
    }
    Some(v.iter().sum::<f64>() / v.len() as f64)
}

/// Sum of squared deviations about the mean.
pub fn sum_sq_dev(v: &[f64]) -> f64 {
    let Some(m) = mean(v) else {
        return 0.0;
    };
    v.iter().map(|x| (x - m).powi(2)).sum()
}

/// Sum of squares a vector of `v`'s magnitude can pick up from round-off alone.
fn round_off_sq(v: &[f64]) -> f64 {
    let scale = v.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()));
    v.len() as f64 * (4.0 * f64::EPSILON * scale).powi(2)
}

/// Coefficient of determination `1 - SS_res / SS_tot`.
///
/// A constant `observed` has no variance to explain: a perfect prediction
/// scores `1.0` and anything else `0.0`. Sums of squares at the round-off
/// level of `observed` count as zero. Round-off outside `[0, 1]` is clamped.
pub fn r_squared(observed: &[f64], predicted: &[f64]) -> f64 {
    let ss_res: f64 = observed
        .iter()
        .zip(predicted)
        .map(|(o, p)| (o - p).powi(2))
        .sum();
    let ss_tot = sum_sq_dev(observed);
    let noise = round_off_sq(observed);

    if ss_tot <= noise {
        return if ss_res <= noise { 1.0 } else { 0.0 };
    }

    (1.0 - ss_res / ss_tot).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_is_none() {
        assert!(mean(&[]).is_none());
        assert_eq!(mean(&[1.0, 2.0, 3.0]), Some(2.0));
    }

    #[test]
    fn r_squared_perfect_and_constant() {
        assert_eq!(r_squared(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]), 1.0);
        assert_eq!(r_squared(&[5.0, 5.0], &[5.0, 5.0]), 1.0);
        assert_eq!(r_squared(&[5.0, 5.0], &[4.0, 6.0]), 0.0);
    }

    #[test]
    fn r_squared_ignores_round_off_on_constant_data() {
        let observed = [1234.567; 4];
        let predicted = [1234.567 + 2.3e-13; 4];
        assert_eq!(r_squared(&observed, &predicted), 1.0);

        // 0.1 + 0.2 is one ulp away from 0.3.
        assert_eq!(r_squared(&[0.1 + 0.2, 0.3, 0.3], &[0.3, 0.3, 0.3]), 1.0);
    }

    #[test]
    fn small_but_real_variance_is_not_constant() {
        let r2 = r_squared(&[1e8, 1e8 + 1e-4], &[1e8, 1e8 + 1e-4]);
        assert_eq!(r2, 1.0);
        let r2 = r_squared(&[1e8, 1e8 + 1e-4], &[1e8 + 5e-5, 1e8 + 5e-5]);
        assert!(r2 < 1e-6, "r2={r2}");
    }

    #[test]
    fn r_squared_partial() {
        // SS_tot = 2, SS_res = 0.5
        let r2 = r_squared(&[1.0, 2.0, 3.0], &[1.5, 2.0, 2.5]);
        assert!((r2 - 0.75).abs() < 1e-12);
    }
}
