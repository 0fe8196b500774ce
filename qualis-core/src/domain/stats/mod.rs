// qualis-core/src/domain/stats/mod.rs
//
// Statistical engine: pure functions over dataset columns.
// Degenerate inputs (empty column, zero variance) are modelled as result variants.

pub mod correlation;
pub mod descriptive;
pub mod outliers;

pub use correlation::{CorrelationMethod, correlation_analysis, correlation_matrix};
pub use descriptive::descriptive_statistics;
pub use outliers::{iqr_column, iqr_outliers, zscore_column, zscore_outliers};

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator), `None` below two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Quantile with linear interpolation between closest ranks. `sorted` must be ascending.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    let pos = (sorted.len() - 1) as f64 * q;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

pub fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Rounds half to even at `decimals` places.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    if !value.is_finite() || decimals > 15 {
        return value;
    }
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round_ties_even() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_std() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[1.0, 2.0, 3.0]), Some(2.0));
        assert_eq!(sample_std(&[5.0]), None);
        let std = sample_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap_or_default();
        assert!((std - 2.138089935299395).abs() < 1e-12);
    }

    #[test]
    fn test_quantile_linear_interpolation() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile_sorted(&sorted, 0.25), Some(1.75));
        assert_eq!(quantile_sorted(&sorted, 0.5), Some(2.5));
        assert_eq!(quantile_sorted(&sorted, 0.75), Some(3.25));
        assert_eq!(quantile_sorted(&sorted, 1.0), Some(4.0));
        assert_eq!(quantile_sorted(&sorted, 1.5), None);
        assert_eq!(quantile_sorted(&[], 0.5), None);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 4), 1.2346);
        assert_eq!(round_to(2.5, 0), 2.0);
        assert_eq!(round_to(-0.00004, 4), -0.0);
    }
}
