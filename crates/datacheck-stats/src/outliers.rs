//! Outlier detection by IQR fencing or z-score.

use crate::describe::compute_stats;

/// Minimum population size before any outlier detection runs. Smaller inputs
/// yield an empty result regardless of how extreme the values are.
pub const MIN_SAMPLES: usize = 10;

/// Indices of values outside the IQR fences `[q1 - factor*iqr, q3 + factor*iqr]`.
///
/// Returns empty when fewer than [`MIN_SAMPLES`] values are supplied, or when
/// the interquartile range is zero (no usable spread to fence against).
/// Indices refer to positions in `values`, not sorted order.
pub fn detect_outliers_iqr(values: &[f64], factor: f64) -> Vec<usize> {
    if values.len() < MIN_SAMPLES {
        return Vec::new();
    }

    let stats = compute_stats(values);
    if stats.iqr == 0.0 {
        return Vec::new();
    }

    let lower = stats.q1 - factor * stats.iqr;
    let upper = stats.q3 + factor * stats.iqr;

    values
        .iter()
        .enumerate()
        .filter(|(_, v)| **v < lower || **v > upper)
        .map(|(i, _)| i)
        .collect()
}

/// Indices of values whose absolute z-score exceeds `threshold`.
///
/// Same minimum-sample gate as [`detect_outliers_iqr`]; a zero standard
/// deviation yields no outliers.
pub fn detect_outliers_zscore(values: &[f64], threshold: f64) -> Vec<usize> {
    if values.len() < MIN_SAMPLES {
        return Vec::new();
    }

    let stats = compute_stats(values);
    if stats.std == 0.0 {
        return Vec::new();
    }

    values
        .iter()
        .enumerate()
        .filter(|(_, v)| (**v - stats.mean).abs() / stats.std > threshold)
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_populations_are_never_flagged() {
        let extreme = [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1_000_000.0];
        assert!(detect_outliers_iqr(&extreme, 1.5).is_empty());
        assert!(detect_outliers_zscore(&extreme, 3.0).is_empty());
    }

    #[test]
    fn zero_variance_is_never_flagged() {
        let constant = vec![7.0; 20];
        assert!(detect_outliers_iqr(&constant, 1.5).is_empty());
        assert!(detect_outliers_zscore(&constant, 3.0).is_empty());
    }

    #[test]
    fn iqr_flags_the_extreme_index() {
        let values = [10.0, 11.0, 10.0, 9.0, 10.0, 11.0, 10.0, 9.0, 10.0, 10.0, 50.0];
        assert_eq!(detect_outliers_iqr(&values, 1.5), vec![10]);
    }

    #[test]
    fn zscore_flags_by_original_index() {
        let mut values = vec![10.0; 30];
        values[4] = 1000.0;
        assert_eq!(detect_outliers_zscore(&values, 3.0), vec![4]);
    }
}
