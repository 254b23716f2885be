//! Property tests for the statistics engine.

use proptest::prelude::*;

use datacheck_stats::{compute_stats, detect_outliers_iqr, detect_outliers_zscore};

proptest! {
    #[test]
    fn quartiles_are_ordered_and_bounded(values in prop::collection::vec(-1e6f64..1e6, 1..200)) {
        let stats = compute_stats(&values);
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        prop_assert!(stats.q1 <= stats.median + 1e-9);
        prop_assert!(stats.median <= stats.q3 + 1e-9);
        prop_assert!(stats.q1 >= min - 1e-9 && stats.q3 <= max + 1e-9);
        prop_assert!(stats.iqr >= 0.0);
        prop_assert!(stats.std >= 0.0);
    }

    #[test]
    fn small_inputs_never_flag(values in prop::collection::vec(-1e9f64..1e9, 0..10)) {
        prop_assert!(detect_outliers_iqr(&values, 1.5).is_empty());
        prop_assert!(detect_outliers_zscore(&values, 3.0).is_empty());
    }

    #[test]
    fn iqr_outliers_lie_outside_the_fences(values in prop::collection::vec(-1e4f64..1e4, 10..100)) {
        let stats = compute_stats(&values);
        let lower = stats.q1 - 1.5 * stats.iqr;
        let upper = stats.q3 + 1.5 * stats.iqr;
        for index in detect_outliers_iqr(&values, 1.5) {
            prop_assert!(index < values.len());
            prop_assert!(values[index] < lower || values[index] > upper);
        }
    }

    #[test]
    fn zscore_indices_are_valid(values in prop::collection::vec(-1e4f64..1e4, 10..100)) {
        for index in detect_outliers_zscore(&values, 3.0) {
            prop_assert!(index < values.len());
        }
    }
}
