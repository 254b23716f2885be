//! Statistical anomaly detection over record populations.
//!
//! Numeric fields are checked against their own value distribution; string
//! fields are checked against their length distribution. Detection only runs
//! once a field has accumulated [`MIN_SAMPLES`] values, and a field with zero
//! outliers is omitted from the scan result entirely.

mod describe;
mod outliers;
mod scan;

pub use describe::{compute_stats, percentile};
pub use outliers::{MIN_SAMPLES, detect_outliers_iqr, detect_outliers_zscore};
pub use scan::detect_anomalies;
