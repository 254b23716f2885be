//! Value types for statistical anomaly detection.

use serde::{Deserialize, Serialize};

/// Basic descriptive statistics over a numeric population.
///
/// `std` is the population standard deviation (divide by N); quartiles use
/// linear interpolation between bracketing order statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub mean: f64,
    pub std: f64,
    pub median: f64,
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
}

/// Outlier detection method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutlierMethod {
    #[default]
    Iqr,
    Zscore,
}

/// How a field's values were accumulated: numeric fields contribute their
/// values, string fields contribute their lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Number,
    Length,
}

/// Normal-range bounds, rounded to two decimals for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

/// Anomaly report for one field. Only emitted for fields with at least one
/// outlier; clean fields are omitted from the scan result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyDetail {
    pub stats: Stats,
    pub outlier_indices: Vec<usize>,
    pub outlier_count: usize,
    pub method: OutlierMethod,
    pub field_type: FieldKind,
    pub bounds: Bounds,
}
