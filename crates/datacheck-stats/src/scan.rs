//! Per-field anomaly scan over a record population.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use datacheck_model::{AnomalyDetail, Bounds, FieldKind, OutlierMethod, effective_fields};

use crate::describe::compute_stats;
use crate::outliers::{MIN_SAMPLES, detect_outliers_iqr, detect_outliers_zscore};

/// Scan every field of a record population for outliers.
///
/// Numeric values accumulate under the field's own name; string values
/// accumulate their length (in characters) under a derived `"{field} (长度)"`
/// key. Booleans are not numbers and never accumulate. Records that are not
/// objects are skipped.
///
/// Populations (or individual fields) with fewer than [`MIN_SAMPLES`] values
/// are not scanned, and fields without any outlier are omitted from the
/// result. The reported bounds are always the IQR fences, rounded to two
/// decimals, even when the z-score method selected the outliers.
pub fn detect_anomalies(
    records: &[Value],
    method: OutlierMethod,
    factor: f64,
    zscore_threshold: f64,
) -> BTreeMap<String, AnomalyDetail> {
    if records.len() < MIN_SAMPLES {
        return BTreeMap::new();
    }

    let mut field_values: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    let mut field_kinds: BTreeMap<String, FieldKind> = BTreeMap::new();

    for record in records {
        let Some(fields) = effective_fields(record) else {
            continue;
        };
        for (key, value) in fields {
            match value {
                Value::Number(number) => {
                    if let Some(v) = number.as_f64() {
                        field_values.entry(key.clone()).or_default().push(v);
                        field_kinds.insert(key.clone(), FieldKind::Number);
                    }
                }
                Value::String(text) => {
                    let length_key = format!("{key} (长度)");
                    field_values
                        .entry(length_key.clone())
                        .or_default()
                        .push(text.chars().count() as f64);
                    field_kinds.insert(length_key, FieldKind::Length);
                }
                _ => {}
            }
        }
    }

    let mut results = BTreeMap::new();

    for (field_name, values) in field_values {
        if values.len() < MIN_SAMPLES {
            continue;
        }

        let stats = compute_stats(&values);
        let outlier_indices = match method {
            OutlierMethod::Zscore => detect_outliers_zscore(&values, zscore_threshold),
            OutlierMethod::Iqr => detect_outliers_iqr(&values, factor),
        };

        if outlier_indices.is_empty() {
            continue;
        }

        debug!(
            field = %field_name,
            outliers = outlier_indices.len(),
            "anomalous field detected"
        );

        let lower = stats.q1 - factor * stats.iqr;
        let upper = stats.q3 + factor * stats.iqr;

        let outlier_count = outlier_indices.len();
        results.insert(
            field_name.clone(),
            AnomalyDetail {
                stats,
                outlier_indices,
                outlier_count,
                method,
                field_type: field_kinds[&field_name],
                bounds: Bounds {
                    lower: round2(lower),
                    upper: round2(upper),
                },
            },
        );
    }

    results
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
