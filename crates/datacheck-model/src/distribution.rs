//! Per-field distribution statistics and reference comparisons.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Distribution summary over a record population.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Distribution {
    pub total: usize,
    pub fields: BTreeMap<String, FieldDistribution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_comparison: Option<DistributionComparison>,
}

/// Statistics for one field across the population.
///
/// A field with mixed string/numeric values registers both stat blocks; the
/// `type` tag is last-write-wins with numeric stats computed after string
/// stats, so such a field ends up tagged `"number"`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldDistribution {
    pub count: usize,
    pub null_count: usize,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length_stats: Option<LengthStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_stats: Option<ValueStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_distribution: Option<Vec<ValueCount>>,
}

/// String-length summary.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LengthStats {
    pub min: usize,
    pub max: usize,
    pub avg: f64,
}

/// Numeric value summary.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ValueStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

/// One entry of the most-frequent-values list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: f64,
    pub count: usize,
}

/// Field-by-field comparison against a reference population.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributionComparison {
    pub sample_count: usize,
    pub reference_count: usize,
    pub field_comparisons: BTreeMap<String, FieldComparison>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldComparison {
    pub in_samples: bool,
    pub in_reference: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length_comparison: Option<LengthComparison>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diversity_comparison: Option<DiversityComparison>,
}

/// Average-length difference for a field present in both populations.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LengthComparison {
    pub sample_avg: f64,
    pub reference_avg: f64,
    pub diff_percent: f64,
}

/// Unique-value diversity side by side.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DiversityComparison {
    pub sample_unique_ratio: f64,
    pub reference_unique_ratio: f64,
}
