//! Per-field distribution statistics over a record population.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde_json::Value;

use datacheck_model::{
    Distribution, DistributionComparison, DiversityComparison, FieldComparison, FieldDistribution,
    LengthComparison, LengthStats, ValueCount, ValueStats, effective_fields,
};

/// Compute count, null count, string-length and numeric-value statistics per
/// field.
///
/// A field with mixed string and numeric values registers both stat blocks;
/// the `type` tag is written by whichever block ran last (numeric), matching
/// long-standing reporting behavior.
pub fn compute_distribution(records: &[Value]) -> Distribution {
    let mut distribution = Distribution {
        total: records.len(),
        ..Distribution::default()
    };

    if records.is_empty() {
        return distribution;
    }

    let mut field_values: BTreeMap<String, Vec<&Value>> = BTreeMap::new();
    for record in records {
        let Some(fields) = effective_fields(record) else {
            continue;
        };
        for (key, value) in fields {
            field_values.entry(key.clone()).or_default().push(value);
        }
    }

    for (field_name, values) in field_values {
        let mut stats = FieldDistribution {
            count: values.len(),
            null_count: values.iter().filter(|v| v.is_null()).count(),
            ..FieldDistribution::default()
        };

        let string_values: Vec<&str> = values.iter().filter_map(|v| v.as_str()).collect();
        if !string_values.is_empty() {
            let lengths: Vec<usize> = string_values.iter().map(|s| s.chars().count()).collect();
            stats.value_type = Some("string".to_string());
            stats.length_stats = Some(LengthStats {
                min: lengths.iter().copied().min().unwrap_or(0),
                max: lengths.iter().copied().max().unwrap_or(0),
                avg: lengths.iter().sum::<usize>() as f64 / lengths.len() as f64,
            });

            let unique: HashSet<&str> = string_values.iter().copied().collect();
            stats.unique_count = Some(unique.len());
            stats.unique_ratio = Some(unique.len() as f64 / string_values.len() as f64);
        }

        let number_values: Vec<f64> = values.iter().filter_map(|v| v.as_f64()).collect();
        if !number_values.is_empty() {
            stats.value_type = Some("number".to_string());
            stats.value_stats = Some(ValueStats {
                min: number_values.iter().copied().fold(f64::INFINITY, f64::min),
                max: number_values
                    .iter()
                    .copied()
                    .fold(f64::NEG_INFINITY, f64::max),
                avg: number_values.iter().sum::<f64>() / number_values.len() as f64,
            });
            stats.value_distribution = Some(most_common_values(&number_values, 10));
        }

        distribution.fields.insert(field_name, stats);
    }

    distribution
}

/// The `limit` most frequent exact values, most frequent first; ties break
/// toward the smaller value.
fn most_common_values(values: &[f64], limit: usize) -> Vec<ValueCount> {
    let mut counts: HashMap<u64, (f64, usize)> = HashMap::new();
    for value in values {
        let entry = counts.entry(value.to_bits()).or_insert((*value, 0));
        entry.1 += 1;
    }

    let mut ranked: Vec<ValueCount> = counts
        .into_values()
        .map(|(value, count)| ValueCount { value, count })
        .collect();
    ranked.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.value.total_cmp(&b.value))
    });
    ranked.truncate(limit);
    ranked
}

/// Field-by-field comparison of a population against a reference population.
pub fn compare_distributions(records: &[Value], reference: &[Value]) -> DistributionComparison {
    let sample_dist = compute_distribution(records);
    let reference_dist = compute_distribution(reference);

    let mut comparison = DistributionComparison {
        sample_count: records.len(),
        reference_count: reference.len(),
        field_comparisons: BTreeMap::new(),
    };

    let field_names: HashSet<&String> = sample_dist
        .fields
        .keys()
        .chain(reference_dist.fields.keys())
        .collect();

    for field_name in field_names {
        let sample_field = sample_dist.fields.get(field_name);
        let reference_field = reference_dist.fields.get(field_name);

        let mut field_comparison = FieldComparison {
            in_samples: sample_field.is_some(),
            in_reference: reference_field.is_some(),
            ..FieldComparison::default()
        };

        if let (Some(sample_lengths), Some(reference_lengths)) = (
            sample_field.and_then(|f| f.length_stats),
            reference_field.and_then(|f| f.length_stats),
        ) {
            let diff_percent = if reference_lengths.avg > 0.0 {
                (sample_lengths.avg - reference_lengths.avg).abs() / reference_lengths.avg * 100.0
            } else {
                0.0
            };
            field_comparison.length_comparison = Some(LengthComparison {
                sample_avg: sample_lengths.avg,
                reference_avg: reference_lengths.avg,
                diff_percent,
            });
        }

        if let (Some(sample_ratio), Some(reference_ratio)) = (
            sample_field.and_then(|f| f.unique_ratio),
            reference_field.and_then(|f| f.unique_ratio),
        ) {
            field_comparison.diversity_comparison = Some(DiversityComparison {
                sample_unique_ratio: sample_ratio,
                reference_unique_ratio: reference_ratio,
            });
        }

        comparison
            .field_comparisons
            .insert(field_name.clone(), field_comparison);
    }

    comparison
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_fields_get_length_and_uniqueness() {
        let records = vec![
            json!({"text": "alpha"}),
            json!({"text": "beta"}),
            json!({"text": "alpha"}),
        ];
        let distribution = compute_distribution(&records);
        let field = &distribution.fields["text"];
        assert_eq!(field.count, 3);
        assert_eq!(field.value_type.as_deref(), Some("string"));
        let lengths = field.length_stats.expect("length stats");
        assert_eq!(lengths.min, 4);
        assert_eq!(lengths.max, 5);
        assert_eq!(field.unique_count, Some(2));
        assert!((field.unique_ratio.expect("ratio") - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn numeric_fields_get_value_stats_and_top_values() {
        let records: Vec<Value> = (0..5)
            .map(|i| json!({"score": if i < 3 { 1 } else { 2 }}))
            .collect();
        let distribution = compute_distribution(&records);
        let field = &distribution.fields["score"];
        assert_eq!(field.value_type.as_deref(), Some("number"));
        let stats = field.value_stats.expect("value stats");
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 2.0);
        let top = field.value_distribution.as_ref().expect("distribution");
        assert_eq!(top[0].value, 1.0);
        assert_eq!(top[0].count, 3);
    }

    #[test]
    fn mixed_typed_field_keeps_the_numeric_tag() {
        let records = vec![json!({"v": "text"}), json!({"v": 7})];
        let distribution = compute_distribution(&records);
        let field = &distribution.fields["v"];
        // Both stat blocks exist, the tag reflects the numeric write.
        assert!(field.length_stats.is_some());
        assert!(field.value_stats.is_some());
        assert_eq!(field.value_type.as_deref(), Some("number"));
    }

    #[test]
    fn null_values_are_counted() {
        let records = vec![json!({"v": null}), json!({"v": "x"})];
        let distribution = compute_distribution(&records);
        assert_eq!(distribution.fields["v"].null_count, 1);
    }

    #[test]
    fn comparison_covers_presence_length_and_diversity() {
        let samples = vec![json!({"text": "aaaa", "only_sample": 1})];
        let reference = vec![json!({"text": "aaaaaaaa"}), json!({"text": "bbbbbbbb"})];
        let comparison = compare_distributions(&samples, &reference);

        assert_eq!(comparison.sample_count, 1);
        assert_eq!(comparison.reference_count, 2);

        let text = &comparison.field_comparisons["text"];
        assert!(text.in_samples && text.in_reference);
        let lengths = text.length_comparison.expect("length comparison");
        assert_eq!(lengths.sample_avg, 4.0);
        assert_eq!(lengths.reference_avg, 8.0);
        assert!((lengths.diff_percent - 50.0).abs() < 1e-12);
        assert!(text.diversity_comparison.is_some());

        let only = &comparison.field_comparisons["only_sample"];
        assert!(only.in_samples && !only.in_reference);
    }
}
