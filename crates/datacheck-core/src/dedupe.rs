//! Exact and near-duplicate detection.

use std::collections::HashMap;

use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::debug;

use datacheck_model::{effective_value, record_id};
use datacheck_text::{compute_ngrams, jaccard_similarity};

/// Populations larger than this skip near-duplicate detection entirely; the
/// pairwise scan is quadratic.
pub const NEAR_DUPLICATE_LIMIT: usize = 5000;

/// Default Jaccard similarity at which two records cluster together.
pub const NEAR_DUPLICATE_THRESHOLD: f64 = 0.8;

/// Content hash of a record's effective value, over a canonical key-sorted
/// serialization. Two records with the same content hash identically
/// regardless of key order or wrapper ids.
pub fn content_hash(record: &Value) -> String {
    let canonical = canonical_json(effective_value(record));
    hex::encode(Sha256::digest(canonical.as_bytes()))
}

/// Serialize with object keys sorted at every level.
fn canonical_json(value: &Value) -> String {
    fn canonicalize(value: &Value) -> Value {
        match value {
            // serde_json maps iterate in sorted key order; rebuilding the
            // tree normalizes nested objects too.
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), canonicalize(value)))
                    .collect(),
            ),
            Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
            other => other.clone(),
        }
    }
    canonicalize(value).to_string()
}

/// Group records by content hash; every hash shared by two or more records
/// forms one group, in first-occurrence order.
pub fn find_duplicates(records: &[Value]) -> Vec<Vec<String>> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<String>> = HashMap::new();

    for (index, record) in records.iter().enumerate() {
        let hash = content_hash(record);
        let ids = groups.entry(hash.clone()).or_insert_with(|| {
            order.push(hash);
            Vec::new()
        });
        ids.push(record_id(record, index));
    }

    order
        .into_iter()
        .filter_map(|hash| groups.remove(&hash))
        .filter(|ids| ids.len() > 1)
        .collect()
}

/// Greedy near-duplicate clustering over 3-gram Jaccard similarity.
///
/// Each record's text is the space-joined concatenation of its string-valued
/// fields. For every unassigned record, all later unassigned records within
/// `threshold` similarity join its group; groups with more than one member
/// are reported, and a record belongs to at most one group. Populations over
/// [`NEAR_DUPLICATE_LIMIT`] return no groups at all.
pub fn find_near_duplicates(records: &[Value], threshold: Option<f64>) -> Vec<Vec<String>> {
    let threshold = threshold.unwrap_or(NEAR_DUPLICATE_THRESHOLD);

    if records.len() > NEAR_DUPLICATE_LIMIT {
        debug!(
            records = records.len(),
            limit = NEAR_DUPLICATE_LIMIT,
            "population too large, skipping near-duplicate detection"
        );
        return Vec::new();
    }

    let profiles: Vec<_> = records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let text = effective_value(record)
                .as_object()
                .map(|fields| {
                    fields
                        .values()
                        .filter_map(Value::as_str)
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .unwrap_or_default();
            (record_id(record, index), compute_ngrams(&text, 3))
        })
        .collect();

    let mut groups = Vec::new();
    let mut assigned = vec![false; profiles.len()];

    for i in 0..profiles.len() {
        if assigned[i] {
            continue;
        }
        let mut group = vec![profiles[i].0.clone()];
        for j in (i + 1)..profiles.len() {
            if assigned[j] {
                continue;
            }
            if jaccard_similarity(&profiles[i].1, &profiles[j].1) >= threshold {
                group.push(profiles[j].0.clone());
                assigned[j] = true;
            }
        }
        if group.len() > 1 {
            groups.push(group);
            assigned[i] = true;
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hash_ignores_key_order_and_wrapper_id() {
        let a = json!({"id": "a", "data": {"x": 1, "y": 2}});
        let b = json!({"id": "b", "data": {"y": 2, "x": 1}});
        let c = json!({"x": 1, "y": 2});
        assert_eq!(content_hash(&a), content_hash(&b));
        assert_eq!(content_hash(&a), content_hash(&c));
        assert_ne!(content_hash(&a), content_hash(&json!({"x": 1, "y": 3})));
    }

    #[test]
    fn duplicate_groups_collect_ids_in_order() {
        let records = vec![
            json!({"id": "a", "data": {"text": "same"}}),
            json!({"id": "b", "data": {"text": "other"}}),
            json!({"id": "c", "data": {"text": "same"}}),
        ];
        let groups = find_duplicates(&records);
        assert_eq!(groups, vec![vec!["a".to_string(), "c".to_string()]]);
    }

    #[test]
    fn near_duplicates_cluster_first_match_wins() {
        let records = vec![
            json!({"id": "a", "text": "the quick brown fox jumps over the lazy dog"}),
            json!({"id": "b", "text": "the quick brown fox jumps over the lazy dog!"}),
            json!({"id": "c", "text": "an entirely unrelated piece of content"}),
        ];
        let groups = find_near_duplicates(&records, None);
        assert_eq!(groups, vec![vec!["a".to_string(), "b".to_string()]]);
    }

    #[test]
    fn oversized_population_is_skipped() {
        let records: Vec<Value> = (0..=NEAR_DUPLICATE_LIMIT)
            .map(|_| json!({"text": "identical content everywhere"}))
            .collect();
        assert_eq!(records.len(), 5001);
        assert!(find_near_duplicates(&records, None).is_empty());
    }
}
