//! Random subsampling of record populations.

use rand::seq::index;
use serde_json::Value;
use tracing::debug;

/// Resolve the effective sample size for a population, if any sampling
/// applies. An explicit count wins when it is smaller than the population; a
/// rate must lie strictly between 0 and 1 and always keeps at least one
/// record.
pub fn sample_size(total: usize, sample_count: Option<usize>, sample_rate: Option<f64>) -> Option<usize> {
    if let Some(count) = sample_count
        && count < total
    {
        return Some(count);
    }
    if let Some(rate) = sample_rate
        && rate > 0.0
        && rate < 1.0
    {
        return Some(((total as f64 * rate) as usize).max(1));
    }
    None
}

/// Draw `k` records uniformly at random without replacement.
pub fn sample_records(records: Vec<Value>, k: usize) -> Vec<Value> {
    if k >= records.len() {
        return records;
    }
    let mut rng = rand::rng();
    let selected = index::sample(&mut rng, records.len(), k);
    debug!(total = records.len(), sampled = k, "subsampled population");

    let mut keep: Vec<bool> = vec![false; records.len()];
    for i in selected {
        keep[i] = true;
    }
    records
        .into_iter()
        .zip(keep)
        .filter_map(|(record, kept)| kept.then_some(record))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sample_size_prefers_count_then_rate() {
        assert_eq!(sample_size(100, Some(10), None), Some(10));
        assert_eq!(sample_size(100, Some(100), None), None);
        assert_eq!(sample_size(100, None, Some(0.25)), Some(25));
        assert_eq!(sample_size(100, None, Some(1.0)), None);
        assert_eq!(sample_size(100, None, Some(0.0)), None);
        // A tiny rate still keeps one record.
        assert_eq!(sample_size(10, None, Some(0.001)), Some(1));
        assert_eq!(sample_size(100, None, None), None);
    }

    #[test]
    fn sampling_draws_without_replacement() {
        let records: Vec<_> = (0..50).map(|i| json!({"i": i})).collect();
        let sampled = sample_records(records, 10);
        assert_eq!(sampled.len(), 10);
        let mut seen: Vec<i64> = sampled.iter().map(|r| r["i"].as_i64().expect("i")).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 10);
    }

    #[test]
    fn oversized_k_returns_everything() {
        let records: Vec<_> = (0..5).map(|i| json!({"i": i})).collect();
        assert_eq!(sample_records(records, 10).len(), 5);
    }
}
