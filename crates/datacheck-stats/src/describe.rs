//! Descriptive statistics.

use datacheck_model::Stats;

/// Compute mean, population standard deviation, median and quartiles.
///
/// An empty input yields all zeros; a single value yields zero spread. The
/// standard deviation divides by N, not N-1.
pub fn compute_stats(values: &[f64]) -> Stats {
    if values.is_empty() {
        return Stats::default();
    }

    let n = values.len();
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mean = sorted.iter().sum::<f64>() / n as f64;

    if n == 1 {
        return Stats {
            mean,
            std: 0.0,
            median: mean,
            q1: mean,
            q3: mean,
            iqr: 0.0,
        };
    }

    let variance = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
    let std = variance.sqrt();

    let median = percentile(&sorted, 0.5);
    let q1 = percentile(&sorted, 0.25);
    let q3 = percentile(&sorted, 0.75);

    Stats {
        mean,
        std,
        median,
        q1,
        q3,
        iqr: q3 - q1,
    }
}

/// Percentile by linear interpolation between bracketing order statistics.
///
/// `sorted` must already be in ascending order. Uses the index `k = (n-1)*p`,
/// blending floor and ceil neighbors by the fractional part of `k`.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let k = (n - 1) as f64 * p;
    let f = k.floor();
    let c = k.ceil();
    if f == c {
        return sorted[k as usize];
    }
    sorted[f as usize] * (c - k) + sorted[c as usize] * (k - f)
}
