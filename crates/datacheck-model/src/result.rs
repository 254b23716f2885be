//! Check result value objects.
//!
//! A [`CheckResult`] is constructed fresh per check invocation and is
//! immutable once returned; report renderers serialize it verbatim.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::anomaly::AnomalyDetail;
use crate::distribution::Distribution;
use crate::severity::Severity;

/// Maximum failing record ids retained per rule in the breakdown.
pub const MAX_FAILED_IDS_PER_RULE: usize = 10;

/// Evaluation summary for one record population.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckResult {
    pub success: bool,
    pub error: String,
    pub total_samples: usize,
    pub passed_samples: usize,
    pub failed_samples: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    pub pass_rate: f64,
    pub rule_results: BTreeMap<String, RuleSummary>,
    pub failed_sample_ids: Vec<String>,
    pub duplicates: Vec<Vec<String>>,
    pub near_duplicates: Vec<Vec<String>>,
    pub distribution: Distribution,
    pub anomalies: BTreeMap<String, AnomalyDetail>,
    pub anomaly_count: usize,
    pub sampled: bool,
    pub sampled_count: usize,
    pub original_count: usize,
}

impl Default for CheckResult {
    fn default() -> Self {
        Self {
            success: true,
            error: String::new(),
            total_samples: 0,
            passed_samples: 0,
            failed_samples: 0,
            error_count: 0,
            warning_count: 0,
            info_count: 0,
            pass_rate: 0.0,
            rule_results: BTreeMap::new(),
            failed_sample_ids: Vec::new(),
            duplicates: Vec::new(),
            near_duplicates: Vec::new(),
            distribution: Distribution::default(),
            anomalies: BTreeMap::new(),
            anomaly_count: 0,
            sampled: false,
            sampled_count: 0,
            original_count: 0,
        }
    }
}

impl CheckResult {
    /// A result describing a check that could not run at all.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            ..Self::default()
        }
    }

    /// Count one violation at the given severity.
    pub fn count_violation(&mut self, severity: Severity) {
        match severity {
            Severity::Error => self.error_count += 1,
            Severity::Warning => self.warning_count += 1,
            Severity::Info => self.info_count += 1,
        }
    }
}

/// Per-rule breakdown within a [`CheckResult`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSummary {
    pub name: String,
    pub passed: usize,
    pub failed: usize,
    pub severity: Severity,
    /// Failing record ids, truncated to [`MAX_FAILED_IDS_PER_RULE`].
    pub failed_samples: Vec<String>,
}

/// Aggregate result of checking every data file under a directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchCheckResult {
    pub success: bool,
    pub error: String,
    pub directory: String,
    pub file_results: BTreeMap<String, CheckResult>,
    pub total_files: usize,
    pub passed_files: usize,
    pub failed_files: usize,
    pub total_samples: usize,
    pub total_passed_samples: usize,
    pub total_failed_samples: usize,
    pub overall_pass_rate: f64,
    pub total_error_count: usize,
    pub total_warning_count: usize,
    pub total_info_count: usize,
    /// Files that failed to load, as `"relative/path: reason"` entries.
    pub skipped_files: Vec<String>,
}

impl Default for BatchCheckResult {
    fn default() -> Self {
        Self {
            success: true,
            error: String::new(),
            directory: String::new(),
            file_results: BTreeMap::new(),
            total_files: 0,
            passed_files: 0,
            failed_files: 0,
            total_samples: 0,
            total_passed_samples: 0,
            total_failed_samples: 0,
            overall_pass_rate: 0.0,
            total_error_count: 0,
            total_warning_count: 0,
            total_info_count: 0,
            skipped_files: Vec::new(),
        }
    }
}
