//! The population-level quality checker.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use datacheck_model::{
    CheckResult, Fields, MAX_FAILED_IDS_PER_RULE, OutlierMethod, RuleSummary, Schema, Severity,
    effective_fields, record_id,
};
use datacheck_rules::RuleSet;
use datacheck_stats::detect_anomalies;

use crate::dedupe::{find_duplicates, find_near_duplicates};
use crate::distribution::{compare_distributions, compute_distribution};

/// Runs a rule set over record populations and assembles [`CheckResult`]s.
#[derive(Debug, Default)]
pub struct QualityChecker {
    ruleset: RuleSet,
}

#[derive(Default)]
struct RuleTally {
    passed: usize,
    failed: usize,
    failed_ids: Vec<String>,
}

impl QualityChecker {
    pub fn new(ruleset: RuleSet) -> Self {
        Self { ruleset }
    }

    pub fn ruleset(&self) -> &RuleSet {
        &self.ruleset
    }

    /// Check a record population against the schema and every enabled rule.
    ///
    /// Only error-severity violations mark a record as failed; warnings and
    /// infos are counted without affecting the pass/fail tally. Each exact or
    /// near-duplicate group adds one warning. The progress callback fires
    /// once per record with `(completed, total)`.
    pub fn check(
        &self,
        records: &[Value],
        schema: &Schema,
        reference: Option<&[Value]>,
        mut on_progress: Option<&mut dyn FnMut(usize, usize)>,
    ) -> CheckResult {
        let mut result = CheckResult {
            total_samples: records.len(),
            ..CheckResult::default()
        };

        if records.is_empty() {
            result.pass_rate = 1.0;
            return result;
        }

        debug!(records = records.len(), ruleset = %self.ruleset.name, "checking population");

        let empty_fields = Fields::new();
        let mut rule_tallies: BTreeMap<String, RuleTally> = BTreeMap::new();
        let mut passed_count = 0usize;

        for (index, record) in records.iter().enumerate() {
            let sample_id = record_id(record, index);
            let fields = effective_fields(record).unwrap_or(&empty_fields);
            let mut sample_has_error = false;

            for rule in self.ruleset.enabled_rules() {
                let rule_result = rule.check(fields, schema);
                let tally = rule_tallies.entry(rule.id.clone()).or_default();

                if rule_result.passed {
                    tally.passed += 1;
                } else {
                    tally.failed += 1;
                    tally.failed_ids.push(sample_id.clone());

                    result.count_violation(rule_result.severity);
                    if rule_result.severity == Severity::Error {
                        sample_has_error = true;
                    }
                }
            }

            if sample_has_error {
                result.failed_sample_ids.push(sample_id);
            } else {
                passed_count += 1;
            }

            if let Some(callback) = on_progress.as_deref_mut() {
                callback(index + 1, records.len());
            }
        }

        result.passed_samples = passed_count;
        result.failed_samples = records.len() - passed_count;
        result.pass_rate = passed_count as f64 / records.len() as f64;

        for (rule_id, tally) in rule_tallies {
            let rule = self.ruleset.rule(&rule_id);
            let mut failed_samples = tally.failed_ids;
            failed_samples.truncate(MAX_FAILED_IDS_PER_RULE);
            result.rule_results.insert(
                rule_id.clone(),
                RuleSummary {
                    name: rule.map_or_else(|| rule_id.clone(), |r| r.name.clone()),
                    passed: tally.passed,
                    failed: tally.failed,
                    severity: rule.map_or(Severity::Warning, |r| r.severity),
                    failed_samples,
                },
            );
        }

        result.duplicates = find_duplicates(records);
        result.warning_count += result.duplicates.len();

        result.near_duplicates = find_near_duplicates(records, None);
        result.warning_count += result.near_duplicates.len();

        result.distribution = compute_distribution(records);

        result.anomalies = detect_anomalies(records, OutlierMethod::Iqr, 1.5, 3.0);
        result.anomaly_count = result
            .anomalies
            .values()
            .map(|detail| detail.outlier_count)
            .sum();

        if let Some(reference) = reference {
            result.distribution.reference_comparison =
                Some(compare_distributions(records, reference));
        }

        result
    }
}
