//! Weight computation over quality-gated annotation responses.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use datacheck_core::QualityChecker;
use datacheck_ingest::load_schema;
use datacheck_model::{CheckResult, Schema};
use datacheck_rules::annotation_ruleset;

/// Kinds of annotation contributions. `Conclusion` and `Maintenance` are
/// never auto-classified; they exist for custom weight tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionType {
    Review,
    PeerReview,
    CornerCase,
    Conclusion,
    Maintenance,
}

impl ContributionType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContributionType::Review => "review",
            ContributionType::PeerReview => "peer_review",
            ContributionType::CornerCase => "corner_case",
            ContributionType::Conclusion => "conclusion",
            ContributionType::Maintenance => "maintenance",
        }
    }
}

/// The default base weight per contribution type.
pub fn default_base_weights() -> BTreeMap<String, f64> {
    BTreeMap::from([
        ("review".to_string(), 1.0),
        ("peer_review".to_string(), 3.0),
        ("corner_case".to_string(), 8.0),
        ("conclusion".to_string(), 20.0),
        ("maintenance".to_string(), 5.0),
    ])
}

/// One credited contribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributionRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub contribution_type: ContributionType,
    pub description: String,
    pub weight: f64,
    #[serde(rename = "weightBreakdown")]
    pub weight_breakdown: WeightBreakdown,
    pub task_id: String,
    pub annotator_id: String,
    pub timestamp: String,
}

/// The factors behind a contribution weight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WeightBreakdown {
    pub base: f64,
    #[serde(rename = "qualityMultiplier")]
    pub quality_multiplier: f64,
    #[serde(rename = "timeMultiplier")]
    pub time_multiplier: f64,
    #[serde(rename = "scarcityMultiplier")]
    pub scarcity_multiplier: f64,
}

/// Batch scoring result.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContributeResult {
    pub total_responses: usize,
    pub passed_responses: usize,
    pub failed_responses: usize,
    pub contributions: Vec<ContributionRecord>,
    pub total_weight: f64,
    pub check_result: Option<CheckResult>,
}

impl ContributeResult {
    /// The report shape consumed by downstream tooling: a summary block plus
    /// the contribution list.
    pub fn to_json(&self) -> Value {
        json!({
            "summary": {
                "total_responses": self.total_responses,
                "passed_responses": self.passed_responses,
                "failed_responses": self.failed_responses,
                "total_contributions": self.contributions.len(),
                "total_weight": round2(self.total_weight),
                "quality_pass_rate": self
                    .check_result
                    .as_ref()
                    .map(|r| (r.pass_rate * 10_000.0).round() / 10_000.0),
            },
            "contributions": self.contributions,
        })
    }
}

/// Scoring knobs.
#[derive(Debug, Clone, Default)]
pub struct ContributeOptions {
    /// Overrides the default base weight table.
    pub base_weights: Option<BTreeMap<String, f64>>,
    /// Dataset creation time anchoring the early-submission bonus.
    pub dataset_created_at: Option<String>,
    /// Annotator credited on every record.
    pub annotator_id: Option<String>,
}

/// Score a list of annotation responses.
///
/// Responses are wrapped as `{id, data}` records and checked with the
/// annotation rule set; responses in the failed-id set earn nothing.
pub fn calculate_contributions(
    responses: &[Value],
    schema: &Schema,
    options: &ContributeOptions,
) -> ContributeResult {
    let default_weights = default_base_weights();
    let weights = options.base_weights.as_ref().unwrap_or(&default_weights);
    let annotator_id = options.annotator_id.as_deref().unwrap_or("unknown");

    let mut result = ContributeResult {
        total_responses: responses.len(),
        ..ContributeResult::default()
    };

    let samples: Vec<Value> = responses
        .iter()
        .enumerate()
        .map(|(index, response)| {
            let id = response
                .get("task_id")
                .cloned()
                .unwrap_or_else(|| Value::String(format!("sample_{index}")));
            json!({"id": id, "data": response})
        })
        .collect();

    let checker = QualityChecker::new(annotation_ruleset());
    let check_result = checker.check(&samples, schema, None, None);
    let failed_ids: HashSet<&str> = check_result
        .failed_sample_ids
        .iter()
        .map(String::as_str)
        .collect();

    debug!(
        responses = responses.len(),
        failed = failed_ids.len(),
        "quality gate finished"
    );

    for (index, response) in responses.iter().enumerate() {
        let task_id =
            id_string(response.get("task_id")).unwrap_or_else(|| format!("TASK_{:03}", index + 1));
        let sample_id =
            id_string(response.get("task_id")).unwrap_or_else(|| format!("sample_{index}"));

        if failed_ids.contains(sample_id.as_str()) || failed_ids.contains(task_id.as_str()) {
            result.failed_responses += 1;
            continue;
        }
        result.passed_responses += 1;

        let contribution_type = classify(response);
        let base = weights
            .get(contribution_type.as_str())
            .copied()
            .unwrap_or(1.0);

        let quality = quality_multiplier(response, schema);
        let annotated_at = response
            .get("annotated_at")
            .and_then(Value::as_str)
            .unwrap_or("");
        let time = time_multiplier(annotated_at, options.dataset_created_at.as_deref());
        let scarcity = scarcity_multiplier(result.total_responses);

        let weight = round2(base * quality * time * scarcity);

        result.contributions.push(ContributionRecord {
            id: format!("CR_{:04}", index + 1),
            contribution_type,
            description: describe(response, &task_id),
            weight,
            weight_breakdown: WeightBreakdown {
                base,
                quality_multiplier: quality,
                time_multiplier: time,
                scarcity_multiplier: scarcity,
            },
            task_id,
            annotator_id: annotator_id.to_string(),
            timestamp: if annotated_at.is_empty() {
                Utc::now().to_rfc3339()
            } else {
                annotated_at.to_string()
            },
        });
        result.total_weight += weight;
    }

    result.check_result = Some(check_result);
    result
}

/// Score an annotation export file (`{"responses": [...]}` or a bare array).
pub fn calculate_contributions_file(
    responses_path: &Path,
    schema_path: Option<&Path>,
    options: &ContributeOptions,
) -> Result<ContributeResult> {
    let content = std::fs::read_to_string(responses_path)
        .with_context(|| format!("read {}", responses_path.display()))?;
    let raw: Value = serde_json::from_str(&content)
        .with_context(|| format!("parse {}", responses_path.display()))?;

    let responses = match raw {
        Value::Object(mut object) => match object.remove("responses") {
            Some(Value::Array(responses)) => responses,
            _ => Vec::new(),
        },
        Value::Array(responses) => responses,
        _ => Vec::new(),
    };

    let schema = match schema_path {
        Some(path) => load_schema(path)?,
        None => Schema::default(),
    };

    Ok(calculate_contributions(&responses, &schema, options))
}

/// Infer the contribution type from the response's shape.
fn classify(response: &Value) -> ContributionType {
    if response.get("ranking").is_some() {
        return ContributionType::PeerReview;
    }
    let comment_len = response
        .get("comment")
        .and_then(Value::as_str)
        .map(|comment| comment.chars().count())
        .unwrap_or(0);
    if comment_len > 50 {
        return ContributionType::CornerCase;
    }
    ContributionType::Review
}

/// 1.0 for a passing response, +0.1 for a substantive comment, +0.1 for a
/// score matching the rubric exactly.
fn quality_multiplier(response: &Value, schema: &Schema) -> f64 {
    let mut multiplier = 1.0;

    let comment_len = response
        .get("comment")
        .and_then(Value::as_str)
        .map(|comment| comment.chars().count())
        .unwrap_or(0);
    if comment_len >= 10 {
        multiplier += 0.1;
    }

    let rubric_scores = schema.rubric_scores();
    if !rubric_scores.is_empty()
        && let Some(score) = response.get("score")
        && rubric_scores.iter().any(|valid| scores_equal(valid, score))
    {
        multiplier += 0.1;
    }

    round2(multiplier)
}

/// Early submissions earn more, relative to the dataset creation time (or
/// the annotation's own timestamp when none is given, which always lands in
/// the first-day bracket).
fn time_multiplier(annotated_at: &str, dataset_created_at: Option<&str>) -> f64 {
    if annotated_at.is_empty() {
        return 1.0;
    }
    let Some(annotated) = parse_timestamp(annotated_at) else {
        return 1.0;
    };
    let created = dataset_created_at
        .and_then(parse_timestamp)
        .unwrap_or(annotated);

    let days_since = (annotated - created).num_days().max(0);
    match days_since {
        0..=1 => 1.5,
        2..=7 => 1.2,
        8..=30 => 1.0,
        _ => 0.9,
    }
}

/// Small populations make each contribution more valuable.
fn scarcity_multiplier(total_responses: usize) -> f64 {
    if total_responses < 50 {
        1.3
    } else if total_responses < 200 {
        1.1
    } else {
        1.0
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed);
    }
    // Timestamps without an offset are taken as UTC.
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc().fixed_offset())
}

fn describe(response: &Value, task_id: &str) -> String {
    let mut description = format!("annotation {task_id}");

    let outcome = if let Some(score) = response.get("score") {
        Some(format!("score={score}"))
    } else if let Some(ranking) = response.get("ranking") {
        Some(format!("ranking={ranking}"))
    } else {
        response.get("choice").map(|choice| format!("choice={choice}"))
    };
    if let Some(outcome) = outcome {
        description.push_str(&format!(" ({outcome})"));
    }

    if let Some(comment) = response.get("comment").and_then(Value::as_str)
        && !comment.is_empty()
    {
        let preview: String = comment.chars().take(30).collect();
        description.push_str(&format!(" - {preview}"));
    }

    description
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Task ids may be strings or numbers; both resolve the way record ids do.
fn id_string(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(id)) => Some(id.clone()),
        Some(Value::Number(id)) => Some(id.to_string()),
        _ => None,
    }
}

/// Rubric membership with Python-style numeric equality: an integer rubric
/// score accepts the equal float.
fn scores_equal(a: &Value, b: &Value) -> bool {
    if a == b {
        return true;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranking_classifies_as_peer_review() {
        assert_eq!(
            classify(&json!({"ranking": [1, 2]})),
            ContributionType::PeerReview
        );
        assert_eq!(
            classify(&json!({"comment": "x".repeat(60)})),
            ContributionType::CornerCase
        );
        assert_eq!(classify(&json!({"score": 5})), ContributionType::Review);
    }

    #[test]
    fn quality_multiplier_stacks_bonuses() {
        let schema: Schema = serde_json::from_value(json!({
            "scoring_rubric": [{"score": 5, "label": "good"}],
        }))
        .expect("schema");

        assert_eq!(quality_multiplier(&json!({}), &Schema::default()), 1.0);
        assert_eq!(
            quality_multiplier(&json!({"comment": "detailed feedback"}), &Schema::default()),
            1.1
        );
        assert_eq!(
            quality_multiplier(
                &json!({"comment": "detailed feedback", "score": 5}),
                &schema
            ),
            1.2
        );
        assert_eq!(quality_multiplier(&json!({"score": 3}), &schema), 1.0);
    }

    #[test]
    fn time_multiplier_brackets() {
        let created = Some("2026-01-01T00:00:00Z");
        assert_eq!(time_multiplier("2026-01-01T12:00:00Z", created), 1.5);
        assert_eq!(time_multiplier("2026-01-05T00:00:00Z", created), 1.2);
        assert_eq!(time_multiplier("2026-01-20T00:00:00Z", created), 1.0);
        assert_eq!(time_multiplier("2026-03-01T00:00:00Z", created), 0.9);
        // No creation anchor: the annotation is its own anchor, first day.
        assert_eq!(time_multiplier("2026-03-01T00:00:00Z", None), 1.5);
        assert_eq!(time_multiplier("", created), 1.0);
        assert_eq!(time_multiplier("not a date", created), 1.0);
    }

    #[test]
    fn scarcity_multiplier_brackets() {
        assert_eq!(scarcity_multiplier(3), 1.3);
        assert_eq!(scarcity_multiplier(100), 1.1);
        assert_eq!(scarcity_multiplier(500), 1.0);
    }

    #[test]
    fn weights_multiply_and_round() {
        let responses = vec![json!({
            "task_id": "T1",
            "ranking": [1, 2],
            "comment": "thorough comparison of both responses",
            "annotated_at": "2026-01-01T08:00:00Z",
        })];
        let options = ContributeOptions {
            dataset_created_at: Some("2026-01-01T00:00:00Z".to_string()),
            ..ContributeOptions::default()
        };
        let result = calculate_contributions(&responses, &Schema::default(), &options);

        assert_eq!(result.passed_responses, 1);
        let record = &result.contributions[0];
        assert_eq!(record.contribution_type, ContributionType::PeerReview);
        // base 3.0 * quality 1.1 * time 1.5 * scarcity 1.3 = 6.435 -> 6.44
        assert_eq!(record.weight, 6.44);
        assert_eq!(record.weight_breakdown.base, 3.0);
        assert_eq!(record.weight_breakdown.scarcity_multiplier, 1.3);
        assert_eq!(record.task_id, "T1");
    }

    #[test]
    fn failed_responses_earn_nothing() {
        // No score/ranking/choice: fails the annotation_complete gate.
        let responses = vec![
            json!({"task_id": "T1", "comment": "only commentary"}),
            json!({"task_id": "T2", "score": 4}),
        ];
        let result =
            calculate_contributions(&responses, &Schema::default(), &ContributeOptions::default());

        assert_eq!(result.total_responses, 2);
        assert_eq!(result.failed_responses, 1);
        assert_eq!(result.passed_responses, 1);
        assert_eq!(result.contributions.len(), 1);
        assert_eq!(result.contributions[0].task_id, "T2");
    }

    #[test]
    fn custom_weight_table_overrides_base() {
        let responses = vec![json!({"task_id": "T1", "score": 4})];
        let options = ContributeOptions {
            base_weights: Some(BTreeMap::from([("review".to_string(), 10.0)])),
            ..ContributeOptions::default()
        };
        let result = calculate_contributions(&responses, &Schema::default(), &options);
        assert_eq!(result.contributions[0].weight_breakdown.base, 10.0);
    }

    #[test]
    fn json_summary_shape() {
        let responses = vec![json!({"task_id": "T1", "score": 4})];
        let result =
            calculate_contributions(&responses, &Schema::default(), &ContributeOptions::default());
        let report = result.to_json();
        assert_eq!(report["summary"]["total_contributions"], 1);
        assert!(report["contributions"][0]["weightBreakdown"]["base"].is_number());
        assert_eq!(report["contributions"][0]["type"], "review");
    }
}
