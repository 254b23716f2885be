//! Scoring annotation export files.

use serde_json::json;
use tempfile::TempDir;

use datacheck_contribute::{ContributeOptions, calculate_contributions_file};

#[test]
fn export_file_with_responses_wrapper_is_scored() {
    let dir = TempDir::new().expect("tempdir");
    let export = json!({
        "responses": [
            {"task_id": "T1", "score": 5, "annotated_at": "2026-01-02T00:00:00Z"},
            {"task_id": "T2", "ranking": [2, 1], "comment": "second answer is more complete"},
            {"task_id": "T3", "comment": "no outcome recorded"},
        ],
    });
    let responses_path = dir.path().join("export.json");
    std::fs::write(&responses_path, export.to_string()).expect("write export");

    let result = calculate_contributions_file(
        &responses_path,
        None,
        &ContributeOptions {
            annotator_id: Some("ann-1".to_string()),
            ..ContributeOptions::default()
        },
    )
    .expect("score");

    assert_eq!(result.total_responses, 3);
    assert_eq!(result.passed_responses, 2);
    assert_eq!(result.failed_responses, 1);
    assert_eq!(result.contributions.len(), 2);
    assert!(result.contributions.iter().all(|c| c.annotator_id == "ann-1"));
    assert!(result.total_weight > 0.0);

    // Population of three earns the scarcity bonus.
    assert_eq!(
        result.contributions[0].weight_breakdown.scarcity_multiplier,
        1.3
    );
}

#[test]
fn bare_array_export_is_accepted() {
    let dir = TempDir::new().expect("tempdir");
    let responses_path = dir.path().join("export.json");
    std::fs::write(&responses_path, r#"[{"task_id": "T1", "choice": "A"}]"#).expect("write");

    let result =
        calculate_contributions_file(&responses_path, None, &ContributeOptions::default())
            .expect("score");
    assert_eq!(result.passed_responses, 1);
    assert!(result.contributions[0].description.contains("choice=\"A\""));
}
