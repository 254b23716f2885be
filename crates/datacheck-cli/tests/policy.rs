//! Exit policy over realistic results.

use datacheck_cli::exit::{batch_exit_code, check_exit_code};
use datacheck_model::{BatchCheckResult, CheckResult};

#[test]
fn default_threshold_passes_a_half_good_dataset() {
    let result = CheckResult {
        total_samples: 10,
        passed_samples: 5,
        failed_samples: 5,
        pass_rate: 0.5,
        error_count: 5,
        ..CheckResult::default()
    };
    // At exactly the threshold the check still passes; strict mode does not.
    assert_eq!(check_exit_code(&result, 0.5, false), 0);
    assert_eq!(check_exit_code(&result, 0.5, true), 1);
    assert_eq!(check_exit_code(&result, 0.6, false), 1);
}

#[test]
fn batch_policy_uses_aggregate_counts() {
    let result = BatchCheckResult {
        total_files: 2,
        total_samples: 20,
        total_passed_samples: 19,
        total_failed_samples: 1,
        overall_pass_rate: 0.95,
        total_warning_count: 3,
        ..BatchCheckResult::default()
    };
    assert_eq!(batch_exit_code(&result, 0.5, false), 0);
    assert_eq!(batch_exit_code(&result, 0.5, true), 1);

    let failed = BatchCheckResult {
        success: false,
        error: "not a directory".to_string(),
        ..BatchCheckResult::default()
    };
    assert_eq!(batch_exit_code(&failed, 0.0, false), 1);
}
