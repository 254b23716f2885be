//! Exit policy.
//!
//! The core supplies the counts; whether they fail the process is decided
//! here: a pass rate under the caller's threshold exits non-zero, and strict
//! mode additionally treats any error or warning as fatal.

use datacheck_model::{BatchCheckResult, CheckResult};

/// Exit code for a single check result.
pub fn check_exit_code(result: &CheckResult, min_pass_rate: f64, strict: bool) -> i32 {
    if !result.success {
        return 1;
    }
    if result.pass_rate < min_pass_rate {
        return 1;
    }
    if strict && (result.error_count > 0 || result.warning_count > 0) {
        return 1;
    }
    0
}

/// Exit code for a batch result.
pub fn batch_exit_code(result: &BatchCheckResult, min_pass_rate: f64, strict: bool) -> i32 {
    if !result.success {
        return 1;
    }
    if result.overall_pass_rate < min_pass_rate {
        return 1;
    }
    if strict && (result.total_error_count > 0 || result.total_warning_count > 0) {
        return 1;
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_rate_threshold_gates_the_exit() {
        let result = CheckResult {
            pass_rate: 0.4,
            ..CheckResult::default()
        };
        assert_eq!(check_exit_code(&result, 0.5, false), 1);
        assert_eq!(check_exit_code(&result, 0.3, false), 0);
    }

    #[test]
    fn strict_mode_fails_on_warnings() {
        let result = CheckResult {
            pass_rate: 1.0,
            warning_count: 1,
            ..CheckResult::default()
        };
        assert_eq!(check_exit_code(&result, 0.5, false), 0);
        assert_eq!(check_exit_code(&result, 0.5, true), 1);
    }

    #[test]
    fn failed_results_always_exit_nonzero() {
        let result = CheckResult::failed("could not load");
        assert_eq!(check_exit_code(&result, 0.0, false), 1);
    }
}
