//! Batch (directory) quality report.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::{Value, json};

use datacheck_model::BatchCheckResult;

use crate::report::{ReportFormat, quality_grade};

/// Renders one [`BatchCheckResult`].
#[derive(Debug, Clone)]
pub struct BatchQualityReport<'a> {
    pub result: &'a BatchCheckResult,
    pub title: String,
}

impl<'a> BatchQualityReport<'a> {
    pub fn new(result: &'a BatchCheckResult) -> Self {
        Self {
            result,
            title: "Batch data quality report".to_string(),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn to_markdown(&self) -> String {
        let r = self.result;
        let mut md = String::new();

        let _ = writeln!(md, "# {}\n", self.title);
        let _ = writeln!(md, "Generated: {}", Utc::now().format("%Y-%m-%d %H:%M:%S"));
        let _ = writeln!(md, "Directory: `{}`\n", r.directory);
        md.push_str("---\n\n## Totals\n\n");
        md.push_str("| Metric | Value |\n|--------|-------|\n");
        let _ = writeln!(md, "| Files checked | {} |", r.total_files);
        let _ = writeln!(md, "| Total samples | {} |", r.total_samples);
        let _ = writeln!(md, "| Passed | {} |", r.total_passed_samples);
        let _ = writeln!(md, "| Failed | {} |", r.total_failed_samples);
        let _ = writeln!(
            md,
            "| **Overall pass rate** | **{:.1}%** |\n",
            r.overall_pass_rate * 100.0
        );
        let _ = writeln!(
            md,
            "### Quality grade: {} ({:.0} points)\n",
            quality_grade(r.overall_pass_rate),
            r.overall_pass_rate * 100.0
        );

        if !r.file_results.is_empty() {
            md.push_str("---\n\n## Files\n\n");
            md.push_str("| File | Samples | Pass rate | Errors | Warnings | Status |\n");
            md.push_str("|------|---------|-----------|--------|----------|--------|\n");
            for (path, file_result) in &r.file_results {
                let status = if file_result.error_count == 0 { "✅" } else { "❌" };
                let _ = writeln!(
                    md,
                    "| {path} | {} | {:.1}% | {} | {} | {status} |",
                    file_result.total_samples,
                    file_result.pass_rate * 100.0,
                    file_result.error_count,
                    file_result.warning_count,
                );
            }
            md.push('\n');
        }

        if !r.skipped_files.is_empty() {
            md.push_str("---\n\n## Skipped files\n\n");
            for skipped in &r.skipped_files {
                let _ = writeln!(md, "- {skipped}");
            }
            md.push('\n');
        }

        md.push_str("\n---\n\n> Generated by datacheck\n");
        md
    }

    pub fn to_json(&self) -> Value {
        let r = self.result;
        let mut files = serde_json::Map::new();
        for (path, file_result) in &r.file_results {
            files.insert(
                path.clone(),
                json!({
                    "summary": {
                        "total_samples": file_result.total_samples,
                        "passed_samples": file_result.passed_samples,
                        "failed_samples": file_result.failed_samples,
                        "pass_rate": file_result.pass_rate,
                        "error_count": file_result.error_count,
                        "warning_count": file_result.warning_count,
                    },
                    "rule_results": file_result.rule_results,
                    "duplicates": file_result.duplicates,
                }),
            );
        }

        json!({
            "title": self.title,
            "generated_at": Utc::now().to_rfc3339(),
            "aggregate": {
                "total_files": r.total_files,
                "passed_files": r.passed_files,
                "failed_files": r.failed_files,
                "total_samples": r.total_samples,
                "total_passed_samples": r.total_passed_samples,
                "total_failed_samples": r.total_failed_samples,
                "overall_pass_rate": r.overall_pass_rate,
                "total_error_count": r.total_error_count,
                "total_warning_count": r.total_warning_count,
            },
            "files": files,
            "skipped_files": r.skipped_files,
        })
    }

    pub fn save(&self, output_path: &Path, format: ReportFormat) -> Result<()> {
        let content = match format {
            ReportFormat::Markdown => self.to_markdown(),
            ReportFormat::Json => format!("{}\n", serde_json::to_string_pretty(&self.to_json())?),
        };
        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        std::fs::write(output_path, content)
            .with_context(|| format!("write {}", output_path.display()))?;
        Ok(())
    }
}
