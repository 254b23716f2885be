//! Single-population quality report.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::{Value, json};

use datacheck_model::CheckResult;

/// Output format of a saved report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Markdown,
    Json,
}

/// Grade label for a pass rate, on a 100-point scale.
pub fn quality_grade(pass_rate: f64) -> &'static str {
    let score = pass_rate * 100.0;
    if score >= 90.0 {
        "🟢 Excellent"
    } else if score >= 70.0 {
        "🟡 Good"
    } else if score >= 50.0 {
        "🟠 Fair"
    } else {
        "🔴 Needs improvement"
    }
}

/// Renders one [`CheckResult`] for humans and machines.
#[derive(Debug, Clone)]
pub struct QualityReport<'a> {
    pub result: &'a CheckResult,
    pub title: String,
}

impl<'a> QualityReport<'a> {
    pub fn new(result: &'a CheckResult) -> Self {
        Self {
            result,
            title: "Data quality report".to_string(),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Render the full Markdown report.
    pub fn to_markdown(&self) -> String {
        let r = self.result;
        let mut md = String::new();

        let _ = writeln!(md, "# {}\n", self.title);
        let _ = writeln!(md, "Generated: {}\n", Utc::now().format("%Y-%m-%d %H:%M:%S"));
        md.push_str("---\n\n## Summary\n\n");
        md.push_str("| Metric | Value |\n|--------|-------|\n");
        let _ = writeln!(md, "| Total samples | {} |", r.total_samples);
        let _ = writeln!(md, "| Passed | {} |", r.passed_samples);
        let _ = writeln!(md, "| Failed | {} |", r.failed_samples);
        let _ = writeln!(md, "| **Pass rate** | **{:.1}%** |\n", r.pass_rate * 100.0);

        if r.sampled {
            let _ = writeln!(
                md,
                "> **Note**: this report is based on a random sample ({}/{} records)\n",
                r.sampled_count, r.original_count
            );
        }

        let _ = writeln!(
            md,
            "### Quality grade: {} ({:.0} points)\n",
            quality_grade(r.pass_rate),
            r.pass_rate * 100.0
        );

        if r.error_count > 0 || r.warning_count > 0 {
            md.push_str("### Issue counts\n\n| Level | Count |\n|-------|-------|\n");
            let _ = writeln!(md, "| 🔴 Errors | {} |", r.error_count);
            let _ = writeln!(md, "| 🟡 Warnings | {} |", r.warning_count);
            let _ = writeln!(md, "| 🔵 Info | {} |\n", r.info_count);
        }

        if !r.rule_results.is_empty() {
            md.push_str("---\n\n## Rule results\n\n");
            for summary in r.rule_results.values() {
                let icon = match summary.severity.as_str() {
                    "error" => "🔴",
                    "warning" => "🟡",
                    _ => "🔵",
                };
                let status = if summary.failed == 0 { "✅" } else { "❌" };
                let _ = writeln!(md, "### {icon} {} {status}\n", summary.name);
                let _ = writeln!(md, "- Passed: {}", summary.passed);
                let _ = writeln!(md, "- Failed: {}", summary.failed);
                if !summary.failed_samples.is_empty() {
                    let shown: Vec<&str> = summary
                        .failed_samples
                        .iter()
                        .take(5)
                        .map(String::as_str)
                        .collect();
                    let _ = writeln!(md, "- Failing samples: {}", shown.join(", "));
                    if summary.failed_samples.len() > 5 {
                        let _ = writeln!(md, "  ({} more...)", summary.failed_samples.len() - 5);
                    }
                }
                md.push('\n');
            }
        }

        self.write_group_section(&mut md, "Duplicates", &r.duplicates);
        self.write_group_section(&mut md, "Near-duplicates", &r.near_duplicates);

        if !r.distribution.fields.is_empty() {
            md.push_str("---\n\n## Field distribution\n\n");
            for (field_name, stats) in &r.distribution.fields {
                let _ = writeln!(md, "### {field_name}\n");
                if let Some(lengths) = stats.length_stats {
                    let _ = writeln!(
                        md,
                        "- Length: min {}, max {}, avg {:.0}",
                        lengths.min, lengths.max, lengths.avg
                    );
                }
                if let Some(ratio) = stats.unique_ratio {
                    let _ = writeln!(md, "- Unique ratio: {:.1}%", ratio * 100.0);
                }
                if let Some(values) = &stats.value_distribution {
                    md.push_str("- Value counts:\n");
                    for entry in values.iter().take(5) {
                        let _ = writeln!(md, "  - {}: {}", entry.value, entry.count);
                    }
                }
                md.push('\n');
            }
        }

        if let Some(comparison) = &r.distribution.reference_comparison {
            md.push_str("---\n\n## Reference comparison\n\n");
            let _ = writeln!(
                md,
                "Samples: {} vs reference: {}\n",
                comparison.sample_count, comparison.reference_count
            );
            for (field_name, field) in &comparison.field_comparisons {
                if let Some(lengths) = field.length_comparison {
                    let _ = writeln!(
                        md,
                        "- **{field_name}** average length: {:.0} vs {:.0} ({:.1}% difference)",
                        lengths.sample_avg, lengths.reference_avg, lengths.diff_percent
                    );
                }
            }
            md.push('\n');
        }

        if !r.failed_sample_ids.is_empty() {
            md.push_str("---\n\n## Failed samples\n\n");
            let _ = writeln!(md, "{} samples failed the check:\n", r.failed_sample_ids.len());
            for id in r.failed_sample_ids.iter().take(20) {
                let _ = writeln!(md, "- {id}");
            }
            if r.failed_sample_ids.len() > 20 {
                let _ = writeln!(md, "\n({} more...)", r.failed_sample_ids.len() - 20);
            }
        }

        md.push_str("\n---\n\n> Generated by datacheck\n");
        md
    }

    fn write_group_section(&self, md: &mut String, heading: &str, groups: &[Vec<String>]) {
        if groups.is_empty() {
            return;
        }
        let _ = writeln!(md, "---\n\n## {heading}\n");
        let _ = writeln!(md, "Found **{}** group(s):\n", groups.len());
        for (number, group) in groups.iter().take(10).enumerate() {
            let _ = writeln!(md, "{}. {}", number + 1, group.join(", "));
        }
        if groups.len() > 10 {
            let _ = writeln!(md, "\n({} more groups...)", groups.len() - 10);
        }
        md.push('\n');
    }

    /// Render the JSON report.
    pub fn to_json(&self) -> Value {
        let r = self.result;
        let mut summary = json!({
            "total_samples": r.total_samples,
            "passed_samples": r.passed_samples,
            "failed_samples": r.failed_samples,
            "pass_rate": r.pass_rate,
            "error_count": r.error_count,
            "warning_count": r.warning_count,
            "info_count": r.info_count,
        });
        if r.sampled {
            summary["sampling"] = json!({
                "enabled": true,
                "sampled_count": r.sampled_count,
                "original_count": r.original_count,
            });
        }

        json!({
            "title": self.title,
            "generated_at": Utc::now().to_rfc3339(),
            "summary": summary,
            "rule_results": r.rule_results,
            "duplicates": r.duplicates,
            "near_duplicates": r.near_duplicates,
            "distribution": r.distribution,
            "anomalies": r.anomalies,
            "failed_sample_ids": r.failed_sample_ids,
        })
    }

    /// Save the report in the given format, creating parent directories.
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
