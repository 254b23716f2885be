//! File and directory entry points built on the ingest loaders.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};

use datacheck_ingest::{discover_data_files, load_records, load_schema, sample_records, sample_size};
use datacheck_model::{BatchCheckResult, CheckResult, InferredSchema};

use crate::checker::QualityChecker;
use crate::infer::infer_schema;

/// Options for [`QualityChecker::check_file`] and
/// [`QualityChecker::check_directory`].
#[derive(Debug, Clone, Default)]
pub struct CheckFileOptions {
    /// Schema file overriding any schema embedded in the data file.
    pub schema_path: Option<PathBuf>,
    /// Write a JSON report of the result to this path.
    pub report_path: Option<PathBuf>,
    /// Randomly check only this many records.
    pub sample_count: Option<usize>,
    /// Randomly check only this fraction of records (0, 1).
    pub sample_rate: Option<f64>,
}

/// Fixed layout of an external analysis directory: schema and data files as
/// the analysis tool writes them.
const ANALYSIS_SCHEMA_PATH: &str = "04_复刻指南/DATA_SCHEMA.json";
const ANALYSIS_SYNTHETIC_PATH: &str = "11_合成数据/synthetic.json";
const ANALYSIS_SAMPLES_PATH: &str = "09_样例数据/samples.json";

impl QualityChecker {
    /// Check a data file, with optional schema override, subsampling and
    /// report dump.
    pub fn check_file(
        &self,
        data_path: &Path,
        options: &CheckFileOptions,
        on_progress: Option<&mut dyn FnMut(usize, usize)>,
    ) -> Result<CheckResult> {
        let (mut records, embedded_schema) = load_records(data_path)?;

        let schema = match &options.schema_path {
            Some(schema_path) => load_schema(schema_path)?,
            None => embedded_schema.unwrap_or_default(),
        };

        let original_count = records.len();
        let sampled_to = sample_size(original_count, options.sample_count, options.sample_rate);
        if let Some(k) = sampled_to {
            records = sample_records(records, k);
        }

        let mut result = self.check(&records, &schema, None, on_progress);

        if sampled_to.is_some() {
            result.sampled = true;
            result.sampled_count = records.len();
            result.original_count = original_count;
        }

        if let Some(report_path) = &options.report_path {
            save_report(&result, report_path)?;
        }

        Ok(result)
    }

    /// Check every supported data file under a directory.
    ///
    /// Files that fail to load are recorded as skipped and never abort the
    /// batch. A missing directory yields a failed result, not an error.
    pub fn check_directory(
        &self,
        dir_path: &Path,
        options: &CheckFileOptions,
        mut on_file_start: Option<&mut dyn FnMut(&str, usize, usize)>,
    ) -> Result<BatchCheckResult> {
        let mut result = BatchCheckResult {
            directory: dir_path.display().to_string(),
            ..BatchCheckResult::default()
        };

        let files = match discover_data_files(dir_path) {
            Ok(files) => files,
            Err(error) => {
                result.success = false;
                result.error = error.to_string();
                return Ok(result);
            }
        };

        result.total_files = files.len();
        if files.is_empty() {
            result.overall_pass_rate = 1.0;
            return Ok(result);
        }

        // Per-file report dumps would overwrite each other; the batch report
        // is the caller's concern.
        let file_options = CheckFileOptions {
            report_path: None,
            ..options.clone()
        };

        for (index, file_path) in files.iter().enumerate() {
            let relative = file_path
                .strip_prefix(dir_path)
                .unwrap_or(file_path)
                .display()
                .to_string();

            if let Some(callback) = on_file_start.as_deref_mut() {
                callback(&relative, index + 1, files.len());
            }

            match self.check_file(file_path, &file_options, None) {
                Ok(file_result) => {
                    result.total_samples += file_result.total_samples;
                    result.total_passed_samples += file_result.passed_samples;
                    result.total_failed_samples += file_result.failed_samples;
                    result.total_error_count += file_result.error_count;
                    result.total_warning_count += file_result.warning_count;
                    result.total_info_count += file_result.info_count;
                    result.file_results.insert(relative, file_result);
                }
                Err(error) => {
                    warn!(file = %relative, %error, "skipping file");
                    result.skipped_files.push(format!("{relative}: {error}"));
                }
            }
        }

        result.overall_pass_rate = if result.total_samples > 0 {
            result.total_passed_samples as f64 / result.total_samples as f64
        } else {
            1.0
        };
        result.passed_files = result
            .file_results
            .values()
            .filter(|r| r.error_count == 0)
            .count();
        result.failed_files =
            result.total_files - result.passed_files - result.skipped_files.len();

        info!(
            files = result.total_files,
            skipped = result.skipped_files.len(),
            pass_rate = result.overall_pass_rate,
            "directory check finished"
        );

        Ok(result)
    }

    /// Check data against the schema produced by an external analysis run.
    ///
    /// The analysis directory layout is fixed by the producing tool: the
    /// schema, an optional synthetic data file, and reference samples. When
    /// no data path is given, synthetic data is preferred over the samples;
    /// the samples serve as the comparison reference when they are not the
    /// data under check.
    pub fn check_from_analysis_dir(
        &self,
        analysis_dir: &Path,
        data_path: Option<&Path>,
    ) -> Result<CheckResult> {
        let schema_path = analysis_dir.join(ANALYSIS_SCHEMA_PATH);
        if !schema_path.exists() {
            return Ok(CheckResult::failed(format!(
                "schema not found: {}",
                schema_path.display()
            )));
        }
        let schema = load_schema(&schema_path)?;

        let samples_path = analysis_dir.join(ANALYSIS_SAMPLES_PATH);
        let data_path = match data_path {
            Some(path) => path.to_path_buf(),
            None => {
                let synthetic_path = analysis_dir.join(ANALYSIS_SYNTHETIC_PATH);
                if synthetic_path.exists() {
                    synthetic_path
                } else if samples_path.exists() {
                    samples_path.clone()
                } else {
                    return Ok(CheckResult::failed("no data file found"));
                }
            }
        };

        let (records, _) = load_records(&data_path)?;

        let reference = if samples_path.exists() && samples_path != data_path {
            let (reference_records, _) = load_records(&samples_path)?;
            Some(reference_records)
        } else {
            None
        };

        Ok(self.check(&records, &schema, reference.as_deref(), None))
    }

    /// Infer a schema from a data file, optionally writing it as JSON.
    pub fn infer_schema_file(
        &self,
        data_path: &Path,
        output_path: Option<&Path>,
    ) -> Result<InferredSchema> {
        let (records, _) = load_records(data_path)?;
        let schema = infer_schema(&records);

        if let Some(output_path) = output_path {
            if let Some(parent) = output_path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create {}", parent.display()))?;
            }
            let json = serde_json::to_string_pretty(&schema)?;
            std::fs::write(output_path, format!("{json}\n"))
                .with_context(|| format!("write {}", output_path.display()))?;
        }

        Ok(schema)
    }
}

/// Dump a check result as a JSON report.
fn save_report(result: &CheckResult, output_path: &Path) -> Result<()> {
    let report = json!({
        "generated_at": Utc::now().to_rfc3339(),
        "summary": {
            "total_samples": result.total_samples,
            "passed_samples": result.passed_samples,
            "failed_samples": result.failed_samples,
            "pass_rate": format!("{:.1}%", result.pass_rate * 100.0),
            "error_count": result.error_count,
            "warning_count": result.warning_count,
            "info_count": result.info_count,
        },
        "rule_results": result.rule_results,
        "duplicates": result.duplicates,
        "distribution": result.distribution,
        "failed_sample_ids": result.failed_sample_ids.iter().take(50).collect::<Vec<_>>(),
    });

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(output_path, format!("{json}\n"))
        .with_context(|| format!("write {}", output_path.display()))?;
    Ok(())
}
