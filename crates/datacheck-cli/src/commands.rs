//! Command implementations.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use datacheck_contribute::{ContributeOptions, calculate_contributions_file};
use datacheck_core::{
    CheckFileOptions, DataFixer, FixOptions, QualityChecker, compute_distribution,
};
use datacheck_ingest::{load_records, load_rule_config};
use datacheck_report::{
    BatchQualityReport, DistributionEntry, QualityReport, ReportFormat, comparison_markdown,
};
use datacheck_rules::{RuleSet, annotation_ruleset, preference_ruleset, sft_ruleset};

use crate::cli::{
    CheckArgs, CompareArgs, ContributeArgs, FixArgs, InferSchemaArgs, ReportFormatArg,
    RulesetArg, ValidateArgs,
};
use crate::summary::{print_batch_summary, print_check_summary, print_rules};
use datacheck_cli::exit::{batch_exit_code, check_exit_code};

/// Reports written into an analysis directory land here, next to the other
/// analysis outputs.
const ANALYSIS_REPORT_DIR: &str = "12_质检报告";

pub fn run_check(args: &CheckArgs) -> Result<i32> {
    let ruleset = build_ruleset(args)?;
    let checker = QualityChecker::new(ruleset);
    let options = CheckFileOptions {
        schema_path: args.schema.clone(),
        report_path: None,
        sample_count: args.sample_count,
        sample_rate: args.sample_rate,
    };

    if args.data_path.is_dir() {
        let progress = progress_bar(args.no_progress, "{spinner} [{pos}/{len}] {msg}");
        let mut on_file_start = |name: &str, index: usize, total: usize| {
            progress.set_length(total as u64);
            progress.set_position(index as u64);
            progress.set_message(name.to_string());
        };
        let result =
            checker.check_directory(&args.data_path, &options, Some(&mut on_file_start))?;
        progress.finish_and_clear();

        if !result.success {
            eprintln!("error: {}", result.error);
            return Ok(1);
        }
        if let Some(output) = &args.output {
            BatchQualityReport::new(&result).save(output, report_format(args.format))?;
            info!(path = %output.display(), "report saved");
        }
        print_batch_summary(&result);
        return Ok(batch_exit_code(&result, args.min_pass_rate, args.strict));
    }

    let progress = progress_bar(args.no_progress, "{bar:40.cyan/blue} {pos}/{len}");
    let mut on_progress = |completed: usize, total: usize| {
        progress.set_length(total as u64);
        progress.set_position(completed as u64);
    };
    let result = checker.check_file(&args.data_path, &options, Some(&mut on_progress))?;
    progress.finish_and_clear();

    if !result.success {
        eprintln!("error: {}", result.error);
        return Ok(1);
    }
    if let Some(output) = &args.output {
        QualityReport::new(&result).save(output, report_format(args.format))?;
        info!(path = %output.display(), "report saved");
    }
    print_check_summary(&result);
    Ok(check_exit_code(&result, args.min_pass_rate, args.strict))
}

pub fn run_validate(args: &ValidateArgs) -> Result<i32> {
    let checker = QualityChecker::default();
    let result = checker.check_from_analysis_dir(&args.analysis_dir, args.data.as_deref())?;

    if !result.success {
        eprintln!("error: {}", result.error);
        return Ok(1);
    }

    let format = report_format(args.format);
    let output = match &args.output {
        Some(output) => output.clone(),
        None => {
            let extension = match format {
                ReportFormat::Markdown => "md",
                ReportFormat::Json => "json",
            };
            args.analysis_dir
                .join(ANALYSIS_REPORT_DIR)
                .join(format!("quality_report.{extension}"))
        }
    };
    QualityReport::new(&result)
        .with_title("Data validation report")
        .save(&output, format)?;
    println!("Report saved: {}", output.display());

    print_check_summary(&result);
    Ok(0)
}

pub fn run_compare(args: &CompareArgs) -> Result<i32> {
    if args.files.len() < 2 {
        bail!("at least two files are required");
    }

    let mut entries = Vec::new();
    for file in &args.files {
        let (records, _) = load_records(file)?;
        entries.push(DistributionEntry {
            file: file_name(file),
            sample_count: records.len(),
            distribution: compute_distribution(&records),
        });
    }

    let report = comparison_markdown(&entries);
    match &args.output {
        Some(output) => {
            if let Some(parent) = output.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create {}", parent.display()))?;
            }
            std::fs::write(output, &report)
                .with_context(|| format!("write {}", output.display()))?;
            println!("Comparison report saved: {}", output.display());
        }
        None => println!("{report}"),
    }
    Ok(0)
}

pub fn run_rules() -> Result<i32> {
    print_rules(&RuleSet::default());
    println!();
    println!("Preset rulesets:");
    println!("  - default: general rules");
    println!("  - sft: instruction/response data");
    println!("  - preference: preference pairs");
    println!("  - annotation: annotation review exports");
    Ok(0)
}

pub fn run_infer_schema(args: &InferSchemaArgs) -> Result<i32> {
    let checker = QualityChecker::default();
    let schema = checker.infer_schema_file(&args.data_path, args.output.as_deref())?;

    match &args.output {
        Some(output) => println!("Schema saved: {}", output.display()),
        None => println!("{}", serde_json::to_string_pretty(&schema)?),
    }
    println!(
        "Inferred {} field(s) from {} record(s)",
        schema.fields.len(),
        schema.sample_count
    );
    Ok(0)
}

pub fn run_fix(args: &FixArgs) -> Result<i32> {
    let options = FixOptions {
        dedup: !args.no_dedup,
        trim: !args.no_trim,
        remove_empty: !args.no_remove_empty,
        strip_pii: args.strip_pii,
    };
    let result = DataFixer::new().fix_file(&args.data_path, &args.output, &options)?;

    println!("Input records: {}", result.total_input);
    println!("Output records: {}", result.total_output);
    println!("Duplicates removed: {}", result.duplicates_removed);
    println!("Fields trimmed: {}", result.trimmed_count);
    println!("Empty records removed: {}", result.empty_removed);
    if args.strip_pii {
        println!("PII fields redacted: {}", result.pii_redacted_count);
    }
    println!("Fixed data saved: {}", args.output.display());
    Ok(0)
}

pub fn run_contribute(args: &ContributeArgs) -> Result<i32> {
    let base_weights = match &args.weights {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("read {}", path.display()))?;
            let weights: BTreeMap<String, f64> = serde_json::from_str(&content)
                .with_context(|| format!("parse {}", path.display()))?;
            Some(weights)
        }
        None => None,
    };

    let options = ContributeOptions {
        base_weights,
        dataset_created_at: args.dataset_created_at.clone(),
        annotator_id: Some(args.annotator_id.clone()),
    };
    let result =
        calculate_contributions_file(&args.responses_path, args.schema.as_deref(), &options)?;

    println!("Responses: {}", result.total_responses);
    println!(
        "Passed: {} / Failed: {}",
        result.passed_responses, result.failed_responses
    );
    println!("Contributions: {}", result.contributions.len());
    println!("Total weight: {:.2}", result.total_weight);

    let report = serde_json::to_string_pretty(&result.to_json())?;
    match &args.output {
        Some(output) => {
            if let Some(parent) = output.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create {}", parent.display()))?;
            }
            std::fs::write(output, format!("{report}\n"))
                .with_context(|| format!("write {}", output.display()))?;
            println!("Contribution report saved: {}", output.display());
        }
        None => println!("{report}"),
    }
    Ok(0)
}

fn build_ruleset(args: &CheckArgs) -> Result<RuleSet> {
    if let Some(config_path) = &args.rules_config {
        let config = load_rule_config(config_path)?;
        return Ok(RuleSet::from_config(&config)?);
    }
    Ok(match args.ruleset {
        RulesetArg::Default => RuleSet::default(),
        RulesetArg::Sft => sft_ruleset(),
        RulesetArg::Preference => preference_ruleset(),
        RulesetArg::Annotation => annotation_ruleset(),
    })
}

fn report_format(arg: ReportFormatArg) -> ReportFormat {
    match arg {
        ReportFormatArg::Markdown => ReportFormat::Markdown,
        ReportFormatArg::Json => ReportFormat::Json,
    }
}

fn progress_bar(disabled: bool, template: &str) -> ProgressBar {
    if disabled {
        return ProgressBar::hidden();
    }
    let style = ProgressStyle::with_template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    ProgressBar::new(0).with_style(style)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
