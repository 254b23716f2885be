//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "datacheck",
    version,
    about = "Dataset quality checker for ML training data",
    long_about = "Check structured datasets (JSON/JSONL/CSV) for quality issues.\n\n\
                  Runs rule-based validation, duplicate and near-duplicate detection,\n\
                  distribution analysis and statistical anomaly scans, and renders\n\
                  Markdown or JSON reports."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check a data file, or every data file under a directory.
    Check(CheckArgs),

    /// Validate data against an external analysis directory.
    Validate(ValidateArgs),

    /// Compare the field distributions of several data files.
    Compare(CompareArgs),

    /// List the available check rules.
    Rules,

    /// Infer a schema from a data file.
    InferSchema(InferSchemaArgs),

    /// Fix common data defects (duplicates, whitespace, empty records, PII).
    Fix(FixArgs),

    /// Compute contribution weights from an annotation export.
    Contribute(ContributeArgs),
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Data file (JSON/JSONL/CSV) or directory to check.
    #[arg(value_name = "DATA_PATH")]
    pub data_path: PathBuf,

    /// Schema JSON file.
    #[arg(short = 's', long = "schema", value_name = "PATH")]
    pub schema: Option<PathBuf>,

    /// Report output path.
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Report format.
    #[arg(short = 'f', long = "format", value_enum, default_value = "markdown")]
    pub format: ReportFormatArg,

    /// Built-in ruleset to apply.
    #[arg(long = "ruleset", value_enum, default_value = "default")]
    pub ruleset: RulesetArg,

    /// Declarative rules config (JSON) compiled on top of the built-ins.
    #[arg(long = "rules-config", value_name = "PATH", conflicts_with = "ruleset")]
    pub rules_config: Option<PathBuf>,

    /// Randomly check only N records.
    #[arg(long = "sample-count", value_name = "N")]
    pub sample_count: Option<usize>,

    /// Randomly check only this fraction of records (0 to 1).
    #[arg(long = "sample-rate", value_name = "RATE")]
    pub sample_rate: Option<f64>,

    /// Exit non-zero when the pass rate falls below this threshold.
    #[arg(long = "min-pass-rate", value_name = "RATE", default_value_t = 0.5)]
    pub min_pass_rate: f64,

    /// Exit non-zero on any error or warning.
    #[arg(long = "strict")]
    pub strict: bool,

    /// Disable the progress bar.
    #[arg(long = "no-progress")]
    pub no_progress: bool,
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Analysis output directory.
    #[arg(value_name = "ANALYSIS_DIR")]
    pub analysis_dir: PathBuf,

    /// Data file to check (defaults to the analysis synthetic data or samples).
    #[arg(short = 'd', long = "data", value_name = "PATH")]
    pub data: Option<PathBuf>,

    /// Report output path (defaults to a report inside the analysis directory).
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Report format.
    #[arg(short = 'f', long = "format", value_enum, default_value = "markdown")]
    pub format: ReportFormatArg,
}

#[derive(Parser)]
pub struct CompareArgs {
    /// Data files to compare (at least two).
    #[arg(value_name = "FILES", num_args = 2..)]
    pub files: Vec<PathBuf>,

    /// Comparison report output path.
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct InferSchemaArgs {
    /// Data file to infer from.
    #[arg(value_name = "DATA_PATH")]
    pub data_path: PathBuf,

    /// Where to write the inferred schema JSON.
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct FixArgs {
    /// Data file to fix.
    #[arg(value_name = "DATA_PATH")]
    pub data_path: PathBuf,

    /// Output path for the fixed records (JSONL).
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: PathBuf,

    /// Keep exact duplicates.
    #[arg(long = "no-dedup")]
    pub no_dedup: bool,

    /// Keep surrounding whitespace.
    #[arg(long = "no-trim")]
    pub no_trim: bool,

    /// Keep records whose fields are all empty.
    #[arg(long = "no-remove-empty")]
    pub no_remove_empty: bool,

    /// Redact PII patterns.
    #[arg(long = "strip-pii")]
    pub strip_pii: bool,
}

#[derive(Parser)]
pub struct ContributeArgs {
    /// Annotation export JSON file.
    #[arg(value_name = "RESPONSES_PATH")]
    pub responses_path: PathBuf,

    /// Schema JSON file (enables the rubric-match bonus).
    #[arg(short = 's', long = "schema", value_name = "PATH")]
    pub schema: Option<PathBuf>,

    /// Where to write the contribution report JSON (stdout when omitted).
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Dataset creation time (RFC 3339) anchoring the early-submission bonus.
    #[arg(long = "dataset-created-at", value_name = "TIMESTAMP")]
    pub dataset_created_at: Option<String>,

    /// Annotator credited on every record.
    #[arg(long = "annotator-id", value_name = "ID", default_value = "unknown")]
    pub annotator_id: String,

    /// JSON file mapping contribution types to custom base weights.
    #[arg(long = "weights", value_name = "PATH")]
    pub weights: Option<PathBuf>,
}

/// CLI report format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum ReportFormatArg {
    Markdown,
    Json,
}

/// Built-in ruleset choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum RulesetArg {
    Default,
    Sft,
    Preference,
    Annotation,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
