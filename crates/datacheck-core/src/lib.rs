//! The quality checking core.
//!
//! [`QualityChecker`] runs a [`datacheck_rules::RuleSet`] over a record
//! population, aggregates severity-bucketed results, detects exact and
//! near-duplicate records, computes per-field distributions, and scans for
//! statistical anomalies. File-level entry points build on
//! `datacheck-ingest`; the in-memory `check` never performs I/O.

mod checker;
mod dedupe;
mod distribution;
mod files;
mod fixer;
mod infer;

pub use checker::QualityChecker;
pub use dedupe::{
    NEAR_DUPLICATE_LIMIT, NEAR_DUPLICATE_THRESHOLD, content_hash, find_duplicates,
    find_near_duplicates,
};
pub use distribution::{compare_distributions, compute_distribution};
pub use files::CheckFileOptions;
pub use fixer::{DataFixer, FixOptions, FixResult};
pub use infer::infer_schema;
