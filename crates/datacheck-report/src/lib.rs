//! Report rendering over check results.
//!
//! Renders [`datacheck_model::CheckResult`] and
//! [`datacheck_model::BatchCheckResult`] values as Markdown or JSON; the
//! result objects themselves are serialized verbatim where the JSON shape
//! allows it.

mod batch;
mod compare;
mod report;

pub use batch::BatchQualityReport;
pub use compare::{DistributionEntry, comparison_markdown};
pub use report::{QualityReport, ReportFormat, quality_grade};
