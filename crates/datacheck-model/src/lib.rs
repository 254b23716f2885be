pub mod anomaly;
pub mod distribution;
pub mod record;
pub mod result;
pub mod schema;
pub mod severity;

pub use anomaly::{AnomalyDetail, Bounds, FieldKind, OutlierMethod, Stats};
pub use distribution::{
    Distribution, DistributionComparison, DiversityComparison, FieldComparison, FieldDistribution,
    LengthComparison, LengthStats, ValueCount, ValueStats,
};
pub use record::{Fields, effective_fields, effective_value, record_id};
pub use result::{BatchCheckResult, CheckResult, MAX_FAILED_IDS_PER_RULE, RuleSummary};
pub use schema::{Constraints, FieldDef, InferredField, InferredSchema, RubricEntry, Schema};
pub use severity::Severity;
