//! Contribution weights for annotation work.
//!
//! Annotation responses are quality-gated through the checker with the
//! annotation rule set; every passing response earns a weight of
//! `base * quality * time * scarcity`, where the base depends on the inferred
//! contribution type and the multipliers reward detail, early submission and
//! scarce populations.

mod scoring;

pub use scoring::{
    ContributeOptions, ContributeResult, ContributionRecord, ContributionType, WeightBreakdown,
    calculate_contributions, calculate_contributions_file, default_base_weights,
};
