//! Rule engine for record-level quality checks.
//!
//! A [`Rule`] wraps a check function evaluated against one record's effective
//! fields plus the population schema; a [`RuleSet`] is a named bundle of
//! rules. Rule evaluation never propagates an error to the caller: a check
//! function that fails produces a failing [`RuleResult`] carrying the error
//! text.

mod builtin;
mod config;
mod presets;
mod rule;
mod set;

pub use config::{RuleConfig, RuleConfigError, RuleDefinition};
pub use presets::{annotation_ruleset, llm_ruleset, preference_ruleset, sft_ruleset};
pub use rule::{CheckFn, Rule, RuleResult};
pub use set::RuleSet;
