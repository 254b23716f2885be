//! Config-compiled rules.
//!
//! A declarative rule definition names a field, a check type and its
//! parameters; each definition compiles into one [`Rule`]. Unknown check
//! types and invalid patterns are construction-time errors, never deferred
//! to evaluation.

use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use datacheck_model::Severity;

use crate::rule::{CheckFn, Rule, value_length};
use crate::set::RuleSet;

/// A declarative ruleset configuration, typically parsed from a JSON file by
/// a loading collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    pub name: Option<String>,
    pub rules: Vec<RuleDefinition>,
}

/// One declarative rule: a field, a check type and its parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleDefinition {
    pub field: String,
    pub check: String,
    /// Length threshold for `min_length` / `max_length`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<usize>,
    /// Pattern for `regex`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Allowed values for `enum`.
    pub values: Vec<Value>,
    pub severity: Option<Severity>,
    pub enabled: Option<bool>,
    /// Optional human-readable name override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Errors compiling a declarative rule definition.
#[derive(Debug, Error)]
pub enum RuleConfigError {
    #[error("unknown check type: {0}")]
    UnknownCheckType(String),
    #[error("invalid pattern for field {field}: {source}")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },
}

impl RuleSet {
    /// Build a rule set from a declarative configuration. The built-in rules
    /// are loaded first; each definition then compiles into one additional
    /// rule with id `config_{field}_{check}_{index}`.
    pub fn from_config(config: &RuleConfig) -> Result<Self, RuleConfigError> {
        let mut ruleset = Self::new(config.name.clone().unwrap_or_else(|| "config".to_string()));

        for (index, definition) in config.rules.iter().enumerate() {
            let check = compile_check(definition)?;
            let rule_id = format!("config_{}_{}_{}", definition.field, definition.check, index);
            let name = definition
                .message
                .clone()
                .unwrap_or_else(|| format!("{} {} check", definition.field, definition.check));
            let mut rule = Rule::new(
                rule_id,
                name,
                format!("config rule: {} {}", definition.field, definition.check),
                definition.severity.unwrap_or(Severity::Warning),
                check,
            );
            rule.enabled = definition.enabled.unwrap_or(true);
            ruleset.add_rule(rule);
        }

        Ok(ruleset)
    }
}

fn compile_check(definition: &RuleDefinition) -> Result<CheckFn, RuleConfigError> {
    let field = definition.field.clone();

    match definition.check.as_str() {
        "required" => Ok(Arc::new(move |fields, _| Ok(fields.contains_key(&field)))),
        "non_empty" => Ok(Arc::new(move |fields, _| {
            Ok(match fields.get(&field) {
                None | Some(Value::Null) => false,
                Some(Value::String(text)) => !text.trim().is_empty(),
                Some(_) => true,
            })
        })),
        "min_length" => {
            let min = definition.value.unwrap_or(1);
            Ok(Arc::new(move |fields, _| {
                let length = match fields.get(&field) {
                    Some(value) => value_length(value)?,
                    None => 0,
                };
                Ok(length >= min)
            }))
        }
        "max_length" => {
            let max = definition.value.unwrap_or(100_000);
            Ok(Arc::new(move |fields, _| {
                let length = match fields.get(&field) {
                    Some(value) => value_length(value)?,
                    None => 0,
                };
                Ok(length <= max)
            }))
        }
        "regex" => {
            let pattern = definition.pattern.as_deref().unwrap_or(".*");
            let regex = Regex::new(pattern).map_err(|source| RuleConfigError::InvalidPattern {
                field: field.clone(),
                source,
            })?;
            Ok(Arc::new(move |fields, _| {
                Ok(match fields.get(&field) {
                    None => regex.is_match(""),
                    Some(Value::String(text)) => regex.is_match(text),
                    Some(other) => anyhow::bail!("regex check expects a string, got {other}"),
                })
            }))
        }
        "enum" => {
            let allowed = definition.values.clone();
            Ok(Arc::new(move |fields, _| {
                // A missing field counts as null, so `null` in the allowed
                // values tolerates absence.
                Ok(match fields.get(&field) {
                    Some(value) => allowed.contains(value),
                    None => allowed.contains(&Value::Null),
                })
            }))
        }
        other => Err(RuleConfigError::UnknownCheckType(other.to_string())),
    }
}
