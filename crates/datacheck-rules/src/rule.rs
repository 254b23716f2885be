//! The rule type and its evaluation boundary.

use std::fmt;
use std::sync::Arc;

use anyhow::{Result, bail};
use serde_json::Value;

use datacheck_model::{Fields, Schema, Severity};

/// A rule's check function: `Ok(true)` passes, `Ok(false)` fails, and `Err`
/// is converted into a failure at the [`Rule::check`] boundary. Custom and
/// externally delegated checks (including LLM-graded ones) plug in here.
pub type CheckFn = Arc<dyn Fn(&Fields, &Schema) -> Result<bool> + Send + Sync>;

/// A single named, severity-tagged quality check.
#[derive(Clone)]
pub struct Rule {
    pub id: String,
    pub name: String,
    pub description: String,
    pub severity: Severity,
    pub enabled: bool,
    check: Option<CheckFn>,
}

impl Rule {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        severity: Severity,
        check: CheckFn,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            severity,
            enabled: true,
            check: Some(check),
        }
    }

    /// A rule without a check function; it always passes. Used for checks
    /// handled at population level rather than per record.
    pub fn placeholder(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            severity,
            enabled: true,
            check: None,
        }
    }

    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Evaluate this rule against one record's effective fields.
    ///
    /// Disabled rules and rules without a check function always pass. A check
    /// function error becomes a failing result; it never reaches the caller.
    pub fn check(&self, fields: &Fields, schema: &Schema) -> RuleResult {
        let Some(check) = self.check.as_ref().filter(|_| self.enabled) else {
            return RuleResult {
                rule_id: self.id.clone(),
                rule_name: self.name.clone(),
                passed: true,
                severity: self.severity,
                message: String::new(),
            };
        };

        let (passed, message) = match check(fields, schema) {
            Ok(true) => (true, String::new()),
            Ok(false) => (false, format!("rule violated: {}", self.name)),
            Err(error) => (false, format!("rule check failed: {error}")),
        };

        RuleResult {
            rule_id: self.id.clone(),
            rule_name: self.name.clone(),
            passed,
            severity: self.severity,
            message,
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("severity", &self.severity)
            .field("enabled", &self.enabled)
            .field("has_check", &self.check.is_some())
            .finish()
    }
}

/// Outcome of evaluating one rule against one record.
#[derive(Debug, Clone)]
pub struct RuleResult {
    pub rule_id: String,
    pub rule_name: String,
    pub passed: bool,
    pub severity: Severity,
    pub message: String,
}

/// Length of a value in the sense length-based checks use: characters for
/// strings, element count for arrays and objects. Other values have no
/// length, which surfaces as a check failure.
pub(crate) fn value_length(value: &Value) -> Result<usize> {
    match value {
        Value::String(text) => Ok(text.chars().count()),
        Value::Array(items) => Ok(items.len()),
        Value::Object(map) => Ok(map.len()),
        other => bail!("value has no length: {other}"),
    }
}
