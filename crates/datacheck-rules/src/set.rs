//! Rule sets.

use std::collections::BTreeMap;
use std::sync::Arc;

use datacheck_model::Severity;
use datacheck_text::{check_garbled_text, check_language_consistency, check_pii, check_repetitive_text};

use crate::builtin;
use crate::rule::{CheckFn, Rule};

/// A named collection of rules, keyed by rule id. Adding a rule under an
/// existing id replaces it. Construction always starts from the built-in
/// rules; each constructed set is an independent value.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub name: String,
    rules: BTreeMap<String, Rule>,
}

impl RuleSet {
    /// A fresh rule set carrying the built-in rules.
    pub fn new(name: impl Into<String>) -> Self {
        let mut set = Self {
            name: name.into(),
            rules: BTreeMap::new(),
        };
        set.load_builtin_rules();
        set
    }

    fn load_builtin_rules(&mut self) {
        self.add_rule(Rule::new(
            "required_fields",
            "Required fields",
            "All fields the schema marks required must be present",
            Severity::Error,
            infallible(builtin::check_required_fields),
        ));
        self.add_rule(Rule::new(
            "non_empty",
            "Non-empty fields",
            "String fields must not be empty",
            Severity::Error,
            Arc::new(|fields, _| Ok(builtin::check_non_empty(fields))),
        ));
        self.add_rule(Rule::new(
            "length_bounds",
            "Length bounds",
            "Text length must stay within the schema constraints",
            Severity::Warning,
            infallible(builtin::check_length_bounds),
        ));
        self.add_rule(Rule::placeholder(
            "no_duplicates",
            "Duplicate check",
            "Duplicate content is detected at population level",
            Severity::Warning,
        )
        .disabled());
        self.add_rule(Rule::new(
            "format_valid",
            "Format check",
            "Field values must match their schema-declared structural type",
            Severity::Error,
            infallible(builtin::check_format),
        ));
        self.add_rule(Rule::new(
            "language_consistency",
            "Language consistency",
            "Substantial text fields should agree on a dominant language",
            Severity::Info,
            Arc::new(|fields, _| Ok(check_language_consistency(fields))),
        ));
        self.add_rule(Rule::new(
            "score_valid",
            "Score validity",
            "Scores must come from the schema's scoring rubric",
            Severity::Error,
            infallible(builtin::check_score_valid),
        ));
        self.add_rule(Rule::new(
            "pii_detection",
            "PII detection",
            "Fields must not contain emails, phone numbers or ID numbers",
            Severity::Warning,
            Arc::new(|fields, _| Ok(check_pii(fields))),
        ));
        self.add_rule(Rule::new(
            "garbled_text",
            "Garbled text",
            "Fields must not contain control characters or mojibake",
            Severity::Warning,
            Arc::new(|fields, _| Ok(check_garbled_text(fields))),
        ));
        self.add_rule(Rule::new(
            "repetitive_text",
            "Repetitive text",
            "Fields must not consist of excessively repeated content",
            Severity::Warning,
            Arc::new(|fields, _| Ok(check_repetitive_text(fields))),
        ));
    }

    /// Insert a rule, replacing any existing rule with the same id.
    pub fn add_rule(&mut self, rule: Rule) {
        self.rules.insert(rule.id.clone(), rule);
    }

    pub fn remove_rule(&mut self, rule_id: &str) {
        self.rules.remove(rule_id);
    }

    /// Enable or disable a rule; unknown ids are ignored.
    pub fn set_enabled(&mut self, rule_id: &str, enabled: bool) {
        if let Some(rule) = self.rules.get_mut(rule_id) {
            rule.enabled = enabled;
        }
    }

    pub fn rule(&self, rule_id: &str) -> Option<&Rule> {
        self.rules.get(rule_id)
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values()
    }

    pub fn enabled_rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values().filter(|rule| rule.enabled)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new("default")
    }
}

fn infallible(check: fn(&datacheck_model::Fields, &datacheck_model::Schema) -> bool) -> CheckFn {
    Arc::new(move |fields, schema| Ok(check(fields, schema)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_loaded() {
        let set = RuleSet::default();
        assert_eq!(set.name, "default");
        assert!(set.rule("required_fields").is_some());
        assert!(set.rule("pii_detection").is_some());
        // no_duplicates is present but dormant.
        let no_dup = set.rule("no_duplicates").expect("no_duplicates");
        assert!(!no_dup.enabled);
        assert!(set.enabled_rules().all(|rule| rule.id != "no_duplicates"));
    }

    #[test]
    fn adding_under_existing_id_replaces() {
        let mut set = RuleSet::default();
        let before = set.len();
        set.add_rule(Rule::placeholder(
            "non_empty",
            "Replaced",
            "",
            Severity::Info,
        ));
        assert_eq!(set.len(), before);
        assert_eq!(set.rule("non_empty").expect("rule").name, "Replaced");
    }

    #[test]
    fn each_construction_is_independent() {
        let mut a = RuleSet::default();
        let b = RuleSet::default();
        a.set_enabled("pii_detection", false);
        assert!(!a.rule("pii_detection").expect("rule").enabled);
        assert!(b.rule("pii_detection").expect("rule").enabled);
    }
}
