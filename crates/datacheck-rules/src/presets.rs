//! Preset rule sets for common dataset shapes.

use std::sync::Arc;

use datacheck_model::Severity;

use crate::rule::{CheckFn, Rule, value_length};
use crate::set::RuleSet;

/// Rules for instruction/response (SFT) data: instructions must reach ten
/// characters, responses twenty.
pub fn sft_ruleset() -> RuleSet {
    let mut ruleset = RuleSet::new("sft");

    ruleset.add_rule(Rule::new(
        "instruction_quality",
        "Instruction quality",
        "Instructions should be specific enough to act on",
        Severity::Warning,
        Arc::new(|fields, _| {
            let length = match fields.get("instruction") {
                Some(value) => value_length(value)?,
                None => 0,
            };
            Ok(length >= 10)
        }),
    ));

    ruleset.add_rule(Rule::new(
        "response_quality",
        "Response quality",
        "Responses should carry enough detail",
        Severity::Warning,
        Arc::new(|fields, _| {
            let length = match fields.get("response") {
                Some(value) => value_length(value)?,
                None => 0,
            };
            Ok(length >= 20)
        }),
    ));

    ruleset
}

/// Rules for preference-pair data: `chosen` and `rejected` must differ.
/// A record missing both fields fails too; there is nothing to prefer.
pub fn preference_ruleset() -> RuleSet {
    let mut ruleset = RuleSet::new("preference");

    ruleset.add_rule(Rule::new(
        "chosen_rejected_different",
        "Chosen/rejected difference",
        "The chosen and rejected responses must not be identical",
        Severity::Error,
        Arc::new(|fields, _| Ok(fields.get("chosen") != fields.get("rejected"))),
    ));

    ruleset
}

/// Rules for annotation-review exports: every response must carry at least
/// one of the recognised annotation outcomes.
pub fn annotation_ruleset() -> RuleSet {
    let mut ruleset = RuleSet::new("annotation");

    ruleset.add_rule(Rule::new(
        "annotation_complete",
        "Annotation completeness",
        "A response must carry a score, a ranking or a choice",
        Severity::Error,
        Arc::new(|fields, _| {
            Ok(fields.contains_key("score")
                || fields.contains_key("ranking")
                || fields.contains_key("choice"))
        }),
    ));

    ruleset
}

/// Rules for LLM-graded workflows. The grading itself is the caller's check
/// function; this engine only runs it.
pub fn llm_ruleset(check: CheckFn) -> RuleSet {
    let mut ruleset = RuleSet::new("llm");

    ruleset.add_rule(Rule::new(
        "llm_quality",
        "LLM quality grade",
        "An external model grades overall sample quality",
        Severity::Warning,
        check,
    ));

    ruleset
}

#[cfg(test)]
mod tests {
    use super::*;
    use datacheck_model::{Fields, Schema};
    use serde_json::{Value, json};

    fn fields(value: Value) -> Fields {
        value.as_object().expect("object").clone()
    }

    fn run(ruleset: &RuleSet, rule_id: &str, record: Value) -> bool {
        ruleset
            .rule(rule_id)
            .expect("rule")
            .check(&fields(record), &Schema::default())
            .passed
    }

    #[test]
    fn sft_checks_instruction_and_response_length() {
        let ruleset = sft_ruleset();
        assert!(run(
            &ruleset,
            "instruction_quality",
            json!({"instruction": "Summarize the article below"})
        ));
        assert!(!run(&ruleset, "instruction_quality", json!({"instruction": "hi"})));
        assert!(!run(&ruleset, "instruction_quality", json!({})));
        assert!(!run(
            &ruleset,
            "response_quality",
            json!({"response": "too short"})
        ));
        // Preset rules sit alongside the built-ins.
        assert!(ruleset.rule("non_empty").is_some());
    }

    #[test]
    fn preference_requires_difference() {
        let ruleset = preference_ruleset();
        assert!(run(
            &ruleset,
            "chosen_rejected_different",
            json!({"chosen": "a", "rejected": "b"})
        ));
        assert!(!run(
            &ruleset,
            "chosen_rejected_different",
            json!({"chosen": "a", "rejected": "a"})
        ));
        assert!(!run(&ruleset, "chosen_rejected_different", json!({})));
    }

    #[test]
    fn annotation_requires_an_outcome() {
        let ruleset = annotation_ruleset();
        assert!(run(&ruleset, "annotation_complete", json!({"score": 4})));
        assert!(run(&ruleset, "annotation_complete", json!({"ranking": [1, 2]})));
        assert!(!run(&ruleset, "annotation_complete", json!({"comment": "fine"})));
    }

    #[test]
    fn llm_ruleset_runs_the_supplied_check() {
        let ruleset = llm_ruleset(Arc::new(|fields, _| {
            Ok(fields.get("quality").and_then(Value::as_i64).unwrap_or(0) >= 3)
        }));
        assert!(run(&ruleset, "llm_quality", json!({"quality": 4})));
        assert!(!run(&ruleset, "llm_quality", json!({"quality": 1})));
    }
}
