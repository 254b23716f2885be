//! Built-in check functions.

use serde_json::Value;

use datacheck_model::{Fields, Schema};

/// Every field the schema marks required (the default) must be present.
/// Vacuously true when the schema declares no fields.
pub(crate) fn check_required_fields(fields: &Fields, schema: &Schema) -> bool {
    for field in &schema.fields {
        if field.is_required() && !field.name.is_empty() && !fields.contains_key(&field.name) {
            return false;
        }
    }
    true
}

/// No string field may be the empty string. `id` and `metadata` are exempt.
/// Whitespace-only strings are not empty for this rule; trimming is the
/// fixer's job.
pub(crate) fn check_non_empty(fields: &Fields) -> bool {
    for (key, value) in fields {
        if key == "id" || key == "metadata" {
            continue;
        }
        if let Value::String(text) = value
            && text.is_empty()
        {
            return false;
        }
    }
    true
}

/// Every string field's length must fall within the schema constraints
/// (defaults 1..100000).
pub(crate) fn check_length_bounds(fields: &Fields, schema: &Schema) -> bool {
    let min_length = schema.constraints.min_length.unwrap_or(1);
    let max_length = schema.constraints.max_length.unwrap_or(100_000);

    for value in fields.values() {
        if let Value::String(text) = value {
            let length = text.chars().count();
            if length < min_length || length > max_length {
                return false;
            }
        }
    }
    true
}

/// Fields with a schema-declared structural type (`number`, `list`, `json`)
/// must match it. Undeclared fields and other type names are unconstrained.
pub(crate) fn check_format(fields: &Fields, schema: &Schema) -> bool {
    for field_def in &schema.fields {
        let Some(value) = fields.get(&field_def.name) else {
            continue;
        };
        let matches = match field_def.field_type.as_deref() {
            Some("number") => value.is_number(),
            Some("list") => value.is_array(),
            Some("json") => value.is_object() || value.is_array(),
            _ => true,
        };
        if !matches {
            return false;
        }
    }
    true
}

/// If the schema declares a scoring rubric, any present score-like field must
/// carry one of the rubric's values. Null scores are tolerated.
pub(crate) fn check_score_valid(fields: &Fields, schema: &Schema) -> bool {
    let valid_scores = schema.rubric_scores();
    if valid_scores.is_empty() {
        return true;
    }

    for key in ["score", "rating", "label", "grade"] {
        let Some(value) = fields.get(key) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        if !valid_scores.iter().any(|score| values_equal(score, value)) {
            return false;
        }
    }
    true
}

/// Value equality that treats numerically equal integers and floats as the
/// same score (a rubric `5` accepts a record `5.0`).
fn values_equal(a: &Value, b: &Value) -> bool {
    if a == b {
        return true;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        value.as_object().expect("object").clone()
    }

    fn schema(value: Value) -> Schema {
        serde_json::from_value(value).expect("schema")
    }

    #[test]
    fn required_fields_vacuous_without_schema() {
        assert!(check_required_fields(&fields(json!({})), &Schema::default()));
    }

    #[test]
    fn required_fields_respects_optional_marker() {
        let schema = schema(json!({"fields": [
            {"name": "instruction"},
            {"name": "notes", "required": false},
        ]}));
        assert!(check_required_fields(
            &fields(json!({"instruction": "hi"})),
            &schema
        ));
        assert!(!check_required_fields(&fields(json!({"notes": "x"})), &schema));
    }

    #[test]
    fn non_empty_exempts_id_and_metadata() {
        assert!(check_non_empty(&fields(json!({"id": "", "metadata": ""}))));
        assert!(!check_non_empty(&fields(json!({"instruction": ""}))));
        // Whitespace is not the empty string here.
        assert!(check_non_empty(&fields(json!({"instruction": "   "}))));
    }

    #[test]
    fn length_bounds_use_schema_constraints() {
        let schema = schema(json!({"constraints": {"min_length": 3, "max_length": 5}}));
        assert!(check_length_bounds(&fields(json!({"a": "abcd"})), &schema));
        assert!(!check_length_bounds(&fields(json!({"a": "ab"})), &schema));
        assert!(!check_length_bounds(&fields(json!({"a": "abcdef"})), &schema));
    }

    #[test]
    fn format_checks_declared_structural_types() {
        let schema = schema(json!({"fields": [
            {"name": "score", "type": "number"},
            {"name": "tags", "type": "list"},
            {"name": "extra", "type": "json"},
        ]}));
        assert!(check_format(
            &fields(json!({"score": 3, "tags": [], "extra": {}})),
            &schema
        ));
        assert!(!check_format(&fields(json!({"score": "3"})), &schema));
        assert!(!check_format(&fields(json!({"tags": "a,b"})), &schema));
        assert!(check_format(&fields(json!({"unrelated": "x"})), &schema));
    }

    #[test]
    fn score_valid_accepts_rubric_values_only() {
        let schema = schema(json!({"scoring_rubric": [
            {"score": 1, "label": "bad"},
            {"score": 5, "label": "good"},
        ]}));
        assert!(check_score_valid(&fields(json!({"score": 5})), &schema));
        assert!(check_score_valid(&fields(json!({"rating": 5.0})), &schema));
        assert!(check_score_valid(&fields(json!({"score": null})), &schema));
        assert!(!check_score_valid(&fields(json!({"score": 3})), &schema));
        assert!(check_score_valid(&fields(json!({"other": 99})), &schema));
    }
}
