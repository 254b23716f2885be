//! Schema inference from a sample population.

use std::collections::BTreeMap;

use serde_json::{Number, Value};

use datacheck_model::{InferredField, InferredSchema, effective_fields};

#[derive(Default)]
struct FieldTally {
    count: usize,
    types: BTreeMap<&'static str, usize>,
    lengths: Vec<usize>,
    values: Vec<Number>,
}

/// Candidate primary types, in tie-breaking priority order.
const TYPE_ORDER: [&str; 6] = ["string", "boolean", "integer", "number", "array", "object"];

/// Infer a schema from a record population.
///
/// A field present in at least 95% of records is marked required; one with
/// any observed null is nullable. String fields get length bounds; numeric
/// fields get value bounds and, when at most ten distinct values occur, an
/// enum constraint.
pub fn infer_schema(records: &[Value]) -> InferredSchema {
    let mut schema = InferredSchema {
        sample_count: records.len(),
        fields: BTreeMap::new(),
    };

    if records.is_empty() {
        return schema;
    }

    let mut tallies: BTreeMap<String, FieldTally> = BTreeMap::new();

    for record in records {
        let Some(fields) = effective_fields(record) else {
            continue;
        };
        for (key, value) in fields {
            let tally = tallies.entry(key.clone()).or_default();
            tally.count += 1;

            let type_name = match value {
                Value::Null => "null",
                Value::String(text) => {
                    tally.lengths.push(text.chars().count());
                    "string"
                }
                Value::Bool(_) => "boolean",
                Value::Number(number) => {
                    tally.values.push(number.clone());
                    if number.is_i64() || number.is_u64() {
                        "integer"
                    } else {
                        "number"
                    }
                }
                Value::Array(_) => "array",
                Value::Object(_) => "object",
            };
            *tally.types.entry(type_name).or_insert(0) += 1;
        }
    }

    let total = records.len();

    for (field_name, tally) in tallies {
        let mut primary_type = "string";
        let mut best = 0usize;
        for candidate in TYPE_ORDER {
            let count = tally.types.get(candidate).copied().unwrap_or(0);
            if count > best {
                primary_type = candidate;
                best = count;
            }
        }

        let mut field = InferredField {
            value_type: primary_type.to_string(),
            required: None,
            nullable: None,
            min_length: None,
            max_length: None,
            avg_length: None,
            min_value: None,
            max_value: None,
            enum_values: None,
        };

        if tally.count as f64 / total as f64 >= 0.95 {
            field.required = Some(true);
        }
        if tally.types.get("null").copied().unwrap_or(0) > 0 {
            field.nullable = Some(true);
        }

        if primary_type == "string" && !tally.lengths.is_empty() {
            field.min_length = tally.lengths.iter().copied().min();
            field.max_length = tally.lengths.iter().copied().max();
            let avg = tally.lengths.iter().sum::<usize>() as f64 / tally.lengths.len() as f64;
            field.avg_length = Some(avg.round() as u64);
        }

        if matches!(primary_type, "integer" | "number") && !tally.values.is_empty() {
            let mut sorted = tally.values.clone();
            sorted.sort_by(|a, b| {
                a.as_f64()
                    .unwrap_or(f64::NAN)
                    .total_cmp(&b.as_f64().unwrap_or(f64::NAN))
            });
            field.min_value = sorted.first().cloned();
            field.max_value = sorted.last().cloned();

            let mut distinct: Vec<Number> = Vec::new();
            for number in sorted {
                let duplicate = distinct
                    .last()
                    .and_then(Number::as_f64)
                    .is_some_and(|prev| Some(prev) == number.as_f64());
                if !duplicate {
                    distinct.push(number);
                }
            }
            if distinct.len() <= 10 {
                field.enum_values = Some(distinct);
            }
        }

        schema.fields.insert(field_name, field);
    }

    schema
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_population_yields_empty_schema() {
        let schema = infer_schema(&[]);
        assert_eq!(schema.sample_count, 0);
        assert!(schema.fields.is_empty());
    }

    #[test]
    fn presence_threshold_marks_required() {
        // 20 of 21 records carry the field: 95.2%, just over the line.
        let mut records: Vec<Value> = (0..20).map(|i| json!({"a": i, "b": 1})).collect();
        records.push(json!({"b": 1}));
        let schema = infer_schema(&records);
        assert_eq!(schema.fields["a"].required, Some(true));
        assert_eq!(schema.fields["b"].required, Some(true));

        // 19 of 21 is below the threshold.
        let mut records: Vec<Value> = (0..19).map(|i| json!({"a": i})).collect();
        records.push(json!({"x": 1}));
        records.push(json!({"x": 1}));
        let schema = infer_schema(&records);
        assert_eq!(schema.fields["a"].required, None);
    }

    #[test]
    fn small_numeric_domains_become_enums() {
        let records: Vec<Value> = (0..30).map(|i| json!({"score": 1 + (i % 3)})).collect();
        let schema = infer_schema(&records);
        let field = &schema.fields["score"];
        assert_eq!(field.value_type, "integer");
        let enum_values: Vec<i64> = field
            .enum_values
            .as_ref()
            .expect("enum")
            .iter()
            .map(|n| n.as_i64().expect("i64"))
            .collect();
        assert_eq!(enum_values, vec![1, 2, 3]);
    }

    #[test]
    fn wide_numeric_domains_get_bounds_only() {
        let records: Vec<Value> = (0..30).map(|i| json!({"n": i})).collect();
        let schema = infer_schema(&records);
        let field = &schema.fields["n"];
        assert!(field.enum_values.is_none());
        assert_eq!(field.min_value.as_ref().and_then(Number::as_i64), Some(0));
        assert_eq!(field.max_value.as_ref().and_then(Number::as_i64), Some(29));
    }

    #[test]
    fn string_fields_get_length_bounds() {
        let records = vec![json!({"t": "ab"}), json!({"t": "abcd"})];
        let schema = infer_schema(&records);
        let field = &schema.fields["t"];
        assert_eq!(field.value_type, "string");
        assert_eq!(field.min_length, Some(2));
        assert_eq!(field.max_length, Some(4));
        assert_eq!(field.avg_length, Some(3));
    }

    #[test]
    fn booleans_and_integers_stay_distinct() {
        let records: Vec<Value> = (0..4).map(|i| json!({"flag": i % 2 == 0})).collect();
        let schema = infer_schema(&records);
        assert_eq!(schema.fields["flag"].value_type, "boolean");
        assert!(schema.fields["flag"].enum_values.is_none());
    }

    #[test]
    fn nulls_mark_nullable_without_driving_type() {
        let records = vec![json!({"v": null}), json!({"v": "x"}), json!({"v": "y"})];
        let schema = infer_schema(&records);
        let field = &schema.fields["v"];
        assert_eq!(field.value_type, "string");
        assert_eq!(field.nullable, Some(true));
    }
}
