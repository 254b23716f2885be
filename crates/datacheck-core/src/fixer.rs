//! Automated cleanup of common data defects.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use datacheck_ingest::load_records;
use datacheck_model::Fields;
use datacheck_text::redact_pii;

use crate::dedupe::content_hash;

/// Which repairs [`DataFixer::fix`] applies.
#[derive(Debug, Clone, Copy)]
pub struct FixOptions {
    /// Drop exact duplicates, keeping the first occurrence.
    pub dedup: bool,
    /// Strip surrounding whitespace from string fields.
    pub trim: bool,
    /// Drop records whose fields are all empty or null.
    pub remove_empty: bool,
    /// Replace PII matches with redaction tokens.
    pub strip_pii: bool,
}

impl Default for FixOptions {
    fn default() -> Self {
        Self {
            dedup: true,
            trim: true,
            remove_empty: true,
            strip_pii: false,
        }
    }
}

/// Counts of what the fixer changed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FixResult {
    pub total_input: usize,
    pub total_output: usize,
    pub duplicates_removed: usize,
    pub empty_removed: usize,
    pub trimmed_count: usize,
    pub pii_redacted_count: usize,
}

/// Applies mechanical fixes to a record population.
#[derive(Debug, Default)]
pub struct DataFixer;

impl DataFixer {
    pub fn new() -> Self {
        Self
    }

    /// Fix records in memory, returning the cleaned population and counts.
    pub fn fix(&self, records: Vec<Value>, options: &FixOptions) -> (Vec<Value>, FixResult) {
        let mut result = FixResult {
            total_input: records.len(),
            ..FixResult::default()
        };
        let mut records = records;

        if options.dedup {
            let removed;
            (records, removed) = dedup(records);
            result.duplicates_removed = removed;
        }

        if options.trim {
            result.trimmed_count = trim(&mut records);
        }

        if options.remove_empty {
            let removed;
            (records, removed) = remove_empty(records);
            result.empty_removed = removed;
        }

        if options.strip_pii {
            result.pii_redacted_count = strip_pii(&mut records);
        }

        result.total_output = records.len();
        (records, result)
    }

    /// Fix a data file and write the cleaned records as JSONL.
    pub fn fix_file(
        &self,
        data_path: &Path,
        output_path: &Path,
        options: &FixOptions,
    ) -> Result<FixResult> {
        let (records, _) = load_records(data_path)?;
        let (fixed, result) = self.fix(records, options);

        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        let mut output = String::new();
        for record in &fixed {
            output.push_str(&serde_json::to_string(record)?);
            output.push('\n');
        }
        std::fs::write(output_path, output)
            .with_context(|| format!("write {}", output_path.display()))?;

        info!(
            input = result.total_input,
            output = result.total_output,
            "fixed data file"
        );
        Ok(result)
    }
}

fn dedup(records: Vec<Value>) -> (Vec<Value>, usize) {
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(records.len());
    let mut removed = 0usize;

    for record in records {
        if seen.insert(content_hash(&record)) {
            kept.push(record);
        } else {
            removed += 1;
        }
    }
    (kept, removed)
}

fn trim(records: &mut [Value]) -> usize {
    let mut count = 0usize;
    for record in records {
        let Some(fields) = effective_fields_mut(record) else {
            continue;
        };
        for value in fields.values_mut() {
            if let Value::String(text) = value {
                let trimmed = text.trim().to_string();
                if trimmed != *text {
                    *text = trimmed;
                    count += 1;
                }
            }
        }
    }
    count
}

fn remove_empty(records: Vec<Value>) -> (Vec<Value>, usize) {
    let mut kept = Vec::with_capacity(records.len());
    let mut removed = 0usize;

    for record in records {
        let has_value = match datacheck_model::effective_fields(&record) {
            Some(fields) => fields.values().any(is_meaningful),
            // Records without a field map are left alone.
            None => true,
        };
        if has_value {
            kept.push(record);
        } else {
            removed += 1;
        }
    }
    (kept, removed)
}

fn is_meaningful(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        _ => true,
    }
}

fn strip_pii(records: &mut [Value]) -> usize {
    let mut count = 0usize;
    for record in records {
        let Some(fields) = effective_fields_mut(record) else {
            continue;
        };
        for value in fields.values_mut() {
            if let Value::String(text) = value {
                let redacted = redact_pii(text);
                if redacted != *text {
                    *text = redacted;
                    count += 1;
                }
            }
        }
    }
    count
}

/// Mutable counterpart of [`datacheck_model::effective_fields`].
fn effective_fields_mut(record: &mut Value) -> Option<&mut Fields> {
    if record.get("data").is_some() {
        record.get_mut("data").and_then(Value::as_object_mut)
    } else {
        record.as_object_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dedup_keeps_the_first_occurrence() {
        let records = vec![
            json!({"id": "a", "data": {"text": "same"}}),
            json!({"id": "b", "data": {"text": "same"}}),
            json!({"id": "c", "data": {"text": "other"}}),
        ];
        let (fixed, result) = DataFixer::new().fix(records, &FixOptions::default());
        assert_eq!(result.duplicates_removed, 1);
        assert_eq!(fixed.len(), 2);
        assert_eq!(fixed[0]["id"], "a");
    }

    #[test]
    fn trim_counts_only_changed_fields() {
        let records = vec![json!({"a": "  padded  ", "b": "clean", "n": 5})];
        let (fixed, result) = DataFixer::new().fix(records, &FixOptions::default());
        assert_eq!(result.trimmed_count, 1);
        assert_eq!(fixed[0]["a"], "padded");
        assert_eq!(fixed[0]["b"], "clean");
    }

    #[test]
    fn empty_records_are_removed() {
        let records = vec![
            json!({"a": "", "b": null, "c": [], "d": {}}),
            json!({"a": "kept"}),
        ];
        let (fixed, result) = DataFixer::new().fix(records, &FixOptions::default());
        assert_eq!(result.empty_removed, 1);
        assert_eq!(fixed.len(), 1);
        assert_eq!(fixed[0]["a"], "kept");
    }

    #[test]
    fn pii_redaction_prefers_id_over_phone() {
        let records = vec![json!({"text": "id 110101199003071234, mail a@b.com"})];
        let options = FixOptions {
            strip_pii: true,
            ..FixOptions::default()
        };
        let (fixed, result) = DataFixer::new().fix(records, &options);
        assert_eq!(result.pii_redacted_count, 1);
        assert_eq!(fixed[0]["text"], "id [ID], mail [EMAIL]");
    }

    #[test]
    fn disabled_steps_do_nothing() {
        let records = vec![
            json!({"text": "  a  "}),
            json!({"text": "  a  "}),
            json!({"other": ""}),
        ];
        let options = FixOptions {
            dedup: false,
            trim: false,
            remove_empty: false,
            strip_pii: false,
        };
        let (fixed, result) = DataFixer::new().fix(records, &options);
        assert_eq!(fixed.len(), 3);
        assert_eq!(result.duplicates_removed, 0);
        assert_eq!(result.trimmed_count, 0);
        assert_eq!(result.empty_removed, 0);
    }
}
