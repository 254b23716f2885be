//! Record access helpers.
//!
//! A record is any JSON value, normally an object. Records may either be flat
//! (`{"instruction": ...}`) or wrapped (`{"id": ..., "data": {...}}`); when a
//! `data` member is present, validation and analysis operate on its contents.

use serde_json::Value;

/// Field map of a record.
pub type Fields = serde_json::Map<String, Value>;

/// Resolve the identifier of a record, falling back to a positional
/// placeholder when the record carries no usable `id`.
pub fn record_id(record: &Value, index: usize) -> String {
    match record.get("id") {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => format!("sample_{index}"),
    }
}

/// The value validation operates on: the `data` member when present,
/// otherwise the record itself.
pub fn effective_value(record: &Value) -> &Value {
    match record.get("data") {
        Some(data) => data,
        None => record,
    }
}

/// Effective fields of a record, or `None` when the record (or its `data`
/// member) is not an object.
pub fn effective_fields(record: &Value) -> Option<&Fields> {
    effective_value(record).as_object()
}
