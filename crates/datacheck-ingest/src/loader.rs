//! File loaders for records, schemas and rule configurations.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use datacheck_model::Schema;
use datacheck_rules::RuleConfig;

use crate::error::{IngestError, Result};

/// Load a record population from a data file, detecting the format by
/// extension.
///
/// - `.jsonl`: one JSON record per non-empty line.
/// - `.csv`: one record per row, all values as strings.
/// - anything else is parsed as JSON: either a top-level array of records,
///   or an object embedding records under `samples` (or `responses`) and an
///   optional schema under `schema`.
pub fn load_records(path: &Path) -> Result<(Vec<Value>, Option<Schema>)> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let loaded = match extension.as_str() {
        "jsonl" => (load_jsonl(path)?, None),
        "csv" => (load_csv(path)?, None),
        _ => load_json(path)?,
    };

    debug!(path = %path.display(), records = loaded.0.len(), "loaded data file");
    Ok(loaded)
}

fn load_jsonl(path: &Path) -> Result<Vec<Value>> {
    let content = read_file(path)?;
    let mut records = Vec::new();
    for (number, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record = serde_json::from_str(line).map_err(|error| IngestError::Parse {
            path: path.to_path_buf(),
            message: format!("line {}: {error}", number + 1),
        })?;
        records.push(record);
    }
    Ok(records)
}

fn load_csv(path: &Path) -> Result<Vec<Value>> {
    let mut reader = csv::Reader::from_path(path).map_err(|error| IngestError::Parse {
        path: path.to_path_buf(),
        message: error.to_string(),
    })?;
    let headers = reader
        .headers()
        .map_err(|error| IngestError::Parse {
            path: path.to_path_buf(),
            message: error.to_string(),
        })?
        .clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|error| IngestError::Parse {
            path: path.to_path_buf(),
            message: error.to_string(),
        })?;
        let mut record = Map::new();
        for (header, value) in headers.iter().zip(row.iter()) {
            record.insert(header.to_string(), Value::String(value.to_string()));
        }
        records.push(Value::Object(record));
    }
    Ok(records)
}

fn load_json(path: &Path) -> Result<(Vec<Value>, Option<Schema>)> {
    let content = read_file(path)?;
    let data: Value = serde_json::from_str(&content).map_err(|error| IngestError::Parse {
        path: path.to_path_buf(),
        message: error.to_string(),
    })?;

    match data {
        Value::Array(records) => Ok((records, None)),
        Value::Object(mut object) => {
            let records = match object.remove("samples").or_else(|| object.remove("responses")) {
                Some(Value::Array(records)) => records,
                _ => Vec::new(),
            };
            let schema = match object.remove("schema") {
                Some(value) if value.is_object() => Some(parse_schema(path, value)?),
                _ => None,
            };
            Ok((records, schema))
        }
        other => Err(IngestError::Parse {
            path: path.to_path_buf(),
            message: format!("expected an array or object of records, got {other}"),
        }),
    }
}

/// Load a schema description from a JSON file.
pub fn load_schema(path: &Path) -> Result<Schema> {
    let content = read_file(path)?;
    let value: Value = serde_json::from_str(&content).map_err(|error| IngestError::Parse {
        path: path.to_path_buf(),
        message: error.to_string(),
    })?;
    parse_schema(path, value)
}

/// Load a declarative ruleset configuration from a JSON file. Compiling the
/// definitions into rules is the rule engine's job.
pub fn load_rule_config(path: &Path) -> Result<RuleConfig> {
    let content = read_file(path)?;
    serde_json::from_str(&content).map_err(|error| IngestError::Parse {
        path: path.to_path_buf(),
        message: error.to_string(),
    })
}

fn parse_schema(path: &Path, value: Value) -> Result<Schema> {
    serde_json::from_value(value).map_err(|error| IngestError::Parse {
        path: path.to_path_buf(),
        message: format!("schema: {error}"),
    })
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}
