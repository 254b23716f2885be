//! Schema descriptions for record populations.
//!
//! A validation [`Schema`] is declarative input: expected fields, global
//! length constraints, and an optional scoring rubric. All parts are
//! optional; rules degrade to permissive behavior when schema information is
//! absent. [`InferredSchema`] is the output of schema inference over a
//! population and uses a per-field map instead of a field list.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Declarative schema for a record population.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Schema {
    pub fields: Vec<FieldDef>,
    pub constraints: Constraints,
    pub scoring_rubric: Vec<RubricEntry>,
}

impl Schema {
    /// The closed set of score values declared by the rubric.
    pub fn rubric_scores(&self) -> Vec<&Value> {
        self.scoring_rubric.iter().map(|entry| &entry.score).collect()
    }
}

/// One expected field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

impl FieldDef {
    /// Fields are required unless explicitly marked otherwise.
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(true)
    }
}

/// Global string-length constraints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Constraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

/// One rubric entry defining a valid score value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RubricEntry {
    pub score: Value,
    pub label: String,
}

/// Schema inferred from a sample population.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InferredSchema {
    pub sample_count: usize,
    pub fields: BTreeMap<String, InferredField>,
}

/// Inferred description of one field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferredField {
    #[serde(rename = "type")]
    pub value_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<Number>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Number>>,
}
