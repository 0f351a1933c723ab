//! # Field Indexer
//!
//! Flattens a nested record into the ordered `{path, type, depth}` list the
//! mapping surfaces browse and autocomplete against. The indexer is a leaf:
//! it never mutates the model and the core only reads its output.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry in a flattened record schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaField {
    /// Dotted path from the record root, e.g. `customer.address.city`.
    pub path: String,
    /// `object` for containers, otherwise the JSON primitive type name.
    #[serde(rename = "type")]
    pub field_type: String,
    /// Nesting depth; top-level keys are depth 0.
    pub depth: usize,
}

/// JSON type name of a value.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Flatten a nested record into an ordered field list.
///
/// Objects recurse (their own entry is emitted first with type `object`);
/// arrays and primitives are leaves. Non-object roots flatten to nothing.
pub fn flatten_schema(root: &Value) -> Vec<SchemaField> {
    let mut fields = Vec::new();
    if let Value::Object(map) = root {
        walk(map, "", 0, &mut fields);
    }
    fields
}

fn walk(
    map: &serde_json::Map<String, Value>,
    prefix: &str,
    depth: usize,
    out: &mut Vec<SchemaField>,
) {
    for (key, value) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        out.push(SchemaField {
            path: path.clone(),
            field_type: json_type_name(value).to_string(),
            depth,
        });
        if let Value::Object(child) = value {
            walk(child, &path, depth + 1, out);
        }
    }
}
