//! # Raw Document Loading
//!
//! Turns YAML or JSON text into the untyped raw tree (`serde_json::Value`)
//! the validator consumes. Both formats land in the identical tree, so a
//! manifest behaves the same no matter which syntax authored it.
//!
//! Parse failures here are [`ManifestError::MalformedDocument`]; everything
//! about field names, kinds, and invariants belongs to the validator.

use serde_json::Value;

use crate::error::{ManifestError, ManifestResult};
use crate::model::Manifest;
use crate::validate;

/// Parse a JSON document into the raw tree.
pub fn raw_from_json_str(text: &str) -> ManifestResult<Value> {
    serde_json::from_str(text)
        .map_err(|e| ManifestError::MalformedDocument(format!("invalid JSON: {e}")))
}

/// Parse a YAML document into the raw tree.
pub fn raw_from_yaml_str(text: &str) -> ManifestResult<Value> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(text)
        .map_err(|e| ManifestError::MalformedDocument(format!("invalid YAML: {e}")))?;
    yaml_to_json_value(&yaml)
}

/// Parse a document into the raw tree, sniffing the syntax.
///
/// Text whose first non-whitespace byte is `{` or `[` is treated as JSON;
/// anything else as YAML.
pub fn raw_from_str(text: &str) -> ManifestResult<Value> {
    if looks_like_json(text) {
        raw_from_json_str(text)
    } else {
        raw_from_yaml_str(text)
    }
}

/// Parse and validate a manifest in one step.
pub fn load_manifest_str(text: &str) -> ManifestResult<Manifest> {
    let raw = raw_from_str(text)?;
    validate::validate(&raw)
}

fn looks_like_json(text: &str) -> bool {
    matches!(text.trim_start().as_bytes().first(), Some(b'{') | Some(b'['))
}

/// Convert a `serde_yaml::Value` to a `serde_json::Value`.
///
/// Manifests use only the JSON-compatible subset of YAML. Non-string
/// mapping keys are stringified; values with no JSON representation
/// (non-finite floats) are rejected.
fn yaml_to_json_value(yaml: &serde_yaml::Value) -> ManifestResult<Value> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(serde_json::Number::from(i)))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(serde_json::Number::from(u)))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f).map(Value::Number).ok_or_else(|| {
                    ManifestError::MalformedDocument(format!(
                        "cannot represent float {f} in JSON"
                    ))
                })
            } else {
                Err(ManifestError::MalformedDocument(format!(
                    "unsupported YAML number: {n:?}"
                )))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => {
            let items: ManifestResult<Vec<Value>> = seq.iter().map(yaml_to_json_value).collect();
            Ok(Value::Array(items?))
        }
        serde_yaml::Value::Mapping(map) => {
            let mut json_map = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => {
                        return Err(ManifestError::MalformedDocument(format!(
                            "unsupported YAML map key: {other:?}"
                        )))
                    }
                };
                json_map.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(json_map))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}
