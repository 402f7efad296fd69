//! # pcfkit-schema
//!
//! JSON Schema export for the manifest document model.
//!
//! The schema is derived from the typed structs in `pcfkit-manifest`, so
//! the editor-facing contract and the validator share one source of truth:
//! every field rename, optional marker, and closed keyword set in the model
//! shows up in the schema without a hand-maintained copy.
//!
//! The exported document targets JSON Schema draft 2020-12 and is what the
//! `yaml-language-server` directive in generated YAML manifests points at.

use serde_json::Value;

use pcfkit_manifest::model::Manifest;

/// Dialect the exported schema declares.
pub const SCHEMA_DIALECT: &str = "https://json-schema.org/draft/2020-12/schema";

/// Where the published copy of the schema lives. Generated YAML manifests
/// reference this URL in their `yaml-language-server` directive.
pub const DEFAULT_SCHEMA_URL: &str =
    "https://raw.githubusercontent.com/pcfkit/pcfkit/main/schemas/manifest.schema.json";

/// The manifest JSON Schema as a value tree.
pub fn manifest_schema() -> Value {
    let mut value = schemars::schema_for!(Manifest).to_value();
    if let Some(obj) = value.as_object_mut() {
        obj.insert(
            "$schema".to_string(),
            Value::String(SCHEMA_DIALECT.to_string()),
        );
    }
    value
}

/// The manifest JSON Schema as pretty-printed text with a trailing
/// newline, ready to write to disk.
pub fn manifest_schema_text() -> serde_json::Result<String> {
    let mut text = serde_json::to_string_pretty(&manifest_schema())?;
    text.push('\n');
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_doc() -> Value {
        json!({
            "control": {
                "namespace": "SampleNamespace",
                "constructor": "SampleControl",
                "version": "1.0.0",
                "display-name-key": "Sample_Key",
                "resources": {
                    "code": {"path": "index.ts", "order": 1}
                }
            }
        })
    }

    #[test]
    fn schema_declares_2020_12() {
        let schema = manifest_schema();
        assert_eq!(schema["$schema"], SCHEMA_DIALECT);
        assert_eq!(schema["type"], "object");
    }

    #[test]
    fn schema_compiles_and_accepts_a_minimal_manifest() {
        let validator = jsonschema::validator_for(&manifest_schema()).unwrap();
        assert!(validator.is_valid(&minimal_doc()));
    }

    #[test]
    fn schema_rejects_unknown_fields() {
        let validator = jsonschema::validator_for(&manifest_schema()).unwrap();
        let mut doc = minimal_doc();
        doc["control"]["surprise"] = json!(true);
        assert!(!validator.is_valid(&doc));
    }

    #[test]
    fn schema_rejects_missing_required_fields() {
        let validator = jsonschema::validator_for(&manifest_schema()).unwrap();
        let mut doc = minimal_doc();
        doc["control"].as_object_mut().unwrap().remove("namespace");
        assert!(!validator.is_valid(&doc));
    }

    #[test]
    fn schema_knows_the_type_vocabulary() {
        let validator = jsonschema::validator_for(&manifest_schema()).unwrap();
        let mut doc = minimal_doc();
        doc["control"]["property"] = json!([{
            "name": "A",
            "display-name-key": "A_Key",
            "of-type": "SingleLine.Text"
        }]);
        assert!(validator.is_valid(&doc));
        doc["control"]["property"][0]["of-type"] = json!("NotAType");
        assert!(!validator.is_valid(&doc));
    }

    #[test]
    fn validated_manifests_satisfy_the_schema() {
        let manifest = pcfkit_manifest::load_manifest_str(concat!(
            "control:\n",
            "  namespace: SampleNamespace\n",
            "  constructor: SampleControl\n",
            "  version: 1.0.0\n",
            "  display-name-key: Sample_Key\n",
            "  property:\n",
            "    - name: Mode\n",
            "      display-name-key: Mode_Key\n",
            "      of-type: Enum\n",
            "      value:\n",
            "        - {name: Red, display-name-key: Red_Key, value: 0}\n",
            "  resources:\n",
            "    code: {path: index.ts, order: 1}\n",
        ))
        .unwrap();
        let serialized = serde_json::to_value(&manifest).unwrap();
        let validator = jsonschema::validator_for(&manifest_schema()).unwrap();
        assert!(validator.is_valid(&serialized));
    }

    #[test]
    fn schema_text_is_pretty_printed() {
        let text = manifest_schema_text().unwrap();
        assert!(text.starts_with("{\n"));
        assert!(text.ends_with("}\n"));
    }
}
