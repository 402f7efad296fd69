//! Tolerant `ControlManifest.Input.xml` import.
//!
//! The reader accepts any attribute order, indentation, and namespace
//! prefixes, and maps the document onto the same raw tree the YAML/JSON
//! loaders produce. It never rejects content itself beyond well-formedness
//! and the `<manifest>` root: unknown elements and attributes, misspelled
//! booleans, and non-numeric orders are carried into the raw tree verbatim
//! so the validator reports them with a precise field path.

use roxmltree::{Document, Node};
use serde_json::Value;

use crate::error::{ManifestError, ManifestResult};
use crate::model::Manifest;
use crate::validate;

type Map = serde_json::Map<String, Value>;

// Attributes coerced to their raw primitive kind when they look like one.
// Anything else stays a string for the validator to flag.
const BOOL_ATTRS: &[&str] = &["required", "enabled"];
const INT_ATTRS: &[&str] = &["order"];

/// Parse manifest XML into the raw document tree.
///
/// # Errors
///
/// [`ManifestError::MalformedDocument`] when the text is not well-formed
/// XML or the root element is not `<manifest>`.
pub fn raw_from_xml_str(text: &str) -> ManifestResult<Value> {
    let doc = Document::parse(text)
        .map_err(|e| ManifestError::MalformedDocument(format!("invalid XML: {e}")))?;
    let root = doc.root_element();
    if root.tag_name().name() != "manifest" {
        return Err(ManifestError::MalformedDocument(format!(
            "expected <manifest> root, found <{}>",
            root.tag_name().name()
        )));
    }

    let mut map = Map::new();
    if let Some(control) = child_elements(root).find(|n| n.tag_name().name() == "control") {
        map.insert("control".to_string(), control_value(control));
    }
    Ok(Value::Object(map))
}

/// Parse and validate manifest XML in one step.
pub fn manifest_from_xml_str(text: &str) -> ManifestResult<Manifest> {
    let raw = raw_from_xml_str(text)?;
    validate::validate(&raw)
}

fn control_value(node: Node) -> Value {
    let mut map = attrs_map(node);
    let mut property = Vec::new();
    let mut event = Vec::new();
    let mut data_set = Vec::new();
    let mut type_group = Vec::new();

    for child in child_elements(node) {
        match child.tag_name().name() {
            "property" => property.push(property_value(child)),
            "event" => event.push(Value::Object(attrs_map(child))),
            "data-set" => data_set.push(data_set_value(child)),
            "type-group" => type_group.push(type_group_value(child)),
            "property-dependencies" => {
                map.insert(
                    "property-dependencies".to_string(),
                    property_dependencies_value(child),
                );
            }
            "feature-usage" => {
                map.insert("feature-usage".to_string(), feature_usage_value(child));
            }
            "external-service-usage" => {
                map.insert(
                    "external-service-usage".to_string(),
                    external_service_usage_value(child),
                );
            }
            "platform-action" => {
                map.insert(
                    "platform-action".to_string(),
                    Value::Object(attrs_map(child)),
                );
            }
            "resources" => {
                map.insert("resources".to_string(), resources_value(child));
            }
            other => insert_unknown(&mut map, other, child),
        }
    }

    map.insert("property".to_string(), Value::Array(property));
    map.insert("event".to_string(), Value::Array(event));
    map.insert("data-set".to_string(), Value::Array(data_set));
    map.insert("type-group".to_string(), Value::Array(type_group));
    Value::Object(map)
}

fn property_value(node: Node) -> Value {
    let mut map = attrs_map(node);
    let mut values = Vec::new();
    for child in child_elements(node) {
        match child.tag_name().name() {
            "types" => {
                map.insert("types".to_string(), types_value(child));
            }
            "value" => values.push(enum_value_value(child)),
            other => insert_unknown(&mut map, other, child),
        }
    }
    if !values.is_empty() {
        map.insert("value".to_string(), Value::Array(values));
    }
    Value::Object(map)
}

fn enum_value_value(node: Node) -> Value {
    let mut map = attrs_map(node);
    let text = element_text(node);
    let value = match text.parse::<i64>() {
        Ok(i) => Value::Number(i.into()),
        Err(_) => Value::String(text),
    };
    map.insert("value".to_string(), value);
    Value::Object(map)
}

fn types_value(node: Node) -> Value {
    let mut map = attrs_map(node);
    map.insert("type".to_string(), Value::Array(type_list(node)));
    Value::Object(map)
}

fn type_group_value(node: Node) -> Value {
    let mut map = attrs_map(node);
    map.insert("type".to_string(), Value::Array(type_list(node)));
    Value::Object(map)
}

fn type_list(node: Node) -> Vec<Value> {
    child_elements(node)
        .filter(|n| n.tag_name().name() == "type")
        .filter_map(text_element_value)
        .collect()
}

fn data_set_value(node: Node) -> Value {
    let mut map = attrs_map(node);
    let mut property_set = Vec::new();
    for child in child_elements(node) {
        match child.tag_name().name() {
            "property-set" => property_set.push(property_set_value(child)),
            other => insert_unknown(&mut map, other, child),
        }
    }
    map.insert("property-set".to_string(), Value::Array(property_set));
    Value::Object(map)
}

fn property_set_value(node: Node) -> Value {
    let mut map = attrs_map(node);
    for child in child_elements(node) {
        match child.tag_name().name() {
            "types" => {
                map.insert("types".to_string(), types_value(child));
            }
            other => insert_unknown(&mut map, other, child),
        }
    }
    Value::Object(map)
}

fn property_dependencies_value(node: Node) -> Value {
    let mut map = attrs_map(node);
    let deps: Vec<Value> = child_elements(node)
        .filter(|n| n.tag_name().name() == "property-dependency")
        .map(|n| Value::Object(attrs_map(n)))
        .collect();
    map.insert("property-dependency".to_string(), Value::Array(deps));
    Value::Object(map)
}

fn feature_usage_value(node: Node) -> Value {
    let mut map = attrs_map(node);
    let features: Vec<Value> = child_elements(node)
        .filter(|n| n.tag_name().name() == "uses-feature")
        .map(|n| Value::Object(attrs_map(n)))
        .collect();
    map.insert("uses-feature".to_string(), Value::Array(features));
    Value::Object(map)
}

fn external_service_usage_value(node: Node) -> Value {
    let mut map = attrs_map(node);
    let domains: Vec<Value> = child_elements(node)
        .filter(|n| n.tag_name().name() == "domain")
        .filter_map(text_element_value)
        .collect();
    if !domains.is_empty() {
        map.insert("domain".to_string(), Value::Array(domains));
    }
    Value::Object(map)
}

fn resources_value(node: Node) -> Value {
    let mut map = attrs_map(node);
    let mut css = Vec::new();
    let mut img = Vec::new();
    let mut resx = Vec::new();
    let mut platform_library = Vec::new();
    let mut dependency = Vec::new();

    for child in child_elements(node) {
        match child.tag_name().name() {
            "code" => {
                map.insert("code".to_string(), Value::Object(attrs_map(child)));
            }
            "css" => css.push(Value::Object(attrs_map(child))),
            "img" => img.push(Value::Object(attrs_map(child))),
            "resx" => resx.push(Value::Object(attrs_map(child))),
            "platform-library" => platform_library.push(Value::Object(attrs_map(child))),
            "dependency" => dependency.push(Value::Object(attrs_map(child))),
            other => insert_unknown(&mut map, other, child),
        }
    }

    map.insert("css".to_string(), Value::Array(css));
    map.insert("img".to_string(), Value::Array(img));
    map.insert("resx".to_string(), Value::Array(resx));
    map.insert("platform-library".to_string(), Value::Array(platform_library));
    map.insert("dependency".to_string(), Value::Array(dependency));
    Value::Object(map)
}

// ---------------------------------------------------------------------------
// Node helpers
// ---------------------------------------------------------------------------

fn child_elements<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|n| n.is_element())
}

/// Attributes of a node as raw values, namespace prefixes stripped and
/// empty strings dropped. Known boolean and integer attributes are coerced
/// only when they parse cleanly.
fn attrs_map(node: Node) -> Map {
    let mut map = Map::new();
    for attr in node.attributes() {
        let name = attr.name();
        let raw = attr.value();
        if raw.is_empty() {
            continue;
        }
        map.insert(name.to_string(), attr_value(name, raw));
    }
    map
}

fn attr_value(name: &str, raw: &str) -> Value {
    if BOOL_ATTRS.contains(&name) {
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" => return Value::Bool(true),
            "false" => return Value::Bool(false),
            _ => {}
        }
    }
    if INT_ATTRS.contains(&name) {
        if let Ok(n) = raw.trim().parse::<u64>() {
            return Value::Number(n.into());
        }
    }
    Value::String(raw.to_string())
}

fn element_text(node: Node) -> String {
    node.text().unwrap_or("").trim().to_string()
}

/// Raw value of a text-carrying element (`<type>`, `<domain>`): the trimmed
/// text under `value`, with any attributes carried alongside so validation
/// can reject them. Elements with neither text nor attributes are dropped.
fn text_element_value(node: Node) -> Option<Value> {
    let mut map = attrs_map(node);
    let text = element_text(node);
    if !text.is_empty() {
        map.insert("value".to_string(), Value::String(text));
    }
    if map.is_empty() {
        None
    } else {
        Some(Value::Object(map))
    }
}

/// Carry an unrecognized child element into the raw tree so validation can
/// point at it. First occurrence wins.
fn insert_unknown(map: &mut Map, name: &str, node: Node) {
    map.entry(name.to_string())
        .or_insert_with(|| Value::Object(attrs_map(node)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationIssueKind;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<manifest>
   <control namespace="SampleNamespace" constructor="SampleControl" version="1.0.0" display-name-key="Sample_Key" control-type="standard">
      <property name="Mode" display-name-key="Mode_Key" of-type="Enum" usage="input" required="true">
         <value name="On" display-name-key="On_Key">0</value>
         <value name="Off" display-name-key="Off_Key">1</value>
      </property>
      <external-service-usage enabled="true">
         <domain>www.example.com</domain>
      </external-service-usage>
      <resources>
         <code path="index.ts" order="1"/>
         <css path="styles.css"/>
      </resources>
   </control>
</manifest>
"#;

    #[test]
    fn sample_imports_and_validates() {
        let manifest = manifest_from_xml_str(SAMPLE).unwrap();
        let control = &manifest.control;
        assert_eq!(control.namespace, "SampleNamespace");
        assert_eq!(control.property[0].values.len(), 2);
        assert_eq!(control.property[0].values[1].value, 1);
        assert!(control.external_service_usage.as_ref().unwrap().enabled);
        assert_eq!(control.resources.code.order, Some(1));
        assert_eq!(control.resources.css[0].path, "styles.css");
    }

    #[test]
    fn attribute_order_and_whitespace_are_irrelevant() {
        let reordered = r#"<manifest><control display-name-key="Sample_Key"
            version="1.0.0" constructor="SampleControl" namespace="SampleNamespace">
            <resources><code order="1" path="index.ts"/></resources>
        </control></manifest>"#;
        let manifest = manifest_from_xml_str(reordered).unwrap();
        assert_eq!(manifest.control.version, "1.0.0");
    }

    #[test]
    fn namespace_prefixes_are_stripped() {
        let prefixed = r#"<m:manifest xmlns:m="urn:sample">
            <m:control namespace="Ns" constructor="Ctl" version="1.0.0" display-name-key="K">
                <m:resources><m:code path="index.ts"/></m:resources>
            </m:control>
        </m:manifest>"#;
        let manifest = manifest_from_xml_str(prefixed).unwrap();
        assert_eq!(manifest.control.constructor, "Ctl");
    }

    #[test]
    fn broken_xml_is_malformed() {
        let err = raw_from_xml_str("<manifest><control></manifest>").unwrap_err();
        assert!(matches!(err, ManifestError::MalformedDocument(_)));
    }

    #[test]
    fn wrong_root_is_malformed() {
        let err = raw_from_xml_str("<control/>").unwrap_err();
        match err {
            ManifestError::MalformedDocument(msg) => assert!(msg.contains("<control>")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_control_reports_missing_field() {
        let err = manifest_from_xml_str("<manifest/>").unwrap_err();
        let report = err.report().unwrap();
        assert!(report.has_issue_at("control"));
    }

    #[test]
    fn unknown_element_reports_unknown_field() {
        let text = r#"<manifest>
            <control namespace="Ns" constructor="Ctl" version="1.0.0" display-name-key="K">
                <mystery/>
                <resources><code path="index.ts"/></resources>
            </control>
        </manifest>"#;
        let err = manifest_from_xml_str(text).unwrap_err();
        let report = err.report().unwrap();
        assert!(report.has_issue_at("control.mystery"));
    }

    #[test]
    fn unknown_attribute_on_domain_is_reported() {
        let text = r#"<manifest>
            <control namespace="Ns" constructor="Ctl" version="1.0.0" display-name-key="K">
                <external-service-usage enabled="true">
                    <domain region="eu">www.example.com</domain>
                </external-service-usage>
                <resources><code path="index.ts"/></resources>
            </control>
        </manifest>"#;
        let err = manifest_from_xml_str(text).unwrap_err();
        let report = err.report().unwrap();
        assert!(report.has_issue_at("control.external-service-usage.domain[0].region"));
    }

    #[test]
    fn unknown_attribute_on_type_is_reported() {
        let text = r#"<manifest>
            <control namespace="Ns" constructor="Ctl" version="1.0.0" display-name-key="K">
                <type-group name="numbers">
                    <type hint="wide">Decimal</type>
                </type-group>
                <resources><code path="index.ts"/></resources>
            </control>
        </manifest>"#;
        let err = manifest_from_xml_str(text).unwrap_err();
        let report = err.report().unwrap();
        assert!(report.has_issue_at("control.type-group[0].type[0].hint"));
    }

    #[test]
    fn misspelled_boolean_reaches_the_validator() {
        let text = r#"<manifest>
            <control namespace="Ns" constructor="Ctl" version="1.0.0" display-name-key="K">
                <feature-usage>
                    <uses-feature name="WebAPI" required="yes"/>
                </feature-usage>
                <resources><code path="index.ts"/></resources>
            </control>
        </manifest>"#;
        let err = manifest_from_xml_str(text).unwrap_err();
        let report = err.report().unwrap();
        let issue = report
            .issues()
            .iter()
            .find(|i| i.path == "control.feature-usage.uses-feature[0].required")
            .unwrap();
        assert!(matches!(
            issue.kind,
            ValidationIssueKind::TypeMismatch { .. }
        ));
    }

    #[test]
    fn boolean_case_and_padding_are_tolerated() {
        let text = r#"<manifest>
            <control namespace="Ns" constructor="Ctl" version="1.0.0" display-name-key="K">
                <feature-usage>
                    <uses-feature name="WebAPI" required=" True "/>
                </feature-usage>
                <resources><code path="index.ts"/></resources>
            </control>
        </manifest>"#;
        let manifest = manifest_from_xml_str(text).unwrap();
        assert!(manifest.control.feature_usage.unwrap().uses_feature[0].required);
    }

    #[test]
    fn non_numeric_order_reaches_the_validator() {
        let text = r#"<manifest>
            <control namespace="Ns" constructor="Ctl" version="1.0.0" display-name-key="K">
                <resources><code path="index.ts" order="first"/></resources>
            </control>
        </manifest>"#;
        let err = manifest_from_xml_str(text).unwrap_err();
        let report = err.report().unwrap();
        assert!(report.has_issue_at("control.resources.code.order"));
    }

    #[test]
    fn empty_attributes_are_dropped() {
        let text = r#"<manifest>
            <control namespace="Ns" constructor="Ctl" version="1.0.0" display-name-key="K" description-key="">
                <resources><code path="index.ts"/></resources>
            </control>
        </manifest>"#;
        let manifest = manifest_from_xml_str(text).unwrap();
        assert_eq!(manifest.control.description_key, None);
    }
}
