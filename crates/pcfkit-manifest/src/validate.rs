//! # Structural Manifest Validation
//!
//! Recursive descent over the raw document tree, mirroring the typed model
//! node for node. Each node checks its keys against an allow-list, coerces
//! primitives, and applies cross-field rules, accumulating every issue into
//! one [`ValidationReport`] rather than stopping at the first.
//!
//! Construction is all-or-nothing: a typed [`Manifest`] is returned only
//! when the report is empty, so a `Manifest` value always satisfies every
//! rule in this module.

use serde_json::Value;

use crate::error::{ManifestError, ManifestResult, ValidationIssueKind, ValidationReport};
use crate::model::{
    Code, Control, Css, DataSet, Dependency, Domain, EnumValue, Event, ExternalServiceUsage,
    FeatureUsage, Img, Manifest, PlatformAction, PlatformLibrary, Property, PropertyDependencies,
    PropertyDependency, PropertySet, Resources, Resx, TypeElement, TypeGroup, TypesElement,
    UsesFeature,
};
use crate::types::{
    ControlType, DependencyLoadType, DependencyType, PlatformActionType, PlatformLibraryName,
    PropertySetUsage, PropertyUsage, RequiredFor, TypeValue,
};

type Map = serde_json::Map<String, Value>;

const ROOT_KEYS: &[&str] = &["control"];
const CONTROL_KEYS: &[&str] = &[
    "namespace",
    "constructor",
    "version",
    "display-name-key",
    "description-key",
    "control-type",
    "preview-image",
    "property",
    "event",
    "data-set",
    "type-group",
    "property-dependencies",
    "feature-usage",
    "external-service-usage",
    "platform-action",
    "resources",
];
const PROPERTY_KEYS: &[&str] = &[
    "name",
    "display-name-key",
    "description-key",
    "of-type",
    "of-type-group",
    "usage",
    "required",
    "default-value",
    "pfx-default-value",
    "types",
    "value",
];
const ENUM_VALUE_KEYS: &[&str] = &["name", "display-name-key", "value"];
const EVENT_KEYS: &[&str] = &["name", "display-name-key", "description-key", "pfx-default-value"];
const DATA_SET_KEYS: &[&str] = &[
    "name",
    "display-name-key",
    "description-key",
    "cds-data-set-options",
    "property-set",
];
const PROPERTY_SET_KEYS: &[&str] = &[
    "name",
    "display-name-key",
    "description-key",
    "of-type",
    "of-type-group",
    "usage",
    "required",
    "types",
];
const TYPES_KEYS: &[&str] = &["type"];
const TYPE_ELEMENT_KEYS: &[&str] = &["value"];
const TYPE_GROUP_KEYS: &[&str] = &["name", "type"];
const PROPERTY_DEPENDENCIES_KEYS: &[&str] = &["property-dependency"];
const PROPERTY_DEPENDENCY_KEYS: &[&str] = &["input", "output", "required-for"];
const FEATURE_USAGE_KEYS: &[&str] = &["uses-feature"];
const USES_FEATURE_KEYS: &[&str] = &["name", "required"];
const EXTERNAL_SERVICE_USAGE_KEYS: &[&str] = &["enabled", "domain"];
const DOMAIN_KEYS: &[&str] = &["value"];
const PLATFORM_ACTION_KEYS: &[&str] = &["action-type"];
const RESOURCES_KEYS: &[&str] = &["code", "css", "img", "resx", "platform-library", "dependency"];
const CODE_KEYS: &[&str] = &["path", "order"];
const CSS_KEYS: &[&str] = &["path", "order"];
const IMG_KEYS: &[&str] = &["path"];
const RESX_KEYS: &[&str] = &["path", "version"];
const PLATFORM_LIBRARY_KEYS: &[&str] = &["name", "version"];
const DEPENDENCY_KEYS: &[&str] = &["type", "name", "order", "load-type"];

/// Validate a raw document tree and construct the typed manifest.
///
/// # Errors
///
/// [`ManifestError::MalformedDocument`] when the root is not a mapping,
/// [`ManifestError::Invalid`] with the complete issue report otherwise.
pub fn validate(raw: &Value) -> ManifestResult<Manifest> {
    let root = raw.as_object().ok_or_else(|| {
        ManifestError::MalformedDocument("manifest root must be a mapping".to_string())
    })?;

    let mut report = ValidationReport::default();
    check_keys(root, ROOT_KEYS, "", &mut report);

    let control = match root.get("control") {
        None => {
            report.add("control", ValidationIssueKind::MissingField);
            None
        }
        Some(Value::Object(map)) => validate_control(map, "control", &mut report),
        Some(other) => {
            report.add("control", mismatch("a mapping", other));
            None
        }
    };

    match control {
        Some(control) if report.is_empty() => Ok(Manifest { control }),
        _ => Err(ManifestError::Invalid(report)),
    }
}

fn validate_control(map: &Map, path: &str, report: &mut ValidationReport) -> Option<Control> {
    check_keys(map, CONTROL_KEYS, path, report);

    let namespace = req_str(map, "namespace", path, report);
    let constructor = req_str(map, "constructor", path, report);
    let version = req_str(map, "version", path, report);
    let display_name_key = req_str(map, "display-name-key", path, report);
    let description_key = opt_str(map, "description-key", path, report);
    let control_type = opt_keyword(map, "control-type", path, report, "one of standard, virtual", ControlType::parse);
    let preview_image = opt_str(map, "preview-image", path, report);

    for (key, value) in [("namespace", &namespace), ("constructor", &constructor)] {
        if let Some(v) = value {
            if !v.chars().all(char::is_alphanumeric) {
                report.add(
                    join(path, key),
                    ValidationIssueKind::InvariantViolation {
                        rule: "must contain only letters or digits".to_string(),
                    },
                );
            }
        }
    }

    let property = seq_field(map, "property", path, report, validate_property);
    let event = seq_field(map, "event", path, report, validate_event);
    let data_set = seq_field(map, "data-set", path, report, validate_data_set);
    let type_group = seq_field(map, "type-group", path, report, validate_type_group);

    let property_dependencies =
        opt_struct(map, "property-dependencies", path, report, validate_property_dependencies);
    let feature_usage = opt_struct(map, "feature-usage", path, report, validate_feature_usage);
    let external_service_usage = opt_struct(
        map,
        "external-service-usage",
        path,
        report,
        validate_external_service_usage,
    );
    let platform_action = opt_struct(map, "platform-action", path, report, validate_platform_action);

    let resources = match map.get("resources") {
        None => {
            report.add(join(path, "resources"), ValidationIssueKind::MissingField);
            None
        }
        Some(Value::Object(m)) => validate_resources(m, &join(path, "resources"), report),
        Some(other) => {
            report.add(join(path, "resources"), mismatch("a mapping", other));
            None
        }
    };

    Some(Control {
        namespace: namespace?,
        constructor: constructor?,
        version: version?,
        display_name_key: display_name_key?,
        description_key,
        control_type,
        preview_image,
        property: property?,
        event: event?,
        data_set: data_set?,
        type_group: type_group?,
        property_dependencies: property_dependencies?,
        feature_usage: feature_usage?,
        external_service_usage: external_service_usage?,
        platform_action: platform_action?,
        resources: resources?,
    })
}

fn validate_property(map: &Map, path: &str, report: &mut ValidationReport) -> Option<Property> {
    check_keys(map, PROPERTY_KEYS, path, report);

    let name = req_str(map, "name", path, report);
    let display_name_key = req_str(map, "display-name-key", path, report);
    let description_key = opt_str(map, "description-key", path, report);
    let of_type = of_type_field(map, path, report);
    let of_type_group = opt_str(map, "of-type-group", path, report);
    let usage = opt_keyword(map, "usage", path, report, "one of bound, input, output", PropertyUsage::parse);
    let required = opt_bool(map, "required", path, report);
    let default_value = opt_str(map, "default-value", path, report);
    let pfx_default_value = opt_str(map, "pfx-default-value", path, report);
    let types = opt_struct(map, "types", path, report, validate_types_element);
    let values = seq_field(map, "value", path, report, validate_enum_value);

    check_of_type_choice(map, path, report);

    // Enum members travel with the type: required for Enum, forbidden
    // everywhere else.
    let has_values = map
        .get("value")
        .and_then(Value::as_array)
        .is_some_and(|a| !a.is_empty());
    if of_type == Some(TypeValue::Enum) && !has_values {
        report.add(
            join(path, "value"),
            ValidationIssueKind::InvariantViolation {
                rule: "Enum properties require at least one value element".to_string(),
            },
        );
    }
    if of_type != Some(TypeValue::Enum) && has_values {
        report.add(
            join(path, "value"),
            ValidationIssueKind::InvariantViolation {
                rule: "value elements are only allowed when of-type is Enum".to_string(),
            },
        );
    }

    Some(Property {
        name: name?,
        display_name_key: display_name_key?,
        description_key,
        of_type,
        of_type_group,
        usage,
        required,
        default_value,
        pfx_default_value,
        types: types?,
        values: values?,
    })
}

fn validate_enum_value(map: &Map, path: &str, report: &mut ValidationReport) -> Option<EnumValue> {
    check_keys(map, ENUM_VALUE_KEYS, path, report);
    let name = req_str(map, "name", path, report);
    let display_name_key = req_str(map, "display-name-key", path, report);
    let value = req_int(map, "value", path, report);
    Some(EnumValue {
        name: name?,
        display_name_key: display_name_key?,
        value: value?,
    })
}

fn validate_event(map: &Map, path: &str, report: &mut ValidationReport) -> Option<Event> {
    check_keys(map, EVENT_KEYS, path, report);
    let name = req_str(map, "name", path, report);
    Some(Event {
        name: name?,
        display_name_key: opt_str(map, "display-name-key", path, report),
        description_key: opt_str(map, "description-key", path, report),
        pfx_default_value: opt_str(map, "pfx-default-value", path, report),
    })
}

fn validate_data_set(map: &Map, path: &str, report: &mut ValidationReport) -> Option<DataSet> {
    check_keys(map, DATA_SET_KEYS, path, report);
    let name = req_str(map, "name", path, report);
    let display_name_key = req_str(map, "display-name-key", path, report);
    let description_key = opt_str(map, "description-key", path, report);
    let cds_data_set_options = opt_str(map, "cds-data-set-options", path, report);

    let property_set = if map.contains_key("property-set") {
        seq_field(map, "property-set", path, report, validate_property_set)
    } else {
        report.add(join(path, "property-set"), ValidationIssueKind::MissingField);
        None
    };
    require_non_empty(&property_set, &join(path, "property-set"), "property-set", report);

    Some(DataSet {
        name: name?,
        display_name_key: display_name_key?,
        description_key,
        cds_data_set_options,
        property_set: property_set?,
    })
}

fn validate_property_set(map: &Map, path: &str, report: &mut ValidationReport) -> Option<PropertySet> {
    check_keys(map, PROPERTY_SET_KEYS, path, report);

    let name = req_str(map, "name", path, report);
    let display_name_key = req_str(map, "display-name-key", path, report);
    let description_key = opt_str(map, "description-key", path, report);
    let of_type = of_type_field(map, path, report);
    let of_type_group = opt_str(map, "of-type-group", path, report);
    let usage = opt_keyword(map, "usage", path, report, "one of bound, input", PropertySetUsage::parse);
    let required = opt_bool(map, "required", path, report);
    let types = opt_struct(map, "types", path, report, validate_types_element);

    check_of_type_choice(map, path, report);

    Some(PropertySet {
        name: name?,
        display_name_key: display_name_key?,
        description_key,
        of_type,
        of_type_group,
        usage,
        required,
        types: types?,
    })
}

fn validate_types_element(map: &Map, path: &str, report: &mut ValidationReport) -> Option<TypesElement> {
    check_keys(map, TYPES_KEYS, path, report);
    let types = if map.contains_key("type") {
        seq_field(map, "type", path, report, validate_type_element)
    } else {
        report.add(join(path, "type"), ValidationIssueKind::MissingField);
        None
    };
    require_non_empty(&types, &join(path, "type"), "type", report);
    Some(TypesElement { types: types? })
}

fn validate_type_element(map: &Map, path: &str, report: &mut ValidationReport) -> Option<TypeElement> {
    check_keys(map, TYPE_ELEMENT_KEYS, path, report);
    let value = req_keyword(map, "value", path, report, "type keyword", TypeValue::parse);
    Some(TypeElement { value: value? })
}

fn validate_type_group(map: &Map, path: &str, report: &mut ValidationReport) -> Option<TypeGroup> {
    check_keys(map, TYPE_GROUP_KEYS, path, report);
    let name = req_str(map, "name", path, report);
    let types = if map.contains_key("type") {
        seq_field(map, "type", path, report, validate_type_element)
    } else {
        report.add(join(path, "type"), ValidationIssueKind::MissingField);
        None
    };
    require_non_empty(&types, &join(path, "type"), "type", report);
    Some(TypeGroup {
        name: name?,
        types: types?,
    })
}

fn validate_property_dependencies(
    map: &Map,
    path: &str,
    report: &mut ValidationReport,
) -> Option<PropertyDependencies> {
    check_keys(map, PROPERTY_DEPENDENCIES_KEYS, path, report);
    let deps = if map.contains_key("property-dependency") {
        seq_field(map, "property-dependency", path, report, validate_property_dependency)
    } else {
        report.add(
            join(path, "property-dependency"),
            ValidationIssueKind::MissingField,
        );
        None
    };
    require_non_empty(&deps, &join(path, "property-dependency"), "property-dependency", report);
    Some(PropertyDependencies {
        property_dependency: deps?,
    })
}

fn validate_property_dependency(
    map: &Map,
    path: &str,
    report: &mut ValidationReport,
) -> Option<PropertyDependency> {
    check_keys(map, PROPERTY_DEPENDENCY_KEYS, path, report);
    let input = req_str(map, "input", path, report);
    let output = req_str(map, "output", path, report);
    let required_for = req_keyword(map, "required-for", path, report, "schema", RequiredFor::parse);
    Some(PropertyDependency {
        input: input?,
        output: output?,
        required_for: required_for?,
    })
}

fn validate_feature_usage(map: &Map, path: &str, report: &mut ValidationReport) -> Option<FeatureUsage> {
    check_keys(map, FEATURE_USAGE_KEYS, path, report);
    let uses = if map.contains_key("uses-feature") {
        seq_field(map, "uses-feature", path, report, validate_uses_feature)
    } else {
        report.add(join(path, "uses-feature"), ValidationIssueKind::MissingField);
        None
    };
    require_non_empty(&uses, &join(path, "uses-feature"), "uses-feature", report);
    Some(FeatureUsage { uses_feature: uses? })
}

fn validate_uses_feature(map: &Map, path: &str, report: &mut ValidationReport) -> Option<UsesFeature> {
    check_keys(map, USES_FEATURE_KEYS, path, report);
    let name = req_str(map, "name", path, report);
    let required = req_bool(map, "required", path, report);
    Some(UsesFeature {
        name: name?,
        required: required?,
    })
}

fn validate_external_service_usage(
    map: &Map,
    path: &str,
    report: &mut ValidationReport,
) -> Option<ExternalServiceUsage> {
    check_keys(map, EXTERNAL_SERVICE_USAGE_KEYS, path, report);
    let enabled = req_bool(map, "enabled", path, report);
    let domain = seq_field(map, "domain", path, report, validate_domain);

    match (enabled, &domain) {
        (Some(true), Some(domains)) if domains.is_empty() => {
            report.add(
                join(path, "domain"),
                ValidationIssueKind::InvariantViolation {
                    rule: "enabled external-service-usage requires at least one domain".to_string(),
                },
            );
        }
        (Some(false), Some(domains)) if !domains.is_empty() => {
            report.add(
                join(path, "domain"),
                ValidationIssueKind::InvariantViolation {
                    rule: "disabled external-service-usage must not declare domains".to_string(),
                },
            );
        }
        _ => {}
    }

    Some(ExternalServiceUsage {
        enabled: enabled?,
        domain: domain?,
    })
}

fn validate_domain(map: &Map, path: &str, report: &mut ValidationReport) -> Option<Domain> {
    check_keys(map, DOMAIN_KEYS, path, report);
    let value = req_str(map, "value", path, report);
    Some(Domain { value: value? })
}

fn validate_platform_action(map: &Map, path: &str, report: &mut ValidationReport) -> Option<PlatformAction> {
    check_keys(map, PLATFORM_ACTION_KEYS, path, report);
    let action_type = opt_keyword(
        map,
        "action-type",
        path,
        report,
        "afterPageLoad",
        PlatformActionType::parse,
    );
    Some(PlatformAction { action_type })
}

fn validate_resources(map: &Map, path: &str, report: &mut ValidationReport) -> Option<Resources> {
    check_keys(map, RESOURCES_KEYS, path, report);

    let code = match map.get("code") {
        None => {
            report.add(join(path, "code"), ValidationIssueKind::MissingField);
            None
        }
        Some(Value::Object(m)) => validate_code(m, &join(path, "code"), report),
        Some(other) => {
            report.add(join(path, "code"), mismatch("a mapping", other));
            None
        }
    };

    let css = seq_field(map, "css", path, report, validate_css);
    let img = seq_field(map, "img", path, report, validate_img);
    let resx = seq_field(map, "resx", path, report, validate_resx);
    let platform_library = seq_field(map, "platform-library", path, report, validate_platform_library);
    let dependency = seq_field(map, "dependency", path, report, validate_dependency);

    Some(Resources {
        code: code?,
        css: css?,
        img: img?,
        resx: resx?,
        platform_library: platform_library?,
        dependency: dependency?,
    })
}

fn validate_code(map: &Map, path: &str, report: &mut ValidationReport) -> Option<Code> {
    check_keys(map, CODE_KEYS, path, report);
    let path_attr = req_str(map, "path", path, report);
    let order = opt_order(map, "order", path, report);
    Some(Code {
        path: path_attr?,
        order,
    })
}

fn validate_css(map: &Map, path: &str, report: &mut ValidationReport) -> Option<Css> {
    check_keys(map, CSS_KEYS, path, report);
    let path_attr = req_str(map, "path", path, report);
    let order = opt_order(map, "order", path, report);
    Some(Css {
        path: path_attr?,
        order,
    })
}

fn validate_img(map: &Map, path: &str, report: &mut ValidationReport) -> Option<Img> {
    check_keys(map, IMG_KEYS, path, report);
    let path_attr = req_str(map, "path", path, report);
    Some(Img { path: path_attr? })
}

fn validate_resx(map: &Map, path: &str, report: &mut ValidationReport) -> Option<Resx> {
    check_keys(map, RESX_KEYS, path, report);
    let path_attr = req_str(map, "path", path, report);
    let version = req_str(map, "version", path, report);
    Some(Resx {
        path: path_attr?,
        version: version?,
    })
}

fn validate_platform_library(
    map: &Map,
    path: &str,
    report: &mut ValidationReport,
) -> Option<PlatformLibrary> {
    check_keys(map, PLATFORM_LIBRARY_KEYS, path, report);
    let name = req_keyword(map, "name", path, report, "one of React, Fluent", PlatformLibraryName::parse);
    let version = req_str(map, "version", path, report);
    Some(PlatformLibrary {
        name: name?,
        version: version?,
    })
}

fn validate_dependency(map: &Map, path: &str, report: &mut ValidationReport) -> Option<Dependency> {
    check_keys(map, DEPENDENCY_KEYS, path, report);
    let dependency_type = req_keyword(map, "type", path, report, "control", DependencyType::parse);
    let name = req_str(map, "name", path, report);
    let order = opt_order(map, "order", path, report);
    let load_type = opt_keyword(map, "load-type", path, report, "onDemand", DependencyLoadType::parse);
    Some(Dependency {
        dependency_type: dependency_type?,
        name: name?,
        order,
        load_type,
    })
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {b}"),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) => format!("\"{s}\""),
        Value::Array(_) => "a sequence".to_string(),
        Value::Object(_) => "a mapping".to_string(),
    }
}

fn mismatch(expected: &str, actual: &Value) -> ValidationIssueKind {
    ValidationIssueKind::TypeMismatch {
        expected: expected.to_string(),
        actual: describe(actual),
    }
}

fn check_keys(map: &Map, allowed: &[&str], path: &str, report: &mut ValidationReport) {
    for key in map.keys() {
        if !allowed.contains(&key.as_str()) {
            report.add(join(path, key), ValidationIssueKind::UnknownField);
        }
    }
}

fn req_str(map: &Map, key: &str, path: &str, report: &mut ValidationReport) -> Option<String> {
    match map.get(key) {
        None => {
            report.add(join(path, key), ValidationIssueKind::MissingField);
            None
        }
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(other) => {
            report.add(join(path, key), mismatch("non-empty string", other));
            None
        }
    }
}

fn opt_str(map: &Map, key: &str, path: &str, report: &mut ValidationReport) -> Option<String> {
    match map.get(key) {
        None => None,
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(other) => {
            report.add(join(path, key), mismatch("non-empty string", other));
            None
        }
    }
}

fn req_bool(map: &Map, key: &str, path: &str, report: &mut ValidationReport) -> Option<bool> {
    match map.get(key) {
        None => {
            report.add(join(path, key), ValidationIssueKind::MissingField);
            None
        }
        Some(Value::Bool(b)) => Some(*b),
        Some(other) => {
            report.add(join(path, key), mismatch("boolean", other));
            None
        }
    }
}

fn opt_bool(map: &Map, key: &str, path: &str, report: &mut ValidationReport) -> Option<bool> {
    match map.get(key) {
        None => None,
        Some(Value::Bool(b)) => Some(*b),
        Some(other) => {
            report.add(join(path, key), mismatch("boolean", other));
            None
        }
    }
}

fn req_int(map: &Map, key: &str, path: &str, report: &mut ValidationReport) -> Option<i64> {
    match map.get(key) {
        None => {
            report.add(join(path, key), ValidationIssueKind::MissingField);
            None
        }
        Some(value @ Value::Number(n)) => match n.as_i64() {
            Some(i) => Some(i),
            None => {
                report.add(join(path, key), mismatch("integer", value));
                None
            }
        },
        Some(other) => {
            report.add(join(path, key), mismatch("integer", other));
            None
        }
    }
}

fn opt_order(map: &Map, key: &str, path: &str, report: &mut ValidationReport) -> Option<u32> {
    match map.get(key) {
        None => None,
        Some(value @ Value::Number(n)) => match n.as_u64() {
            Some(v) if v >= 1 && v <= u64::from(u32::MAX) => Some(v as u32),
            _ => {
                report.add(join(path, key), mismatch("positive integer", value));
                None
            }
        },
        Some(other) => {
            report.add(join(path, key), mismatch("positive integer", other));
            None
        }
    }
}

fn req_keyword<T>(
    map: &Map,
    key: &str,
    path: &str,
    report: &mut ValidationReport,
    expected: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    match map.get(key) {
        None => {
            report.add(join(path, key), ValidationIssueKind::MissingField);
            None
        }
        Some(Value::String(s)) => match parse(s) {
            Some(v) => Some(v),
            None => {
                report.add(
                    join(path, key),
                    ValidationIssueKind::TypeMismatch {
                        expected: expected.to_string(),
                        actual: format!("\"{s}\""),
                    },
                );
                None
            }
        },
        Some(other) => {
            report.add(join(path, key), mismatch(expected, other));
            None
        }
    }
}

fn opt_keyword<T>(
    map: &Map,
    key: &str,
    path: &str,
    report: &mut ValidationReport,
    expected: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    match map.get(key) {
        None => None,
        Some(Value::String(s)) => match parse(s) {
            Some(v) => Some(v),
            None => {
                report.add(
                    join(path, key),
                    ValidationIssueKind::TypeMismatch {
                        expected: expected.to_string(),
                        actual: format!("\"{s}\""),
                    },
                );
                None
            }
        },
        Some(other) => {
            report.add(join(path, key), mismatch(expected, other));
            None
        }
    }
}

/// The `of-type` keyword, with the unsupported platform types called out
/// by name instead of lumped in with unknown keywords.
fn of_type_field(map: &Map, path: &str, report: &mut ValidationReport) -> Option<TypeValue> {
    match map.get("of-type") {
        None => None,
        Some(Value::String(s)) => {
            if let Some(t) = TypeValue::parse(s) {
                Some(t)
            } else if TypeValue::is_unsupported(s) {
                report.add(
                    join(path, "of-type"),
                    ValidationIssueKind::InvariantViolation {
                        rule: format!("unsupported of-type value: {s}"),
                    },
                );
                None
            } else {
                report.add(
                    join(path, "of-type"),
                    ValidationIssueKind::TypeMismatch {
                        expected: "type keyword".to_string(),
                        actual: format!("\"{s}\""),
                    },
                );
                None
            }
        }
        Some(other) => {
            report.add(join(path, "of-type"), mismatch("type keyword", other));
            None
        }
    }
}

/// Exactly one of `of-type` / `of-type-group` must be present.
fn check_of_type_choice(map: &Map, path: &str, report: &mut ValidationReport) {
    if map.contains_key("of-type") == map.contains_key("of-type-group") {
        report.add(
            path,
            ValidationIssueKind::InvariantViolation {
                rule: "exactly one of of-type and of-type-group is required".to_string(),
            },
        );
    }
}

fn require_non_empty<T>(
    list: &Option<Vec<T>>,
    path: &str,
    element: &str,
    report: &mut ValidationReport,
) {
    if list.as_ref().is_some_and(|items| items.is_empty()) {
        report.add(
            path,
            ValidationIssueKind::InvariantViolation {
                rule: format!("must include at least one {element}"),
            },
        );
    }
}

/// Validate a repeatable field: absent counts as an empty list, each item
/// must be a mapping handled by `f`.
fn seq_field<T>(
    map: &Map,
    key: &str,
    path: &str,
    report: &mut ValidationReport,
    mut f: impl FnMut(&Map, &str, &mut ValidationReport) -> Option<T>,
) -> Option<Vec<T>> {
    let items = match map.get(key) {
        None => return Some(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(other) => {
            report.add(join(path, key), mismatch("a sequence", other));
            return None;
        }
    };

    let mut out = Some(Vec::with_capacity(items.len()));
    for (i, item) in items.iter().enumerate() {
        let item_path = format!("{}[{i}]", join(path, key));
        let parsed = match item.as_object() {
            Some(m) => f(m, &item_path, report),
            None => {
                report.add(item_path, mismatch("a mapping", item));
                None
            }
        };
        match (parsed, &mut out) {
            (Some(v), Some(list)) => list.push(v),
            _ => out = None,
        }
    }
    out
}

/// Validate an optional singular nested mapping.
fn opt_struct<T>(
    map: &Map,
    key: &str,
    path: &str,
    report: &mut ValidationReport,
    mut f: impl FnMut(&Map, &str, &mut ValidationReport) -> Option<T>,
) -> Option<Option<T>> {
    match map.get(key) {
        None => Some(None),
        Some(Value::Object(m)) => f(m, &join(path, key), report).map(Some),
        Some(other) => {
            report.add(join(path, key), mismatch("a mapping", other));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal() -> Value {
        json!({
            "control": {
                "namespace": "SampleNamespace",
                "constructor": "SampleControl",
                "version": "1.0.0",
                "display-name-key": "Sample_Display_Key",
                "resources": {
                    "code": {"path": "index.ts", "order": 1}
                }
            }
        })
    }

    fn report_of(raw: &Value) -> ValidationReport {
        match validate(raw) {
            Err(ManifestError::Invalid(report)) => report,
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn minimal_manifest_validates() {
        let manifest = validate(&minimal()).unwrap();
        assert_eq!(manifest.control.namespace, "SampleNamespace");
        assert_eq!(manifest.control.resources.code.order, Some(1));
        assert!(manifest.control.property.is_empty());
    }

    #[test]
    fn non_mapping_root_is_malformed() {
        let err = validate(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, ManifestError::MalformedDocument(_)));
    }

    #[test]
    fn missing_control_is_reported_at_control() {
        let report = report_of(&json!({}));
        assert!(report.has_issue_at("control"));
    }

    #[test]
    fn unknown_field_is_reported_with_exact_path() {
        let mut raw = minimal();
        raw["control"]["property"] = json!([{
            "name": "A",
            "display-name-key": "A_Key",
            "of-type": "SingleLine.Text",
            "usage": "bound",
            "reqired": true
        }]);
        let report = report_of(&raw);
        assert!(report.has_issue_at("control.property[0].reqired"));
        assert!(report
            .issues()
            .iter()
            .any(|i| i.kind == ValidationIssueKind::UnknownField));
    }

    #[test]
    fn missing_required_fields_all_reported() {
        let report = report_of(&json!({"control": {}}));
        for field in [
            "control.namespace",
            "control.constructor",
            "control.version",
            "control.display-name-key",
            "control.resources",
        ] {
            assert!(report.has_issue_at(field), "missing issue at {field}");
        }
    }

    #[test]
    fn empty_required_string_is_type_mismatch() {
        let mut raw = minimal();
        raw["control"]["version"] = json!("");
        let report = report_of(&raw);
        let issue = report
            .issues()
            .iter()
            .find(|i| i.path == "control.version")
            .unwrap();
        assert!(matches!(
            issue.kind,
            ValidationIssueKind::TypeMismatch { .. }
        ));
    }

    #[test]
    fn namespace_must_be_alphanumeric() {
        let mut raw = minimal();
        raw["control"]["namespace"] = json!("Bad.Namespace");
        let report = report_of(&raw);
        let issue = report
            .issues()
            .iter()
            .find(|i| i.path == "control.namespace")
            .unwrap();
        assert!(matches!(
            issue.kind,
            ValidationIssueKind::InvariantViolation { .. }
        ));
    }

    #[test]
    fn property_requires_exactly_one_type_choice() {
        let mut raw = minimal();
        raw["control"]["property"] = json!([
            {"name": "A", "display-name-key": "A_Key", "usage": "bound"},
            {
                "name": "B",
                "display-name-key": "B_Key",
                "of-type": "SingleLine.Text",
                "of-type-group": "numbers"
            }
        ]);
        let report = report_of(&raw);
        assert!(report.has_issue_at("control.property[0]"));
        assert!(report.has_issue_at("control.property[1]"));
    }

    #[test]
    fn enum_property_requires_values() {
        let mut raw = minimal();
        raw["control"]["property"] = json!([{
            "name": "Mode",
            "display-name-key": "Mode_Key",
            "of-type": "Enum"
        }]);
        let report = report_of(&raw);
        assert!(report.has_issue_at("control.property[0].value"));
    }

    #[test]
    fn non_enum_property_rejects_values() {
        let mut raw = minimal();
        raw["control"]["property"] = json!([{
            "name": "Text",
            "display-name-key": "Text_Key",
            "of-type": "SingleLine.Text",
            "value": [{"name": "One", "display-name-key": "One_Key", "value": 1}]
        }]);
        let report = report_of(&raw);
        assert!(report.has_issue_at("control.property[0].value"));
    }

    #[test]
    fn type_group_property_rejects_values() {
        let mut raw = minimal();
        raw["control"]["type-group"] = json!([{
            "name": "numbers",
            "type": [{"value": "Decimal"}]
        }]);
        raw["control"]["property"] = json!([{
            "name": "Amount",
            "display-name-key": "Amount_Key",
            "of-type-group": "numbers",
            "value": [{"name": "One", "display-name-key": "One_Key", "value": 1}]
        }]);
        let report = report_of(&raw);
        assert!(report.has_issue_at("control.property[0].value"));
    }

    #[test]
    fn enum_property_with_values_validates() {
        let mut raw = minimal();
        raw["control"]["property"] = json!([{
            "name": "Mode",
            "display-name-key": "Mode_Key",
            "of-type": "Enum",
            "value": [
                {"name": "On", "display-name-key": "On_Key", "value": 0},
                {"name": "Off", "display-name-key": "Off_Key", "value": 1}
            ]
        }]);
        let manifest = validate(&raw).unwrap();
        assert_eq!(manifest.control.property[0].values.len(), 2);
        assert_eq!(manifest.control.property[0].values[1].value, 1);
    }

    #[test]
    fn unsupported_of_type_is_invariant_violation() {
        let mut raw = minimal();
        raw["control"]["property"] = json!([{
            "name": "Who",
            "display-name-key": "Who_Key",
            "of-type": "Lookup.Customer"
        }]);
        let report = report_of(&raw);
        let issue = report
            .issues()
            .iter()
            .find(|i| i.path == "control.property[0].of-type")
            .unwrap();
        match &issue.kind {
            ValidationIssueKind::InvariantViolation { rule } => {
                assert!(rule.contains("Lookup.Customer"));
            }
            other => panic!("expected invariant violation, got {other:?}"),
        }
    }

    #[test]
    fn unknown_of_type_is_type_mismatch() {
        let mut raw = minimal();
        raw["control"]["property"] = json!([{
            "name": "X",
            "display-name-key": "X_Key",
            "of-type": "NotAType"
        }]);
        let report = report_of(&raw);
        let issue = report
            .issues()
            .iter()
            .find(|i| i.path == "control.property[0].of-type")
            .unwrap();
        assert!(matches!(
            issue.kind,
            ValidationIssueKind::TypeMismatch { .. }
        ));
    }

    #[test]
    fn enabled_external_service_requires_domains() {
        let mut raw = minimal();
        raw["control"]["external-service-usage"] = json!({"enabled": true});
        let report = report_of(&raw);
        assert!(report.has_issue_at("control.external-service-usage.domain"));
    }

    #[test]
    fn disabled_external_service_rejects_domains() {
        let mut raw = minimal();
        raw["control"]["external-service-usage"] = json!({
            "enabled": false,
            "domain": [{"value": "www.example.com"}]
        });
        let report = report_of(&raw);
        assert!(report.has_issue_at("control.external-service-usage.domain"));
    }

    #[test]
    fn enabled_external_service_with_domains_validates() {
        let mut raw = minimal();
        raw["control"]["external-service-usage"] = json!({
            "enabled": true,
            "domain": [{"value": "www.example.com"}]
        });
        let manifest = validate(&raw).unwrap();
        let usage = manifest.control.external_service_usage.unwrap();
        assert!(usage.enabled);
        assert_eq!(usage.domain[0].value, "www.example.com");
    }

    #[test]
    fn empty_uses_feature_list_fails() {
        let mut raw = minimal();
        raw["control"]["feature-usage"] = json!({"uses-feature": []});
        let report = report_of(&raw);
        assert!(report.has_issue_at("control.feature-usage.uses-feature"));
    }

    #[test]
    fn data_set_requires_property_set() {
        let mut raw = minimal();
        raw["control"]["data-set"] = json!([{
            "name": "Grid",
            "display-name-key": "Grid_Key",
            "property-set": []
        }]);
        let report = report_of(&raw);
        assert!(report.has_issue_at("control.data-set[0].property-set"));
    }

    #[test]
    fn data_set_with_columns_validates() {
        let mut raw = minimal();
        raw["control"]["data-set"] = json!([{
            "name": "Grid",
            "display-name-key": "Grid_Key",
            "property-set": [{
                "name": "Col",
                "display-name-key": "Col_Key",
                "of-type": "SingleLine.Text",
                "usage": "bound"
            }]
        }]);
        let manifest = validate(&raw).unwrap();
        assert_eq!(manifest.control.data_set[0].property_set.len(), 1);
    }

    #[test]
    fn property_set_rejects_output_usage() {
        let mut raw = minimal();
        raw["control"]["data-set"] = json!([{
            "name": "Grid",
            "display-name-key": "Grid_Key",
            "property-set": [{
                "name": "Col",
                "display-name-key": "Col_Key",
                "of-type": "SingleLine.Text",
                "usage": "output"
            }]
        }]);
        let report = report_of(&raw);
        assert!(report.has_issue_at("control.data-set[0].property-set[0].usage"));
    }

    #[test]
    fn type_group_requires_types() {
        let mut raw = minimal();
        raw["control"]["type-group"] = json!([{"name": "numbers", "type": []}]);
        let report = report_of(&raw);
        assert!(report.has_issue_at("control.type-group[0].type"));
    }

    #[test]
    fn order_must_be_positive() {
        let mut raw = minimal();
        raw["control"]["resources"]["code"]["order"] = json!(0);
        let report = report_of(&raw);
        assert!(report.has_issue_at("control.resources.code.order"));
    }

    #[test]
    fn order_as_string_is_type_mismatch() {
        let mut raw = minimal();
        raw["control"]["resources"]["code"]["order"] = json!("first");
        let report = report_of(&raw);
        let issue = report
            .issues()
            .iter()
            .find(|i| i.path == "control.resources.code.order")
            .unwrap();
        assert!(matches!(
            issue.kind,
            ValidationIssueKind::TypeMismatch { .. }
        ));
    }

    #[test]
    fn all_issues_are_accumulated() {
        let raw = json!({
            "control": {
                "namespace": "Bad Namespace",
                "constructor": "C",
                "display-name-key": "K",
                "mystery": 1,
                "resources": {"code": {"path": ""}}
            }
        });
        let report = report_of(&raw);
        assert!(report.has_issue_at("control.namespace"));
        assert!(report.has_issue_at("control.version"));
        assert!(report.has_issue_at("control.mystery"));
        assert!(report.has_issue_at("control.resources.code.path"));
        assert!(report.len() >= 4);
    }

    #[test]
    fn property_dependencies_validate() {
        let mut raw = minimal();
        raw["control"]["property"] = json!([
            {"name": "In", "display-name-key": "In_Key", "of-type": "SingleLine.Text"},
            {"name": "Out", "display-name-key": "Out_Key", "of-type": "SingleLine.Text"}
        ]);
        raw["control"]["property-dependencies"] = json!({
            "property-dependency": [
                {"input": "In", "output": "Out", "required-for": "schema"}
            ]
        });
        let manifest = validate(&raw).unwrap();
        let deps = manifest.control.property_dependencies.unwrap();
        assert_eq!(deps.property_dependency.len(), 1);
        assert_eq!(deps.property_dependency[0].required_for, RequiredFor::Schema);
    }

    #[test]
    fn platform_library_name_is_closed() {
        let mut raw = minimal();
        raw["control"]["resources"]["platform-library"] =
            json!([{"name": "Angular", "version": "16.0"}]);
        let report = report_of(&raw);
        assert!(report.has_issue_at("control.resources.platform-library[0].name"));
    }
}
