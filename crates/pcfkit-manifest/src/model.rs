//! # Typed Manifest Document Model
//!
//! The validated, immutable representation of a PCF control manifest.
//! Field order in each struct is the canonical serialization order; serde
//! renames carry the external hyphenated spellings so the YAML/JSON form,
//! the XML form, and the exported JSON Schema all share one vocabulary.
//!
//! ```text
//! Manifest
//! └── control
//!     ├── namespace / constructor / version / display-name-key
//!     ├── property* / event* / data-set* / type-group*
//!     ├── property-dependencies? / feature-usage?
//!     ├── external-service-usage? / platform-action?
//!     └── resources (code, css*, img*, resx*, platform-library*, dependency*)
//! ```
//!
//! Instances are only constructed by the validator (or deserialized from
//! data the validator already accepted), so holding a [`Manifest`] means
//! every structural rule and cross-field invariant holds.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::types::{
    ControlType, DependencyLoadType, DependencyType, PlatformActionType, PlatformLibraryName,
    PropertySetUsage, PropertyUsage, RequiredFor, TypeValue,
};

/// The manifest root. Wraps the single `control` definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub control: Control,
}

/// A component definition: identity attributes, typed members, and the
/// resource bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Control {
    /// Object prototype namespace. Letters and digits only.
    pub namespace: String,
    /// Initializer method name. Letters and digits only.
    pub constructor: String,
    /// Semantic version of the component.
    pub version: String,
    /// Localized name shown in the UI.
    #[serde(rename = "display-name-key")]
    pub display_name_key: String,
    /// Localized description shown in the UI.
    #[serde(rename = "description-key", skip_serializing_if = "Option::is_none")]
    pub description_key: Option<String>,
    #[serde(rename = "control-type", skip_serializing_if = "Option::is_none")]
    pub control_type: Option<ControlType>,
    /// Image shown on customization screens.
    #[serde(rename = "preview-image", skip_serializing_if = "Option::is_none")]
    pub preview_image: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub property: Vec<Property>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub event: Vec<Event>,
    #[serde(rename = "data-set", default, skip_serializing_if = "Vec::is_empty")]
    pub data_set: Vec<DataSet>,
    #[serde(rename = "type-group", default, skip_serializing_if = "Vec::is_empty")]
    pub type_group: Vec<TypeGroup>,
    #[serde(
        rename = "property-dependencies",
        skip_serializing_if = "Option::is_none"
    )]
    pub property_dependencies: Option<PropertyDependencies>,
    #[serde(rename = "feature-usage", skip_serializing_if = "Option::is_none")]
    pub feature_usage: Option<FeatureUsage>,
    #[serde(
        rename = "external-service-usage",
        skip_serializing_if = "Option::is_none"
    )]
    pub external_service_usage: Option<ExternalServiceUsage>,
    #[serde(rename = "platform-action", skip_serializing_if = "Option::is_none")]
    pub platform_action: Option<PlatformAction>,
    pub resources: Resources,
}

/// A scalar property of the component.
///
/// Exactly one of `of_type` / `of_type_group` is set; `value` is non-empty
/// exactly when `of_type` is [`TypeValue::Enum`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Property {
    pub name: String,
    #[serde(rename = "display-name-key")]
    pub display_name_key: String,
    #[serde(rename = "description-key", skip_serializing_if = "Option::is_none")]
    pub description_key: Option<String>,
    #[serde(rename = "of-type", skip_serializing_if = "Option::is_none")]
    pub of_type: Option<TypeValue>,
    /// Name of a `type-group` declared on the control.
    #[serde(rename = "of-type-group", skip_serializing_if = "Option::is_none")]
    pub of_type_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<PropertyUsage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(rename = "default-value", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// Default Power Fx expression.
    #[serde(rename = "pfx-default-value", skip_serializing_if = "Option::is_none")]
    pub pfx_default_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<TypesElement>,
    /// Enum members, present only for `of-type: Enum`.
    #[serde(rename = "value", default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<EnumValue>,
}

/// One member of an Enum-typed property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct EnumValue {
    pub name: String,
    #[serde(rename = "display-name-key")]
    pub display_name_key: String,
    /// Numeric value of the option.
    pub value: i64,
}

/// A `types` element holding the type tags a member accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TypesElement {
    /// At least one type tag.
    #[serde(rename = "type")]
    pub types: Vec<TypeElement>,
}

/// One type tag inside `types` or `type-group`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TypeElement {
    pub value: TypeValue,
}

/// A named group of type tags that properties can reference via
/// `of-type-group`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TypeGroup {
    pub name: String,
    /// At least one type tag.
    #[serde(rename = "type")]
    pub types: Vec<TypeElement>,
}

/// An event raised by the component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Event {
    pub name: String,
    #[serde(rename = "display-name-key", skip_serializing_if = "Option::is_none")]
    pub display_name_key: Option<String>,
    #[serde(rename = "description-key", skip_serializing_if = "Option::is_none")]
    pub description_key: Option<String>,
    #[serde(rename = "pfx-default-value", skip_serializing_if = "Option::is_none")]
    pub pfx_default_value: Option<String>,
}

/// A tabular data binding with its column definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct DataSet {
    pub name: String,
    #[serde(rename = "display-name-key")]
    pub display_name_key: String,
    #[serde(rename = "description-key", skip_serializing_if = "Option::is_none")]
    pub description_key: Option<String>,
    /// Shows the command bar, view selector, and quick find when "true".
    #[serde(
        rename = "cds-data-set-options",
        skip_serializing_if = "Option::is_none"
    )]
    pub cds_data_set_options: Option<String>,
    /// At least one column.
    #[serde(rename = "property-set")]
    pub property_set: Vec<PropertySet>,
}

/// A column of a data-set. Exactly one of `of_type` / `of_type_group` is
/// set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PropertySet {
    pub name: String,
    #[serde(rename = "display-name-key")]
    pub display_name_key: String,
    #[serde(rename = "description-key", skip_serializing_if = "Option::is_none")]
    pub description_key: Option<String>,
    #[serde(rename = "of-type", skip_serializing_if = "Option::is_none")]
    pub of_type: Option<TypeValue>,
    #[serde(rename = "of-type-group", skip_serializing_if = "Option::is_none")]
    pub of_type_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<PropertySetUsage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<TypesElement>,
}

/// Declares that one property's schema depends on another property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PropertyDependency {
    pub input: String,
    pub output: String,
    #[serde(rename = "required-for")]
    pub required_for: RequiredFor,
}

/// Container for property dependency declarations. Non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PropertyDependencies {
    #[serde(rename = "property-dependency")]
    pub property_dependency: Vec<PropertyDependency>,
}

/// One platform feature the component declares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct UsesFeature {
    pub name: String,
    /// Whether the component refuses to load without the feature.
    pub required: bool,
}

/// Container for feature declarations. Non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct FeatureUsage {
    #[serde(rename = "uses-feature")]
    pub uses_feature: Vec<UsesFeature>,
}

/// A domain contacted by the component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Domain {
    pub value: String,
}

/// Declaration of external service access.
///
/// `enabled: true` requires at least one domain; `enabled: false` requires
/// none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ExternalServiceUsage {
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub domain: Vec<Domain>,
}

/// A platform-triggered action hook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PlatformAction {
    #[serde(rename = "action-type", skip_serializing_if = "Option::is_none")]
    pub action_type: Option<PlatformActionType>,
}

/// The component's resource bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Resources {
    pub code: Code,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub css: Vec<Css>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub img: Vec<Img>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resx: Vec<Resx>,
    #[serde(
        rename = "platform-library",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub platform_library: Vec<PlatformLibrary>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependency: Vec<Dependency>,
}

/// The component's code bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Code {
    pub path: String,
    /// Load order, 1-based.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

/// A stylesheet resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Css {
    pub path: String,
    /// Load order, 1-based.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

/// An image resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Img {
    pub path: String,
}

/// A localized string resource file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Resx {
    pub path: String,
    pub version: String,
}

/// A platform-provided library the component links against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PlatformLibrary {
    pub name: PlatformLibraryName,
    pub version: String,
}

/// A dependency on another library component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Dependency {
    #[serde(rename = "type")]
    pub dependency_type: DependencyType,
    /// Schema name of the library component.
    pub name: String,
    /// Load order, 1-based.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    #[serde(rename = "load-type", skip_serializing_if = "Option::is_none")]
    pub load_type: Option<DependencyLoadType>,
}
