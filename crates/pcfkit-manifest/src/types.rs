//! # Manifest Keyword Vocabularies
//!
//! Closed keyword sets used by manifest attributes: control types, property
//! usages, dependency kinds, platform libraries, and the built-in data type
//! tags accepted by `of-type`.
//!
//! Every enum carries its external spelling through `as_str`/`parse` so the
//! validator, the XML layer, and serde all agree on one vocabulary.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Whether a control renders standard or virtual (React-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ControlType {
    Standard,
    Virtual,
}

impl ControlType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Virtual => "virtual",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "standard" => Some(Self::Standard),
            "virtual" => Some(Self::Virtual),
            _ => None,
        }
    }
}

/// Kind of a library dependency. Only control dependencies exist today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DependencyType {
    Control,
}

impl DependencyType {
    pub fn as_str(&self) -> &'static str {
        "control"
    }

    pub fn parse(s: &str) -> Option<Self> {
        (s == "control").then_some(Self::Control)
    }
}

/// Load strategy for a dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum DependencyLoadType {
    #[serde(rename = "onDemand")]
    OnDemand,
}

impl DependencyLoadType {
    pub fn as_str(&self) -> &'static str {
        "onDemand"
    }

    pub fn parse(s: &str) -> Option<Self> {
        (s == "onDemand").then_some(Self::OnDemand)
    }
}

/// When a platform action fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum PlatformActionType {
    #[serde(rename = "afterPageLoad")]
    AfterPageLoad,
}

impl PlatformActionType {
    pub fn as_str(&self) -> &'static str {
        "afterPageLoad"
    }

    pub fn parse(s: &str) -> Option<Self> {
        (s == "afterPageLoad").then_some(Self::AfterPageLoad)
    }
}

/// Platform-provided library a component may link against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum PlatformLibraryName {
    React,
    Fluent,
}

impl PlatformLibraryName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::React => "React",
            Self::Fluent => "Fluent",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "React" => Some(Self::React),
            "Fluent" => Some(Self::Fluent),
            _ => None,
        }
    }
}

/// Data flow direction of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PropertyUsage {
    Bound,
    Input,
    Output,
}

impl PropertyUsage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bound => "bound",
            Self::Input => "input",
            Self::Output => "output",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "bound" => Some(Self::Bound),
            "input" => Some(Self::Input),
            "output" => Some(Self::Output),
            _ => None,
        }
    }
}

/// Data flow direction of a data-set column. Output is not allowed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PropertySetUsage {
    Bound,
    Input,
}

impl PropertySetUsage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bound => "bound",
            Self::Input => "input",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "bound" => Some(Self::Bound),
            "input" => Some(Self::Input),
            _ => None,
        }
    }
}

/// Target of a property dependency. Only schema dependencies exist today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RequiredFor {
    Schema,
}

impl RequiredFor {
    pub fn as_str(&self) -> &'static str {
        "schema"
    }

    pub fn parse(s: &str) -> Option<Self> {
        (s == "schema").then_some(Self::Schema)
    }
}

/// Built-in data type tags accepted by `of-type` and `type` elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum TypeValue {
    Currency,
    #[serde(rename = "DateAndTime.DateAndTime")]
    DateAndTime,
    #[serde(rename = "DateAndTime.DateOnly")]
    DateOnly,
    Decimal,
    Enum,
    #[serde(rename = "FP")]
    Fp,
    #[serde(rename = "Lookup.Simple")]
    LookupSimple,
    Multiple,
    MultiSelectOptionSet,
    Object,
    OptionSet,
    #[serde(rename = "SingleLine.Email")]
    SingleLineEmail,
    #[serde(rename = "SingleLine.Phone")]
    SingleLinePhone,
    #[serde(rename = "SingleLine.Text")]
    SingleLineText,
    #[serde(rename = "SingleLine.TextArea")]
    SingleLineTextArea,
    #[serde(rename = "SingleLine.Ticker")]
    SingleLineTicker,
    #[serde(rename = "SingleLine.URL")]
    SingleLineUrl,
    TwoOptions,
    #[serde(rename = "Whole.None")]
    WholeNone,
}

/// Platform type tags that exist in the wider manifest schema but are not
/// supported for custom components. Rejected with a dedicated rule so the
/// message names the offending keyword.
pub const UNSUPPORTED_TYPE_VALUES: &[&str] = &[
    "Lookup.Customer",
    "Lookup.Owner",
    "Lookup.PartyList",
    "Lookup.Regarding",
    "Status Reason",
    "Status",
    "Whole.Duration",
    "Whole.Language",
    "Whole.TimeZone",
];

impl TypeValue {
    /// All supported type tags.
    pub fn all() -> &'static [TypeValue] {
        &[
            Self::Currency,
            Self::DateAndTime,
            Self::DateOnly,
            Self::Decimal,
            Self::Enum,
            Self::Fp,
            Self::LookupSimple,
            Self::Multiple,
            Self::MultiSelectOptionSet,
            Self::Object,
            Self::OptionSet,
            Self::SingleLineEmail,
            Self::SingleLinePhone,
            Self::SingleLineText,
            Self::SingleLineTextArea,
            Self::SingleLineTicker,
            Self::SingleLineUrl,
            Self::TwoOptions,
            Self::WholeNone,
        ]
    }

    /// The canonical keyword string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Currency => "Currency",
            Self::DateAndTime => "DateAndTime.DateAndTime",
            Self::DateOnly => "DateAndTime.DateOnly",
            Self::Decimal => "Decimal",
            Self::Enum => "Enum",
            Self::Fp => "FP",
            Self::LookupSimple => "Lookup.Simple",
            Self::Multiple => "Multiple",
            Self::MultiSelectOptionSet => "MultiSelectOptionSet",
            Self::Object => "Object",
            Self::OptionSet => "OptionSet",
            Self::SingleLineEmail => "SingleLine.Email",
            Self::SingleLinePhone => "SingleLine.Phone",
            Self::SingleLineText => "SingleLine.Text",
            Self::SingleLineTextArea => "SingleLine.TextArea",
            Self::SingleLineTicker => "SingleLine.Ticker",
            Self::SingleLineUrl => "SingleLine.URL",
            Self::TwoOptions => "TwoOptions",
            Self::WholeNone => "Whole.None",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|t| t.as_str() == s)
    }

    /// Whether the keyword names a platform type that components cannot use.
    pub fn is_unsupported(s: &str) -> bool {
        UNSUPPORTED_TYPE_VALUES.contains(&s)
    }
}

impl std::fmt::Display for TypeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::fmt::Display for ControlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::fmt::Display for PropertyUsage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::fmt::Display for PropertySetUsage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::fmt::Display for PlatformLibraryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_value_round_trips_through_keyword() {
        for t in TypeValue::all() {
            assert_eq!(TypeValue::parse(t.as_str()), Some(*t));
        }
    }

    #[test]
    fn type_value_all_is_exhaustive() {
        assert_eq!(TypeValue::all().len(), 19);
    }

    #[test]
    fn type_value_rejects_unknown_keyword() {
        assert_eq!(TypeValue::parse("NotAType"), None);
        assert_eq!(TypeValue::parse("singleline.text"), None);
    }

    #[test]
    fn unsupported_keywords_are_not_parseable() {
        for s in UNSUPPORTED_TYPE_VALUES {
            assert!(TypeValue::is_unsupported(s));
            assert_eq!(TypeValue::parse(s), None);
        }
    }

    #[test]
    fn type_value_serde_uses_keyword() {
        let json = serde_json::to_string(&TypeValue::SingleLineUrl).unwrap();
        assert_eq!(json, "\"SingleLine.URL\"");
        let back: TypeValue = serde_json::from_str("\"Whole.None\"").unwrap();
        assert_eq!(back, TypeValue::WholeNone);
    }

    #[test]
    fn usage_keywords_are_lowercase() {
        assert_eq!(PropertyUsage::Bound.as_str(), "bound");
        assert_eq!(PropertyUsage::parse("output"), Some(PropertyUsage::Output));
        assert_eq!(PropertySetUsage::parse("output"), None);
    }

    #[test]
    fn control_type_keywords() {
        assert_eq!(ControlType::parse("virtual"), Some(ControlType::Virtual));
        assert_eq!(ControlType::parse("Virtual"), None);
    }

    #[test]
    fn camel_case_keywords() {
        assert_eq!(
            DependencyLoadType::parse("onDemand"),
            Some(DependencyLoadType::OnDemand)
        );
        assert_eq!(
            PlatformActionType::parse("afterPageLoad"),
            Some(PlatformActionType::AfterPageLoad)
        );
        assert_eq!(PlatformLibraryName::parse("React"), Some(PlatformLibraryName::React));
        assert_eq!(PlatformLibraryName::parse("react"), None);
    }
}
