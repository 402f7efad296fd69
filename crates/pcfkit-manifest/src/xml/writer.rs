//! Canonical `ControlManifest.Input.xml` serialization.
//!
//! Output is deterministic down to the byte: every element writes its
//! attributes in a fixed order, children in a fixed order, booleans in
//! lowercase, and indentation as three spaces per level. Semantically
//! equal manifests always produce identical text.

use crate::model::{
    Code, Control, Css, DataSet, Dependency, Event, ExternalServiceUsage, FeatureUsage, Img,
    Manifest, PlatformAction, PlatformLibrary, Property, PropertyDependencies, PropertySet,
    Resources, Resx, TypeGroup, TypesElement,
};

const INDENT: &str = "   ";
const DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n";

/// Configurable manifest serializer. The default configuration emits the
/// XML declaration; [`XmlWriter::without_declaration`] drops it.
#[derive(Debug, Clone, Default)]
pub struct XmlWriter {
    skip_declaration: bool,
}

impl XmlWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_declaration(mut self) -> Self {
        self.skip_declaration = true;
        self
    }

    /// Render the manifest, ending with a trailing newline.
    pub fn to_string(&self, manifest: &Manifest) -> String {
        let mut out = String::new();
        if !self.skip_declaration {
            out.push_str(DECLARATION);
        }
        let root = Element::new("manifest").child(control_element(&manifest.control));
        root.render(0, &mut out);
        out
    }
}

/// Render with the default configuration (declaration included).
pub fn to_xml(manifest: &Manifest) -> String {
    XmlWriter::new().to_string(manifest)
}

// ---------------------------------------------------------------------------
// Element construction, one function per manifest entity
// ---------------------------------------------------------------------------

fn control_element(control: &Control) -> Element {
    let mut el = Element::new("control")
        .attr("namespace", &control.namespace)
        .attr("constructor", &control.constructor)
        .attr("version", &control.version)
        .attr("display-name-key", &control.display_name_key)
        .opt_attr("description-key", control.description_key.as_deref())
        .opt_attr("control-type", control.control_type.map(|t| t.as_str()))
        .opt_attr("preview-image", control.preview_image.as_deref());

    for property in &control.property {
        el = el.child(property_element(property));
    }
    for event in &control.event {
        el = el.child(event_element(event));
    }
    for data_set in &control.data_set {
        el = el.child(data_set_element(data_set));
    }
    for group in &control.type_group {
        el = el.child(type_group_element(group));
    }
    if let Some(deps) = &control.property_dependencies {
        el = el.child(property_dependencies_element(deps));
    }
    if let Some(usage) = &control.feature_usage {
        el = el.child(feature_usage_element(usage));
    }
    if let Some(usage) = &control.external_service_usage {
        el = el.child(external_service_usage_element(usage));
    }
    if let Some(action) = &control.platform_action {
        el = el.child(platform_action_element(action));
    }
    el.child(resources_element(&control.resources))
}

fn property_element(property: &Property) -> Element {
    let mut el = Element::new("property")
        .attr("name", &property.name)
        .attr("display-name-key", &property.display_name_key)
        .opt_attr("description-key", property.description_key.as_deref())
        .opt_attr("of-type", property.of_type.map(|t| t.as_str()))
        .opt_attr("of-type-group", property.of_type_group.as_deref())
        .opt_attr("usage", property.usage.map(|u| u.as_str()))
        .opt_bool_attr("required", property.required)
        .opt_attr("default-value", property.default_value.as_deref())
        .opt_attr("pfx-default-value", property.pfx_default_value.as_deref());

    if let Some(types) = &property.types {
        el = el.child(types_element(types));
    }
    for value in &property.values {
        el = el.child(
            Element::new("value")
                .attr("name", &value.name)
                .attr("display-name-key", &value.display_name_key)
                .text(value.value.to_string()),
        );
    }
    el
}

fn types_element(types: &TypesElement) -> Element {
    let mut el = Element::new("types");
    for t in &types.types {
        el = el.child(Element::new("type").text(t.value.as_str()));
    }
    el
}

fn event_element(event: &Event) -> Element {
    Element::new("event")
        .attr("name", &event.name)
        .opt_attr("display-name-key", event.display_name_key.as_deref())
        .opt_attr("description-key", event.description_key.as_deref())
        .opt_attr("pfx-default-value", event.pfx_default_value.as_deref())
}

fn data_set_element(data_set: &DataSet) -> Element {
    let mut el = Element::new("data-set")
        .attr("name", &data_set.name)
        .attr("display-name-key", &data_set.display_name_key)
        .opt_attr("description-key", data_set.description_key.as_deref())
        .opt_attr("cds-data-set-options", data_set.cds_data_set_options.as_deref());
    for set in &data_set.property_set {
        el = el.child(property_set_element(set));
    }
    el
}

fn property_set_element(set: &PropertySet) -> Element {
    let mut el = Element::new("property-set")
        .attr("name", &set.name)
        .attr("display-name-key", &set.display_name_key)
        .opt_attr("description-key", set.description_key.as_deref())
        .opt_attr("of-type", set.of_type.map(|t| t.as_str()))
        .opt_attr("of-type-group", set.of_type_group.as_deref())
        .opt_attr("usage", set.usage.map(|u| u.as_str()))
        .opt_bool_attr("required", set.required);
    if let Some(types) = &set.types {
        el = el.child(types_element(types));
    }
    el
}

fn type_group_element(group: &TypeGroup) -> Element {
    let mut el = Element::new("type-group").attr("name", &group.name);
    for t in &group.types {
        el = el.child(Element::new("type").text(t.value.as_str()));
    }
    el
}

fn property_dependencies_element(deps: &PropertyDependencies) -> Element {
    let mut el = Element::new("property-dependencies");
    for dep in &deps.property_dependency {
        el = el.child(
            Element::new("property-dependency")
                .attr("input", &dep.input)
                .attr("output", &dep.output)
                .attr("required-for", dep.required_for.as_str()),
        );
    }
    el
}

fn feature_usage_element(usage: &FeatureUsage) -> Element {
    let mut el = Element::new("feature-usage");
    for feature in &usage.uses_feature {
        el = el.child(
            Element::new("uses-feature")
                .attr("name", &feature.name)
                .bool_attr("required", feature.required),
        );
    }
    el
}

fn external_service_usage_element(usage: &ExternalServiceUsage) -> Element {
    let mut el = Element::new("external-service-usage").bool_attr("enabled", usage.enabled);
    for domain in &usage.domain {
        el = el.child(Element::new("domain").text(&domain.value));
    }
    el
}

fn platform_action_element(action: &PlatformAction) -> Element {
    Element::new("platform-action")
        .opt_attr("action-type", action.action_type.map(|t| t.as_str()))
}

fn resources_element(resources: &Resources) -> Element {
    let mut el = Element::new("resources").child(code_element(&resources.code));
    for css in &resources.css {
        el = el.child(css_element(css));
    }
    for img in &resources.img {
        el = el.child(img_element(img));
    }
    for resx in &resources.resx {
        el = el.child(resx_element(resx));
    }
    for library in &resources.platform_library {
        el = el.child(platform_library_element(library));
    }
    for dependency in &resources.dependency {
        el = el.child(dependency_element(dependency));
    }
    el
}

fn code_element(code: &Code) -> Element {
    Element::new("code")
        .attr("path", &code.path)
        .opt_u32_attr("order", code.order)
}

fn css_element(css: &Css) -> Element {
    Element::new("css")
        .attr("path", &css.path)
        .opt_u32_attr("order", css.order)
}

fn img_element(img: &Img) -> Element {
    Element::new("img").attr("path", &img.path)
}

fn resx_element(resx: &Resx) -> Element {
    Element::new("resx")
        .attr("path", &resx.path)
        .attr("version", &resx.version)
}

fn platform_library_element(library: &PlatformLibrary) -> Element {
    Element::new("platform-library")
        .attr("name", library.name.as_str())
        .attr("version", &library.version)
}

fn dependency_element(dependency: &Dependency) -> Element {
    Element::new("dependency")
        .attr("type", dependency.dependency_type.as_str())
        .attr("name", &dependency.name)
        .opt_u32_attr("order", dependency.order)
        .opt_attr("load-type", dependency.load_type.map(|t| t.as_str()))
}

// ---------------------------------------------------------------------------
// Minimal element tree and renderer
// ---------------------------------------------------------------------------

struct Element {
    name: &'static str,
    attrs: Vec<(&'static str, String)>,
    children: Vec<Element>,
    text: Option<String>,
}

impl Element {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            attrs: Vec::new(),
            children: Vec::new(),
            text: None,
        }
    }

    fn attr(mut self, key: &'static str, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.attrs.push((key, value));
        }
        self
    }

    fn opt_attr(self, key: &'static str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(v) => self.attr(key, v),
            None => self,
        }
    }

    fn bool_attr(self, key: &'static str, value: bool) -> Self {
        self.attr(key, if value { "true" } else { "false" })
    }

    fn opt_bool_attr(self, key: &'static str, value: Option<bool>) -> Self {
        match value {
            Some(v) => self.bool_attr(key, v),
            None => self,
        }
    }

    fn opt_u32_attr(self, key: &'static str, value: Option<u32>) -> Self {
        match value {
            Some(v) => self.attr(key, v.to_string()),
            None => self,
        }
    }

    fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    fn render(&self, depth: usize, out: &mut String) {
        for _ in 0..depth {
            out.push_str(INDENT);
        }
        out.push('<');
        out.push_str(self.name);
        for (key, value) in &self.attrs {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            escape_into(value, true, out);
            out.push('"');
        }

        match (&self.text, self.children.is_empty()) {
            (None, true) => out.push_str("/>\n"),
            (Some(text), true) => {
                out.push('>');
                escape_into(text, false, out);
                out.push_str("</");
                out.push_str(self.name);
                out.push_str(">\n");
            }
            (text, false) => {
                out.push_str(">\n");
                if let Some(text) = text {
                    for _ in 0..=depth {
                        out.push_str(INDENT);
                    }
                    escape_into(text, false, out);
                    out.push('\n');
                }
                for child in &self.children {
                    child.render(depth + 1, out);
                }
                for _ in 0..depth {
                    out.push_str(INDENT);
                }
                out.push_str("</");
                out.push_str(self.name);
                out.push_str(">\n");
            }
        }
    }
}

// Whitespace in attribute values must be written as character references;
// a literal tab or newline would be folded to a space by attribute-value
// normalization on re-parse.
fn escape_into(value: &str, in_attribute: bool, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attribute => out.push_str("&quot;"),
            '\t' if in_attribute => out.push_str("&#9;"),
            '\n' if in_attribute => out.push_str("&#10;"),
            '\r' if in_attribute => out.push_str("&#13;"),
            _ => out.push(c),
        }
    }
}
