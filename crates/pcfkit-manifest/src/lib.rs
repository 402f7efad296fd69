//! # pcfkit-manifest
//!
//! Typed document model, structural validator, and XML surface for Power
//! Apps component framework manifests.
//!
//! ## Architecture
//!
//! ```text
//! pcfkit-manifest
//! ├── types      closed keyword vocabularies (of-type, usage, ...)
//! ├── model      typed manifest structs, serde + JsonSchema derives
//! ├── error      ValidationReport and the crate error type
//! ├── raw        YAML/JSON text -> raw serde_json::Value tree
//! ├── validate   raw tree -> ValidationReport / typed Manifest
//! └── xml        canonical writer and tolerant reader
//! ```
//!
//! All input syntaxes (YAML, JSON, XML) converge on the same raw tree and
//! the same validator, so a [`Manifest`] value is valid by construction no
//! matter where it came from. Serialization back to
//! `ControlManifest.Input.xml` is byte-deterministic.
//!
//! ## Example
//!
//! ```
//! use pcfkit_manifest::{load_manifest_str, to_xml};
//!
//! let manifest = load_manifest_str(
//!     "control:\n\
//!      \x20 namespace: SampleNamespace\n\
//!      \x20 constructor: SampleControl\n\
//!      \x20 version: 1.0.0\n\
//!      \x20 display-name-key: Sample_Key\n\
//!      \x20 resources:\n\
//!      \x20   code: {path: index.ts, order: 1}\n",
//! )?;
//! let xml = to_xml(&manifest);
//! assert!(xml.contains("namespace=\"SampleNamespace\""));
//! # Ok::<(), pcfkit_manifest::ManifestError>(())
//! ```

pub mod error;
pub mod model;
pub mod raw;
pub mod types;
pub mod validate;
pub mod xml;

pub use error::{
    ManifestError, ManifestResult, ValidationIssue, ValidationIssueKind, ValidationReport,
};
pub use model::{Control, Manifest, Resources};
pub use raw::{load_manifest_str, raw_from_json_str, raw_from_str, raw_from_yaml_str};
pub use types::TypeValue;
pub use validate::validate;
pub use xml::{manifest_from_xml_str, raw_from_xml_str, to_xml, XmlWriter};
