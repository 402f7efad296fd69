//! # ControlManifest XML Surface
//!
//! Two halves that share one vocabulary with the rest of the crate:
//!
//! ```text
//! xml
//! ├── writer   typed Manifest -> canonical ControlManifest.Input.xml
//! └── reader   existing XML   -> raw tree -> validator -> Manifest
//! ```
//!
//! The writer is byte-deterministic: fixed attribute order, fixed child
//! order, three-space indentation, lowercase booleans. The reader is
//! tolerant of attribute order, namespace prefixes, and formatting, and
//! funnels everything through the same validator as YAML/JSON input.

mod reader;
mod writer;

pub use reader::{manifest_from_xml_str, raw_from_xml_str};
pub use writer::{to_xml, XmlWriter};
