//! # pcfkit-cli
//!
//! Provides the `pcfkit` command-line interface over the manifest library.
//!
//! ## Subcommands
//!
//! - `pcfkit validate` checks a manifest document and reports every issue.
//! - `pcfkit generate` renders canonical `ControlManifest.Input.xml`.
//! - `pcfkit import-xml` converts existing manifest XML to YAML or JSON.
//! - `pcfkit export-json-schema` emits the manifest JSON Schema.
//!
//! Input paths accept `-` for standard input; output flags default to
//! standard output.
//!
//! ```bash
//! pcfkit validate manifest.yaml
//! pcfkit generate manifest.yaml -o ControlManifest.Input.xml
//! pcfkit import-xml ControlManifest.Input.xml --format yaml
//! pcfkit export-json-schema -o manifest.schema.json
//! ```

pub mod generate;
pub mod import;
pub mod schema;
pub mod validate;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

/// Read a document from a path, or from standard input when the path
/// is `-`.
pub fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read standard input")?;
        Ok(text)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))
    }
}

/// Write generated text to a path, or to standard output when no path
/// is given.
pub fn write_output(path: Option<&Path>, text: &str) -> Result<()> {
    match path {
        Some(path) if path != Path::new("-") => {
            std::fs::write(path, text)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote output");
            Ok(())
        }
        _ => {
            print!("{text}");
            Ok(())
        }
    }
}

/// Whether a path names an XML document. Standard input is never treated
/// as XML here; callers that accept XML on stdin sniff the content.
pub fn is_xml_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
}
