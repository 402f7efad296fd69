//! # Export JSON Schema Subcommand
//!
//! Writes the manifest JSON Schema derived from the typed model. The
//! published copy of this document is what generated YAML manifests
//! reference in their editor directive.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

/// Arguments for the `pcfkit export-json-schema` subcommand.
#[derive(Args, Debug)]
pub struct ExportJsonSchemaArgs {
    /// Write the schema here instead of standard output.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute the export-json-schema subcommand.
pub fn run_export_json_schema(args: &ExportJsonSchemaArgs) -> Result<u8> {
    let text = pcfkit_schema::manifest_schema_text()?;
    crate::write_output(args.output.as_deref(), &text)?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn exports_the_schema_to_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("manifest.schema.json");
        let code = run_export_json_schema(&ExportJsonSchemaArgs {
            output: Some(output.clone()),
        })
        .unwrap();
        assert_eq!(code, 0);

        let schema: Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(schema["$schema"], pcfkit_schema::SCHEMA_DIALECT);
        assert_eq!(schema["type"], "object");
    }
}
