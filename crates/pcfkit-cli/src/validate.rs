//! # Validate Subcommand
//!
//! Checks a manifest document (YAML, JSON, or XML) against the manifest
//! schema and prints every issue with its field path, one per line.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use pcfkit_manifest::{load_manifest_str, manifest_from_xml_str, ManifestError};

/// Arguments for the `pcfkit validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Manifest document to check (`-` reads standard input).
    pub path: PathBuf,
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let text = crate::read_input(&args.path)?;
    let result = if crate::is_xml_path(&args.path) {
        manifest_from_xml_str(&text)
    } else {
        load_manifest_str(&text)
    };

    match result {
        Ok(manifest) => {
            tracing::info!(
                namespace = %manifest.control.namespace,
                constructor = %manifest.control.constructor,
                "manifest validated"
            );
            println!("Manifest is valid.");
            Ok(0)
        }
        Err(ManifestError::Invalid(report)) => {
            eprintln!("{report}");
            eprintln!("{} issue(s) found.", report.len());
            Ok(1)
        }
        Err(err @ ManifestError::MalformedDocument(_)) => Err(err.into()),
    }
}
