//! # Generate Subcommand
//!
//! Validates a manifest source document and renders the canonical
//! `ControlManifest.Input.xml`. Output is byte-deterministic, so running
//! the command twice over the same source produces identical files.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use pcfkit_manifest::{load_manifest_str, manifest_from_xml_str, ManifestError, XmlWriter};

/// Arguments for the `pcfkit generate` subcommand.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Manifest source document, YAML or JSON (`-` reads standard input).
    /// XML input is re-emitted in canonical form.
    pub path: PathBuf,

    /// Write the XML here instead of standard output.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Omit the XML declaration line.
    #[arg(long)]
    pub no_declaration: bool,
}

/// Execute the generate subcommand.
pub fn run_generate(args: &GenerateArgs) -> Result<u8> {
    let text = crate::read_input(&args.path)?;
    let result = if crate::is_xml_path(&args.path) {
        manifest_from_xml_str(&text)
    } else {
        load_manifest_str(&text)
    };

    let manifest = match result {
        Ok(manifest) => manifest,
        Err(ManifestError::Invalid(report)) => {
            eprintln!("{report}");
            eprintln!("{} issue(s) found.", report.len());
            return Ok(1);
        }
        Err(err @ ManifestError::MalformedDocument(_)) => return Err(err.into()),
    };

    let mut writer = XmlWriter::new();
    if args.no_declaration {
        writer = writer.without_declaration();
    }
    crate::write_output(args.output.as_deref(), &writer.to_string(&manifest))?;
    Ok(0)
}
